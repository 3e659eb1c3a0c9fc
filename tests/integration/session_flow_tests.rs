//! Integration tests for the credential handshake as driven by inbound
//! events: connect → credential → verdict → robot identity.

use crate::mock_hw::{MockHardware, MockSocket};

use roomctl::app::service::Controller;
use roomctl::app::session::LinkState;
use roomctl::config::ControllerConfig;

fn controller() -> (Controller, MockHardware, MockSocket) {
    (
        Controller::new(ControllerConfig::default()),
        MockHardware::new(),
        MockSocket::new(),
    )
}

#[test]
fn connect_sends_credential_as_json_string() {
    let (mut c, mut hw, mut sock) = controller();
    sock.push_connect();
    c.step(0, &mut hw, &mut sock);
    assert_eq!(sock.payloads("authentication"), ["\"123456789\""]);
    assert_eq!(c.session().state(), LinkState::AwaitingCredential);
    assert!(sock.payloads("robotID").is_empty());
}

#[test]
fn accepted_credential_sends_robot_id_once_per_epoch() {
    let (mut c, mut hw, mut sock) = controller();
    sock.push_connect();
    sock.push("authentication", "true");
    sock.push("authentication", "true");
    c.step(0, &mut hw, &mut sock);
    assert!(c.session().is_authenticated());
    assert_eq!(sock.payloads("robotID"), ["\"001\""]);

    sock.push("authentication", "true");
    c.step(10, &mut hw, &mut sock);
    assert_eq!(sock.payloads("robotID").len(), 1);
}

#[test]
fn reconnect_starts_a_new_handshake() {
    let (mut c, mut hw, mut sock) = controller();
    sock.push_connect();
    sock.push("authentication", "true");
    c.step(0, &mut hw, &mut sock);
    let first_epoch = c.session().epoch();

    sock.push_disconnect();
    sock.push_disconnect();
    c.step(10, &mut hw, &mut sock);
    assert_eq!(c.session().state(), LinkState::Disconnected);

    sock.push_connect();
    c.step(20, &mut hw, &mut sock);
    assert_eq!(c.session().epoch(), first_epoch + 1);
    assert_eq!(sock.payloads("authentication").len(), 2);
    assert!(!c.session().is_authenticated());

    sock.push("authentication", "true");
    c.step(30, &mut hw, &mut sock);
    assert_eq!(sock.payloads("robotID"), ["\"001\"", "\"001\""]);
}

#[test]
fn malformed_verdict_keeps_waiting() {
    let (mut c, mut hw, mut sock) = controller();
    sock.push_connect();
    sock.push("authentication", "yes");
    sock.push("authentication", "\"true\"");
    c.step(0, &mut hw, &mut sock);
    assert_eq!(c.session().state(), LinkState::AwaitingCredential);

    sock.push("authentication", "true");
    c.step(10, &mut hw, &mut sock);
    assert!(c.session().is_authenticated());
}

#[test]
fn rejection_is_final_until_reconnect() {
    let (mut c, mut hw, mut sock) = controller();
    sock.push_connect();
    sock.push("authentication", "false");
    c.step(0, &mut hw, &mut sock);
    assert_eq!(c.session().state(), LinkState::Rejected);

    // Late acceptance is ignored, and nothing is reported meanwhile.
    sock.push("authentication", "true");
    for now in (10..20_000).step_by(1000) {
        c.step(now, &mut hw, &mut sock);
    }
    assert_eq!(c.session().state(), LinkState::Rejected);
    assert!(sock.payloads("robotID").is_empty());
    assert!(sock.sensor_data().is_empty());
    assert_eq!(c.cycle().ticks(), 0);

    sock.push_connect();
    sock.push("authentication", "true");
    c.step(30_000, &mut hw, &mut sock);
    assert!(c.session().is_authenticated());
    assert_eq!(sock.payloads("robotID").len(), 1);
}

#[test]
fn setpoints_before_authentication_are_dropped() {
    let (mut c, mut hw, mut sock) = controller();
    sock.push_connect();
    sock.push("setpoints", r#"{"001":25.0}"#);
    sock.push("authentication", "true");
    c.step(0, &mut hw, &mut sock);
    assert!(c.session().is_authenticated());
    let temperature = c
        .channels()
        .get(roomctl::app::channel::ChannelId::Temperature)
        .unwrap();
    assert!(!temperature.is_active());
}

#[test]
fn unknown_events_are_ignored() {
    let (mut c, mut hw, mut sock) = controller();
    sock.push_connect();
    sock.push("firmwareUpdate", "{}");
    sock.push("authentication", "true");
    c.step(0, &mut hw, &mut sock);
    assert!(c.session().is_authenticated());
    assert_eq!(sock.sent.len(), 2, "credential and robot id only");
}
