//! End-to-end tests through the simulated Socket.IO adapter: server frames
//! in, controller in the middle, wire frames out.

use crate::mock_hw::MockHardware;

use roomctl::adapters::socketio::SocketIoAdapter;
use roomctl::app::service::Controller;
use roomctl::config::ControllerConfig;
use roomctl::pins::HEATER_OUTPUT_GPIO;

const OPEN: &str = r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":5000}"#;

fn pass(c: &mut Controller, hw: &mut MockHardware, s: &mut SocketIoAdapter, now: u64) {
    s.service(now);
    c.step(now, hw, s);
}

fn open_link() -> (Controller, MockHardware, SocketIoAdapter) {
    let config = ControllerConfig::default();
    let socket = SocketIoAdapter::connect(&config.server_uri()).unwrap();
    (Controller::new(config), MockHardware::new(), socket)
}

#[test]
fn handshake_and_first_tick_on_the_wire() {
    let (mut c, mut hw, mut s) = open_link();
    hw.set_temperature(20.0);

    s.sim_server_frame(OPEN);
    s.sim_server_frame("40");
    pass(&mut c, &mut hw, &mut s, 0);
    assert_eq!(s.sim_sent(), ["2", r#"42["authentication","123456789"]"#]);

    s.sim_server_frame(r#"42["authentication",true]"#);
    s.sim_server_frame(r#"42["setpoints",{"001":22,"002":"none"}]"#);
    pass(&mut c, &mut hw, &mut s, 10);
    assert!(c.session().is_authenticated());
    assert_eq!(s.sim_sent()[2], r#"42["robotID","001"]"#);
    s.sim_clear_sent();

    pass(&mut c, &mut hw, &mut s, 20);
    let sent = s.sim_sent();
    assert_eq!(
        sent[0],
        r#"42["sensorData",{"ControlledItemID":"001","value":1}]"#
    );
    assert_eq!(sent[1], r#"42["sensorData",{"SensorID":"001","value":20.0}]"#);
    assert_eq!(sent.len(), 4);
    assert_eq!(hw.writes_to(HEATER_OUTPUT_GPIO), [true]);
}

#[test]
fn server_ping_is_answered_with_pong() {
    let (mut c, mut hw, mut s) = open_link();
    s.sim_server_frame(OPEN);
    s.sim_server_frame("2");
    pass(&mut c, &mut hw, &mut s, 0);
    assert!(s.sim_sent().iter().any(|f| f == "3"));
}

#[test]
fn heartbeat_follows_server_interval() {
    let (mut c, mut hw, mut s) = open_link();
    s.sim_server_frame(r#"0{"sid":"abc","pingInterval":1000}"#);
    for now in (0..=3000).step_by(100) {
        pass(&mut c, &mut hw, &mut s, now);
    }
    let pings = s.sim_sent().iter().filter(|f| *f == "2").count();
    assert_eq!(pings, 4);
}

#[test]
fn link_drop_stops_reports_and_reconnect_reauthenticates() {
    let (mut c, mut hw, mut s) = open_link();
    s.sim_server_frame(OPEN);
    s.sim_server_frame("40");
    s.sim_server_frame(r#"42["authentication",true]"#);
    pass(&mut c, &mut hw, &mut s, 0);
    pass(&mut c, &mut hw, &mut s, 1);
    assert!(c.session().is_authenticated());

    s.sim_drop();
    pass(&mut c, &mut hw, &mut s, 2);
    assert!(!c.session().is_authenticated());
    s.sim_clear_sent();

    for k in 1..=4 {
        hw.set_temperature(10.0 * k as f32);
        pass(&mut c, &mut hw, &mut s, 2 + 5000 * k);
    }
    assert!(s.sim_sent().is_empty());

    s.sim_server_frame(OPEN);
    s.sim_server_frame("40");
    pass(&mut c, &mut hw, &mut s, 30_000);
    assert!(s
        .sim_sent()
        .iter()
        .any(|f| f == r#"42["authentication","123456789"]"#));
}

#[test]
fn events_before_namespace_connect_are_dropped() {
    let (mut c, mut hw, mut s) = open_link();
    s.sim_server_frame(OPEN);
    s.sim_server_frame(r#"42["authentication",true]"#);
    pass(&mut c, &mut hw, &mut s, 0);
    assert!(!c.session().is_authenticated());
}

#[test]
fn link_drop_after_a_burst_still_deauthenticates() {
    let (mut c, mut hw, mut s) = open_link();
    s.sim_server_frame(OPEN);
    s.sim_server_frame("40");
    s.sim_server_frame(r#"42["authentication",true]"#);
    pass(&mut c, &mut hw, &mut s, 0);
    assert!(c.session().is_authenticated());
    pass(&mut c, &mut hw, &mut s, 1);
    let ticks_before = c.cycle().ticks();

    // More frames than the inbound queue holds, then the link goes down,
    // all delivered within one service pass.
    for _ in 0..12 {
        s.sim_server_frame(r#"42["setpoints",{"001":22}]"#);
    }
    s.sim_drop();
    pass(&mut c, &mut hw, &mut s, 2);
    assert!(!c.session().is_authenticated());

    for k in 1..=3 {
        pass(&mut c, &mut hw, &mut s, 2 + 5000 * k);
    }
    assert_eq!(c.cycle().ticks(), ticks_before);
}
