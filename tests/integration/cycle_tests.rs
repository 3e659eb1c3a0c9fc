//! Integration tests for the Controller → RegulationCycle → actuators pipeline.
//!
//! Every test authenticates through the same inbound events a server would
//! send, then advances a fake clock across regulation intervals.

use crate::mock_hw::{MockHardware, MockSocket};

use roomctl::app::channel::{ChannelId, Mode};
use roomctl::app::service::Controller;
use roomctl::config::ControllerConfig;
use roomctl::link::transport::RawEvent;
use roomctl::pins::{HEATER_OUTPUT_GPIO, VENTILATION_OUTPUT_GPIO};

const INTERVAL: u64 = 5000;

/// Controller that has completed the handshake at t=0.
fn authenticated() -> (Controller, MockHardware, MockSocket) {
    let mut c = Controller::new(ControllerConfig::default());
    let mut hw = MockHardware::new();
    let mut sock = MockSocket::new();
    sock.push_connect();
    sock.push("authentication", "true");
    c.step(0, &mut hw, &mut sock);
    assert!(c.session().is_authenticated());
    (c, hw, sock)
}

/// Deliver a `setpoints` event without running a loop pass, so the first
/// `step` afterwards is the first regulation tick.
fn apply_setpoints(c: &mut Controller, hw: &mut MockHardware, sock: &mut MockSocket, json: &str) {
    let raw = RawEvent::new("setpoints", json).unwrap();
    c.handle_inbound(&raw, hw, sock);
}

// ── Heater scenario ───────────────────────────────────────────

#[test]
fn heater_turns_on_once_and_only_large_moves_are_reported() {
    let (mut c, mut hw, mut sock) = authenticated();
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"001":22.0}"#);

    // First tick establishes last-reported = 20.0.
    hw.set_temperature(20.0);
    c.step(1, &mut hw, &mut sock);
    assert_eq!(hw.writes_to(HEATER_OUTPUT_GPIO), [true]);
    assert_eq!(
        sock.actuator_reports("001"),
        [r#"{"ControlledItemID":"001","value":1}"#]
    );
    assert_eq!(sock.measurements("001"), [r#"{"SensorID":"001","value":20.0}"#]);
    sock.clear();

    let readings = [20.05, 20.3, 20.1];
    for (i, t) in readings.iter().enumerate() {
        hw.set_temperature(*t);
        c.step(1 + INTERVAL * (i as u64 + 1), &mut hw, &mut sock);
    }

    assert_eq!(sock.measurements("001"), [r#"{"SensorID":"001","value":20.3}"#]);
    assert!(sock.actuator_reports("001").is_empty(), "heater stays on silently");
    assert_eq!(hw.writes_to(HEATER_OUTPUT_GPIO), [true]);
    assert_eq!(c.cycle().ticks(), 4);
}

// ── Ventilation scenario ──────────────────────────────────────

#[test]
fn ventilation_reversed_switches_on_above_setpoint() {
    let (mut c, mut hw, mut sock) = authenticated();
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"002":800}"#);

    hw.set_co2(750.0);
    c.step(1, &mut hw, &mut sock);
    assert!(hw.writes_to(VENTILATION_OUTPUT_GPIO).is_empty());
    assert!(sock.actuator_reports("002").is_empty());

    hw.set_co2(820.0);
    c.step(1 + INTERVAL, &mut hw, &mut sock);
    assert_eq!(hw.writes_to(VENTILATION_OUTPUT_GPIO), [true]);
    assert_eq!(
        sock.actuator_reports("002"),
        [r#"{"ControlledItemID":"002","value":1}"#]
    );
}

#[test]
fn exact_setpoint_is_on_for_heater_and_off_for_ventilation() {
    let (mut c, mut hw, mut sock) = authenticated();
    // 70 °C and 2000 ppm are exact full-scale codes.
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"001":70,"002":2000}"#);
    hw.set_temperature(70.0);
    hw.set_co2(2000.0);
    c.step(1, &mut hw, &mut sock);
    assert_eq!(hw.writes_to(HEATER_OUTPUT_GPIO), [true]);
    assert!(hw.writes_to(VENTILATION_OUTPUT_GPIO).is_empty());
}

// ── Surveillance ──────────────────────────────────────────────

#[test]
fn surveillance_forces_one_off_write_then_no_control() {
    let (mut c, mut hw, mut sock) = authenticated();
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"001":22.0}"#);
    hw.set_temperature(18.0);
    c.step(1, &mut hw, &mut sock);
    assert_eq!(hw.writes_to(HEATER_OUTPUT_GPIO), [true]);

    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"001":"none"}"#);
    assert_eq!(hw.writes_to(HEATER_OUTPUT_GPIO), [true, false]);
    assert_eq!(
        c.channels().get(ChannelId::Temperature).unwrap().mode(),
        Mode::Surveillance
    );
    sock.clear();

    // Cold room, but the channel only reports now.
    for k in 1..=3 {
        hw.set_temperature(10.0 + k as f32);
        c.step(1 + INTERVAL * k, &mut hw, &mut sock);
    }
    assert_eq!(hw.writes_to(HEATER_OUTPUT_GPIO), [true, false]);
    assert!(sock.actuator_reports("001").is_empty());
    assert_eq!(sock.measurements("001").len(), 3);

    // A repeated "none" writes nothing.
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"001":"none"}"#);
    assert_eq!(hw.writes_to(HEATER_OUTPUT_GPIO), [true, false]);
}

#[test]
fn reactivation_after_surveillance_is_a_fresh_edge() {
    let (mut c, mut hw, mut sock) = authenticated();
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"001":22.0}"#);
    hw.set_temperature(18.0);
    c.step(1, &mut hw, &mut sock);
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"001":"none"}"#);
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"001":21.0}"#);
    c.step(1 + INTERVAL, &mut hw, &mut sock);
    assert_eq!(hw.writes_to(HEATER_OUTPUT_GPIO), [true, false, true]);
    assert_eq!(sock.actuator_reports("001").len(), 2);
}

// ── Malformed setpoints ───────────────────────────────────────

#[test]
fn invalid_setpoint_payload_changes_nothing() {
    let (mut c, mut hw, mut sock) = authenticated();
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"001":21.0,"002":"bogus"}"#);
    apply_setpoints(&mut c, &mut hw, &mut sock, "not json");
    apply_setpoints(&mut c, &mut hw, &mut sock, "[21.0]");
    for id in ChannelId::REGULATED {
        assert_eq!(c.channels().get(id).unwrap().mode(), Mode::Surveillance);
    }
    assert!(hw.writes.is_empty());
}

#[test]
fn partial_setpoints_leave_other_channel_alone() {
    let (mut c, mut hw, mut sock) = authenticated();
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"001":21.0,"002":900}"#);
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"002":"none","777":1}"#);
    assert_eq!(
        c.channels().get(ChannelId::Temperature).unwrap().setpoint(),
        Some(21.0)
    );
    assert_eq!(
        c.channels().get(ChannelId::Co2).unwrap().mode(),
        Mode::Surveillance
    );
}

// ── Timing ────────────────────────────────────────────────────

#[test]
fn ticks_respect_the_interval() {
    let (mut c, mut hw, mut sock) = authenticated();
    for now in (1..INTERVAL * 3).step_by(250) {
        c.step(now, &mut hw, &mut sock);
    }
    assert_eq!(c.cycle().ticks(), 3);
}

#[test]
fn sensor_range_error_skips_channel_for_one_tick() {
    let (mut c, mut hw, mut sock) = authenticated();
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"001":22.0}"#);
    hw.set_raw(roomctl::pins::TEMP_INPUT_GPIO, 4096);
    c.step(1, &mut hw, &mut sock);
    assert!(hw.writes_to(HEATER_OUTPUT_GPIO).is_empty());
    assert!(sock.measurements("001").is_empty());

    hw.set_temperature(19.0);
    c.step(1 + INTERVAL, &mut hw, &mut sock);
    assert_eq!(hw.writes_to(HEATER_OUTPUT_GPIO), [true]);
    assert_eq!(sock.measurements("001").len(), 1);
}

// ── Disconnect ────────────────────────────────────────────────

#[test]
fn disconnect_silences_reports_until_reauthenticated() {
    let (mut c, mut hw, mut sock) = authenticated();
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"001":22.0}"#);
    hw.set_temperature(18.0);
    c.step(1, &mut hw, &mut sock);

    sock.push_disconnect();
    c.step(2, &mut hw, &mut sock);
    sock.clear();

    for k in 1..=10 {
        hw.set_temperature(10.0 + k as f32);
        c.step(2 + INTERVAL * k, &mut hw, &mut sock);
    }
    assert!(sock.sensor_data().is_empty());
    // Actuators keep their last state through the outage.
    assert_eq!(hw.writes_to(HEATER_OUTPUT_GPIO), [true]);

    sock.push_connect();
    sock.push("authentication", "true");
    c.step(60_000, &mut hw, &mut sock);
    assert_eq!(sock.payloads("robotID"), ["\"001\""]);
    assert!(sock.sensor_data().is_empty());

    // Gates were reset: every channel reports on the first tick.
    c.step(60_001, &mut hw, &mut sock);
    assert_eq!(sock.measurements("001").len(), 1);
    assert_eq!(sock.measurements("002").len(), 1);
    assert_eq!(sock.measurements("003").len(), 1);
}

#[test]
fn emit_failures_still_advance_channel_state() {
    let (mut c, mut hw, mut sock) = authenticated();
    apply_setpoints(&mut c, &mut hw, &mut sock, r#"{"001":22.0}"#);
    sock.fail_sends = true;
    hw.set_temperature(20.0);
    c.step(1, &mut hw, &mut sock);

    let temp = c.channels().get(ChannelId::Temperature).unwrap();
    assert!(temp.commanded());
    assert_eq!(temp.gate().last_reported(), Some(20.0));
    assert_eq!(hw.writes_to(HEATER_OUTPUT_GPIO), [true]);

    sock.fail_sends = false;
    c.step(1 + INTERVAL, &mut hw, &mut sock);
    assert!(sock.sensor_data().is_empty(), "nothing is re-sent");
}
