//! Mock hardware and socket for integration tests.
//!
//! Records every actuator write and every outbound event so tests can
//! assert on the full history without touching real GPIO or a network.

use std::collections::{HashMap, VecDeque};

use roomctl::app::ports::{ActuatorPort, SensorPort};
use roomctl::error::TransportError;
use roomctl::link::transport::{EventSocket, RawEvent};
use roomctl::pins;

// ── Raw sample helpers ────────────────────────────────────────

/// ADC code closest to `celsius` on the 0–70 °C sensor.
pub fn temp_raw(celsius: f32) -> u16 {
    (celsius * 4095.0 / 70.0).round() as u16
}

/// ADC code closest to `ppm` on the 0–2000 ppm sensor.
pub fn co2_raw(ppm: f32) -> u16 {
    (ppm * 4095.0 / 2000.0).round() as u16
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    raw: HashMap<u8, u16>,
    pub die_fahrenheit: u8,
    pub writes: Vec<(u8, bool)>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            raw: HashMap::new(),
            die_fahrenheit: 77,
            writes: Vec::new(),
        }
    }

    pub fn set_raw(&mut self, pin: u8, raw: u16) {
        self.raw.insert(pin, raw);
    }

    pub fn set_temperature(&mut self, celsius: f32) {
        self.set_raw(pins::TEMP_INPUT_GPIO, temp_raw(celsius));
    }

    pub fn set_co2(&mut self, ppm: f32) {
        self.set_raw(pins::CO2_INPUT_GPIO, co2_raw(ppm));
    }

    pub fn writes_to(&self, pin: u8) -> Vec<bool> {
        self.writes
            .iter()
            .filter(|(p, _)| *p == pin)
            .map(|(_, on)| *on)
            .collect()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_raw(&mut self, pin: u8) -> u16 {
        self.raw.get(&pin).copied().unwrap_or(0)
    }

    fn read_internal_fahrenheit(&mut self) -> u8 {
        self.die_fahrenheit
    }
}

impl ActuatorPort for MockHardware {
    fn write_actuator(&mut self, pin: u8, on: bool) {
        self.writes.push((pin, on));
    }
}

// ── MockSocket ────────────────────────────────────────────────

/// Scripted inbound queue plus a record of everything emitted.
pub struct MockSocket {
    inbound: VecDeque<RawEvent>,
    pub sent: Vec<(String, String)>,
    pub fail_sends: bool,
}

#[allow(dead_code)]
impl MockSocket {
    pub fn new() -> Self {
        Self {
            inbound: VecDeque::new(),
            sent: Vec::new(),
            fail_sends: false,
        }
    }

    pub fn push(&mut self, name: &str, payload: &str) {
        self.inbound.push_back(RawEvent::new(name, payload).unwrap());
    }

    pub fn push_connect(&mut self) {
        self.inbound.push_back(RawEvent::connected());
    }

    pub fn push_disconnect(&mut self) {
        self.inbound.push_back(RawEvent::disconnected());
    }

    /// Payloads emitted under `event`, in order.
    pub fn payloads(&self, event: &str) -> Vec<&str> {
        self.sent
            .iter()
            .filter(|(e, _)| e == event)
            .map(|(_, p)| p.as_str())
            .collect()
    }

    pub fn sensor_data(&self) -> Vec<&str> {
        self.payloads("sensorData")
    }

    /// `sensorData` payloads mentioning `id` as a measurement.
    pub fn measurements(&self, key: &str) -> Vec<&str> {
        let needle = format!(r#""SensorID":"{key}""#);
        self.sensor_data()
            .into_iter()
            .filter(|p| p.contains(&needle))
            .collect()
    }

    /// `sensorData` payloads reporting an actuator change for `key`.
    pub fn actuator_reports(&self, key: &str) -> Vec<&str> {
        let needle = format!(r#""ControlledItemID":"{key}""#);
        self.sensor_data()
            .into_iter()
            .filter(|p| p.contains(&needle))
            .collect()
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl Default for MockSocket {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSocket for MockSocket {
    fn poll(&mut self) -> Option<RawEvent> {
        self.inbound.pop_front()
    }

    fn emit(&mut self, event: &str, payload: &str) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::SendFailed);
        }
        self.sent.push((event.to_string(), payload.to_string()));
        Ok(())
    }
}
