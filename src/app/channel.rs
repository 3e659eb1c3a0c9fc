//! Channel identities and the per-channel regulation state.
//!
//! Every quantity the robot measures has a [`ChannelId`] whose string key is
//! shared with the server.  The two regulated channels (temperature and
//! CO2) each own a [`Channel`]: operating mode, edge-triggered controller
//! and reporting gate.  The internal die temperature is report-only and
//! just has a gate.

use core::fmt;

use crate::config::ControllerConfig;
use crate::control::hysteresis::{HysteresisController, Polarity};
use crate::control::threshold::ThresholdGate;
use crate::pins;

// ───────────────────────────────────────────────────────────────
// Channel identity
// ───────────────────────────────────────────────────────────────

/// Closed set of channels known to the server protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    /// Room temperature, drives the heater.
    Temperature,
    /// Room CO2, drives the ventilation.
    Co2,
    /// Chip die temperature, diagnostic only.
    InternalTemperature,
}

impl ChannelId {
    /// Channels with an actuator, in processing order.
    pub const REGULATED: [ChannelId; 2] = [Self::Temperature, Self::Co2];

    /// Server-side key.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Temperature => "001",
            Self::Co2 => "002",
            Self::InternalTemperature => "003",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "001" => Some(Self::Temperature),
            "002" => Some(Self::Co2),
            "003" => Some(Self::InternalTemperature),
            _ => None,
        }
    }

    pub const fn is_regulated(self) -> bool {
        !matches!(self, Self::InternalTemperature)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "temperature"),
            Self::Co2 => write!(f, "co2"),
            Self::InternalTemperature => write!(f, "internal-temperature"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Regulated channel
// ───────────────────────────────────────────────────────────────

/// Operating mode of a regulated channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// Report only; the actuator stays off.
    Surveillance,
    /// Follow `setpoint` with the actuator.
    Active { setpoint: f32 },
}

/// One regulated quantity and everything the cycle remembers about it.
#[derive(Debug, Clone)]
pub struct Channel {
    id: ChannelId,
    actuator_pin: u8,
    mode: Mode,
    controller: HysteresisController,
    gate: ThresholdGate,
}

impl Channel {
    /// New channel in surveillance mode with its actuator off.
    pub fn new(id: ChannelId, actuator_pin: u8, polarity: Polarity, tolerance: f32) -> Self {
        Self {
            id,
            actuator_pin,
            mode: Mode::Surveillance,
            controller: HysteresisController::new(polarity),
            gate: ThresholdGate::new(tolerance),
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn actuator_pin(&self) -> u8 {
        self.actuator_pin
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn setpoint(&self) -> Option<f32> {
        match self.mode {
            Mode::Active { setpoint } => Some(setpoint),
            Mode::Surveillance => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.mode, Mode::Active { .. })
    }

    /// Last state written to the actuator.
    pub fn commanded(&self) -> bool {
        self.controller.commanded()
    }

    pub fn controller_mut(&mut self) -> &mut HysteresisController {
        &mut self.controller
    }

    pub fn gate(&self) -> &ThresholdGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut ThresholdGate {
        &mut self.gate
    }

    /// Switch to (or stay in) active regulation with a new setpoint.
    pub fn set_active(&mut self, setpoint: f32) {
        self.mode = Mode::Active { setpoint };
    }

    /// Switch to surveillance.
    ///
    /// Returns `true` only on the transition out of active mode, which is
    /// when the caller must force the actuator off.  The commanded-state
    /// cache is reset to inactive either way.
    pub fn enter_surveillance(&mut self) -> bool {
        let was_active = self.is_active();
        self.mode = Mode::Surveillance;
        self.controller.force_inactive();
        was_active
    }
}

// ───────────────────────────────────────────────────────────────
// Channel table
// ───────────────────────────────────────────────────────────────

/// Every channel the controller owns, iterated in a fixed order.
#[derive(Debug, Clone)]
pub struct ChannelTable {
    temperature: Channel,
    co2: Channel,
    internal_gate: ThresholdGate,
}

impl ChannelTable {
    pub fn new(temperature: Channel, co2: Channel, internal_gate: ThresholdGate) -> Self {
        Self {
            temperature,
            co2,
            internal_gate,
        }
    }

    /// Standard board wiring with tolerances and polarities from `config`.
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(
            Channel::new(
                ChannelId::Temperature,
                pins::HEATER_OUTPUT_GPIO,
                config.heater_polarity,
                config.temperature_tolerance,
            ),
            Channel::new(
                ChannelId::Co2,
                pins::VENTILATION_OUTPUT_GPIO,
                config.ventilation_polarity,
                config.co2_tolerance,
            ),
            ThresholdGate::new(config.internal_temperature_tolerance),
        )
    }

    /// Regulated channel by id; `None` for the diagnostic channel.
    pub fn get(&self, id: ChannelId) -> Option<&Channel> {
        match id {
            ChannelId::Temperature => Some(&self.temperature),
            ChannelId::Co2 => Some(&self.co2),
            ChannelId::InternalTemperature => None,
        }
    }

    pub fn get_mut(&mut self, id: ChannelId) -> Option<&mut Channel> {
        match id {
            ChannelId::Temperature => Some(&mut self.temperature),
            ChannelId::Co2 => Some(&mut self.co2),
            ChannelId::InternalTemperature => None,
        }
    }

    /// Regulated channels in processing order (temperature, then CO2).
    pub fn regulated_mut(&mut self) -> [&mut Channel; 2] {
        [&mut self.temperature, &mut self.co2]
    }

    pub fn internal_gate(&self) -> &ThresholdGate {
        &self.internal_gate
    }

    pub fn internal_gate_mut(&mut self) -> &mut ThresholdGate {
        &mut self.internal_gate
    }

    /// Forget every last-reported value so the next tick reports all.
    pub fn reset_gates(&mut self) {
        self.temperature.gate_mut().reset();
        self.co2.gate_mut().reset();
        self.internal_gate.reset();
    }
}
