//! Controller configuration parameters.
//!
//! All tunable parameters for the room robot.  Defaults reproduce the
//! factory setup; a partial JSON document can override any subset of them
//! via [`ControllerConfig::from_json`].

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::control::hysteresis::Polarity;
use crate::error::{Error, Result};

/// Core controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Regulation ---
    /// Period between regulation ticks (milliseconds).
    pub regulation_interval_ms: u32,
    /// Reporting band for the room temperature (°C).
    pub temperature_tolerance: f32,
    /// Reporting band for the CO2 concentration (ppm).
    pub co2_tolerance: f32,
    /// Reporting band for the chip's internal temperature (°C).
    pub internal_temperature_tolerance: f32,
    /// Heater switches on at or below the setpoint.
    pub heater_polarity: Polarity,
    /// Ventilation switches on above the setpoint.
    pub ventilation_polarity: Polarity,

    // --- Identity ---
    /// Pre-shared credential sent on every connect.
    pub server_credential: String<32>,
    /// Identity token sent after a successful authentication.
    pub robot_id: String<16>,

    // --- Server ---
    pub server_host: String<64>,
    pub server_port: u16,
    /// Socket.IO endpoint path, including the query string.
    pub server_path: String<64>,

    // --- Wi-Fi ---
    pub wifi_ssid: String<32>,
    pub wifi_password: String<64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Regulation
            regulation_interval_ms: 5000,
            temperature_tolerance: 0.2,
            co2_tolerance: 1.0,
            internal_temperature_tolerance: 0.2,
            heater_polarity: Polarity::Direct,
            ventilation_polarity: Polarity::Reversed,

            // Identity
            server_credential: fixed("123456789"),
            robot_id: fixed("001"),

            // Server
            server_host: fixed("192.168.137.105"),
            server_port: 3000,
            server_path: fixed("/socket.io/?EIO=3&transport=websocket"),

            // Wi-Fi
            wifi_ssid: fixed("Example-network-SSID"),
            wifi_password: fixed("password"),
        }
    }
}

impl ControllerConfig {
    /// Parse a (possibly partial) JSON override and validate the result.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("config JSON is malformed"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the controller misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.regulation_interval_ms == 0 {
            return Err(Error::Config("regulation_interval_ms must be non-zero"));
        }
        for tolerance in [
            self.temperature_tolerance,
            self.co2_tolerance,
            self.internal_temperature_tolerance,
        ] {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(Error::Config("tolerances must be finite and non-negative"));
            }
        }
        if self.server_credential.is_empty() {
            return Err(Error::Config("server_credential must not be empty"));
        }
        if self.robot_id.is_empty() {
            return Err(Error::Config("robot_id must not be empty"));
        }
        if self.server_host.is_empty() {
            return Err(Error::Config("server_host must not be empty"));
        }
        if !self.server_path.starts_with('/') {
            return Err(Error::Config("server_path must start with '/'"));
        }
        Ok(())
    }

    /// WebSocket URI of the supervisory server.
    pub fn server_uri(&self) -> alloc::string::String {
        alloc::format!(
            "ws://{}:{}{}",
            self.server_host, self.server_port, self.server_path
        )
    }
}

/// Copy a literal into a fixed-capacity string; literals that do not fit
/// are left empty and caught by [`ControllerConfig::validate`].
fn fixed<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    if out.push_str(s).is_err() {
        out.clear();
    }
    out
}
