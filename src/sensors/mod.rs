//! Sensor subsystem: per-channel conversion and the aggregating [`SensorReader`].
//!
//! The reader owns one driver per measured channel and turns raw port
//! samples into physical units.  Typed reads return a [`SensorError`] the
//! cycle uses to skip a channel; key-based reads collapse every failure
//! into [`SENSOR_ERROR_SENTINEL`].

pub mod analog;
pub mod internal_temp;

use log::warn;

use crate::app::channel::ChannelId;
use crate::app::ports::SensorPort;
use crate::error::SensorError;
use crate::pins;
use analog::{AnalogSensor, CO2_FULL_SCALE_PPM, TEMPERATURE_FULL_SCALE_C};

/// Value returned by [`SensorReader::read_key`] when nothing can be read.
pub const SENSOR_ERROR_SENTINEL: f32 = -1000.0;

/// Converts raw samples into physical values for every channel.
#[derive(Debug, Clone)]
pub struct SensorReader {
    temperature: AnalogSensor,
    co2: AnalogSensor,
}

impl SensorReader {
    pub fn new(temperature: AnalogSensor, co2: AnalogSensor) -> Self {
        Self { temperature, co2 }
    }

    /// Standard board wiring.
    pub fn board_default() -> Self {
        Self::new(
            AnalogSensor::new(pins::TEMP_INPUT_GPIO, TEMPERATURE_FULL_SCALE_C),
            AnalogSensor::new(pins::CO2_INPUT_GPIO, CO2_FULL_SCALE_PPM),
        )
    }

    /// Unrounded value for `id`.
    pub fn read(&self, id: ChannelId, hw: &mut impl SensorPort) -> Result<f32, SensorError> {
        match id {
            ChannelId::Temperature => self.temperature.read(hw).map(|r| r.value),
            ChannelId::Co2 => self.co2.read(hw).map(|r| r.value),
            ChannelId::InternalTemperature => Ok(internal_temp::read_celsius(hw)),
        }
    }

    /// Value for a server key; [`SENSOR_ERROR_SENTINEL`] on any failure.
    pub fn read_key(&self, key: &str, hw: &mut impl SensorPort) -> f32 {
        let result = ChannelId::from_key(key)
            .ok_or(SensorError::UnknownChannel)
            .and_then(|id| self.read(id, hw));
        match result {
            Ok(v) => v,
            Err(e) => {
                warn!("sensor '{key}': {e}");
                SENSOR_ERROR_SENTINEL
            }
        }
    }
}

impl Default for SensorReader {
    fn default() -> Self {
        Self::board_default()
    }
}
