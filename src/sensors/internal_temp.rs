//! On-die temperature sensor.
//!
//! The ROM routine reports whole degrees Fahrenheit; the server expects
//! Celsius.

use crate::app::ports::SensorPort;

pub fn fahrenheit_to_celsius(f: f32) -> f32 {
    (f - 32.0) / 1.8
}

/// Chip temperature in °C.
pub fn read_celsius(hw: &mut impl SensorPort) -> f32 {
    fahrenheit_to_celsius(f32::from(hw.read_internal_fahrenheit()))
}
