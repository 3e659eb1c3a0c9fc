//! Linear analog sensors on the 12-bit ADC.
//!
//! Both room sensors output a voltage proportional to the measured
//! quantity across the full ADC span, so conversion is one ratio:
//! `value = raw / 4095 × full_scale`.

use crate::app::ports::SensorPort;
use crate::error::SensorError;

/// Largest raw sample the ADC can produce.
pub const ADC_MAX: u16 = 4095;

/// Full-scale value of the temperature sensor, °C.
pub const TEMPERATURE_FULL_SCALE_C: f32 = 70.0;

/// Full-scale value of the CO2 sensor, ppm.
pub const CO2_FULL_SCALE_PPM: f32 = 2000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogReading {
    pub raw: u16,
    pub value: f32,
}

/// Scale a raw sample to physical units.
pub fn scale(raw: u16, full_scale: f32) -> Result<f32, SensorError> {
    if raw > ADC_MAX {
        return Err(SensorError::OutOfRange { raw });
    }
    Ok(f32::from(raw) / f32::from(ADC_MAX) * full_scale)
}

/// One ADC-backed sensor.
#[derive(Debug, Clone)]
pub struct AnalogSensor {
    pin: u8,
    full_scale: f32,
}

impl AnalogSensor {
    pub fn new(pin: u8, full_scale: f32) -> Self {
        Self { pin, full_scale }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn read(&self, hw: &mut impl SensorPort) -> Result<AnalogReading, SensorError> {
        let raw = hw.read_raw(self.pin);
        let value = scale(raw, self.full_scale)?;
        Ok(AnalogReading { raw, value })
    }
}
