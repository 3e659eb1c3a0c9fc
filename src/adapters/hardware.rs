//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns both relays and reads the ADC through [`hw_init`], exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  On non-espidf targets
//! the underlying accessors are simulation statics.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::hw_init;
use crate::drivers::relay::Relay;
use crate::error::ActuatorError;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<H: OutputPin, V: OutputPin> {
    heater: Relay<H>,
    ventilation: Relay<V>,
}

impl<H: OutputPin, V: OutputPin> HardwareAdapter<H, V> {
    pub fn new(heater: Relay<H>, ventilation: Relay<V>) -> Self {
        Self {
            heater,
            ventilation,
        }
    }

    pub fn heater(&self) -> &Relay<H> {
        &self.heater
    }

    pub fn ventilation(&self) -> &Relay<V> {
        &self.ventilation
    }

    fn drive(&mut self, pin: u8, on: bool) -> Result<(), ActuatorError> {
        if pin == self.heater.gpio() {
            self.heater.set(on)
        } else if pin == self.ventilation.gpio() {
            self.ventilation.set(on)
        } else {
            Err(ActuatorError::UnknownPin(pin))
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<H: OutputPin, V: OutputPin> SensorPort for HardwareAdapter<H, V> {
    fn read_raw(&mut self, pin: u8) -> u16 {
        hw_init::adc_read(pin)
    }

    fn read_internal_fahrenheit(&mut self) -> u8 {
        hw_init::internal_temperature_fahrenheit()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<H: OutputPin, V: OutputPin> ActuatorPort for HardwareAdapter<H, V> {
    fn write_actuator(&mut self, pin: u8, on: bool) {
        if let Err(e) = self.drive(pin, on) {
            warn!("actuator: {e}");
        }
    }
}
