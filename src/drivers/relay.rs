//! Binary relay driver (heater, ventilation).
//!
//! A dumb actuator: it remembers the last level written and reports pin
//! failures, nothing else.  Generic over any `embedded-hal` output pin.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::error::ActuatorError;

pub struct Relay<P: OutputPin> {
    pin: P,
    gpio: u8,
    on: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Wrap `pin`; the relay is assumed released.
    pub fn new(pin: P, gpio: u8) -> Self {
        Self {
            pin,
            gpio,
            on: false,
        }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if let Err(e) = result {
            warn!("relay GPIO{}: write failed: {e:?}", self.gpio);
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.on = on;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn gpio(&self) -> u8 {
        self.gpio
    }
}
