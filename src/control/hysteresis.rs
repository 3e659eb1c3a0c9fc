//! On/off setpoint controller for binary actuators.
//!
//! The decision itself is a single comparison against the setpoint; the
//! controller adds edge triggering on top of it so that the relay is only
//! written (and the server only told) when the commanded state changes.

use serde::{Deserialize, Serialize};

/// Which side of the setpoint energises the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// On at or below the setpoint (heater: on when the room is cold).
    Direct,
    /// On above the setpoint (ventilation: on when CO2 is high).
    Reversed,
}

/// Desired actuator state for `current` against `setpoint`.
///
/// Both polarities share the one `<=` comparison, so an exact hit on the
/// setpoint is "on" for [`Polarity::Direct`] and "off" for
/// [`Polarity::Reversed`].
pub fn desired_state(setpoint: f32, current: f32, polarity: Polarity) -> bool {
    let below = current <= setpoint;
    match polarity {
        Polarity::Direct => below,
        Polarity::Reversed => !below,
    }
}

/// Edge-triggered actuator driver for one channel.
#[derive(Debug, Clone)]
pub struct HysteresisController {
    polarity: Polarity,
    /// Last state actually written to the actuator.
    commanded: bool,
}

impl HysteresisController {
    /// New controller with the actuator assumed inactive.
    pub fn new(polarity: Polarity) -> Self {
        Self {
            polarity,
            commanded: false,
        }
    }

    /// Evaluate one sample.
    ///
    /// Returns `Some(state)` when the actuator must be written to `state`;
    /// `None` when the desired state equals the commanded one.
    pub fn update(&mut self, setpoint: f32, current: f32) -> Option<bool> {
        let desired = desired_state(setpoint, current, self.polarity);
        if desired == self.commanded {
            return None;
        }
        self.commanded = desired;
        Some(desired)
    }

    /// Reset the commanded-state cache to inactive (surveillance entry).
    ///
    /// Returns `true` if the actuator was on.
    pub fn force_inactive(&mut self) -> bool {
        core::mem::replace(&mut self.commanded, false)
    }

    pub fn commanded(&self) -> bool {
        self.commanded
    }
}
