//! GPIO / peripheral pin assignments for the room robot board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensors: Analog (ADC1, 12-bit)
// ---------------------------------------------------------------------------

/// Room temperature transmitter, 0–3.3 V maps to 0–70 °C.
/// ADC1 channel 7 on the ESP32.
pub const TEMP_INPUT_GPIO: u8 = 35;

/// CO2 transmitter, 0–3.3 V maps to 0–2000 ppm.
/// ADC1 channel 6 on the ESP32.
pub const CO2_INPUT_GPIO: u8 = 34;

// ---------------------------------------------------------------------------
// Actuators: Digital outputs (relay drivers, active HIGH)
// ---------------------------------------------------------------------------

/// Heater relay.
pub const HEATER_OUTPUT_GPIO: u8 = 4;

/// Ventilation fan relay.
pub const VENTILATION_OUTPUT_GPIO: u8 = 5;

/// Map an analog input GPIO to its ADC1 channel number.
pub const fn adc1_channel(gpio: u8) -> Option<u32> {
    match gpio {
        36 => Some(0),
        37 => Some(1),
        38 => Some(2),
        39 => Some(3),
        32 => Some(4),
        33 => Some(5),
        34 => Some(6),
        35 => Some(7),
        _ => None,
    }
}
