//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (ADC, relays, clock) implement these traits.  The
//! [`Controller`](super::service::Controller) consumes them via generics, so
//! the domain core never touches hardware directly.  The network side has
//! its own port, [`EventSocket`](crate::link::transport::EventSocket).

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: raw samples, no scaling.
pub trait SensorPort {
    /// One 12-bit ADC conversion on `pin`.
    fn read_raw(&mut self, pin: u8) -> u16;

    /// Chip die temperature in °F, as the on-die sensor reports it.
    fn read_internal_fahrenheit(&mut self) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the binary actuators.
pub trait ActuatorPort {
    /// Drive the actuator on `pin` (true = energised).
    fn write_actuator(&mut self, pin: u8, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}
