//! Decision functions run by the regulation cycle.
//!
//! - [`hysteresis`]: on/off setpoint control with edge-triggered writes.
//! - [`threshold`]: report-on-change gate for measurements.

pub mod hysteresis;
pub mod threshold;
