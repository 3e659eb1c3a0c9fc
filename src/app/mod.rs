//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the room controller:
//! session handshake, channel modes, and the regulation cycle.  All
//! interaction with hardware and the server happens through **port traits**
//! ([`ports`] and [`EventSocket`](crate::link::transport::EventSocket)),
//! keeping this layer fully testable without real peripherals.

pub mod channel;
pub mod cycle;
pub mod ports;
pub mod service;
pub mod session;
