//! Room controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

extern crate alloc;

#[cfg(all(target_os = "espidf", not(feature = "espidf")))]
compile_error!("building for ESP-IDF requires `--features espidf`");

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod link;
pub mod pins;
pub mod sensors;
pub mod timer;

// Re-export the ESP-IDF-facing modules so the crate compiles on the host;
// the real implementations are guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;
