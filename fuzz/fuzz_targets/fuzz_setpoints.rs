//! Fuzz target: `SetpointUpdate::parse`
//!
//! Any payload either fails with a typed error or yields at most one
//! finite entry per regulated channel.
//!
//! cargo fuzz run fuzz_setpoints

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomctl::link::messages::{SetpointUpdate, SetpointValue};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(update) = SetpointUpdate::parse(text) else {
        return;
    };
    assert!(update.entries().len() <= 2);
    for (id, value) in update.entries() {
        assert!(id.is_regulated());
        if let SetpointValue::Target(v) = value {
            assert!(v.is_finite());
        }
    }
});
