//! Fuzz target for cfd.json settings parsing.
//!
//! Parsing and validation must reject bad input with an error, never a panic.

#![no_main]

use cfd_cli::Settings;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(settings) = serde_json::from_slice::<Settings>(data) {
        let _ = settings.validate();
    }
});
