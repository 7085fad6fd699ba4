//! Fuzz target for the `cfd fit` sample reader.

#![no_main]

use cfd_cli::commands::fit::parse_numbers;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(values) = parse_numbers(text, "fuzz") {
        let _ = cfd_dist::WeightedSamples::unweighted(&values);
    }
});
