#![no_main]

use jmh_compare::loader::parse_results;
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Malformed input must come back as an error, never a panic
        if let Ok(parsed) = parse_results(input, Path::new("fuzz.json")) {
            for record in &parsed.records {
                assert!(record.score.is_finite());
                assert!(record.score_error >= 0.0);
            }
        }
    }
});
