#![no_main]
use diffsbom::extract::{extract_diff, Dialect};
use libfuzzer_sys::fuzz_target;

/// Fuzz the extraction state machine in every dialect.
fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    for dialect in [Dialect::Plain, Dialect::Compressed, Dialect::Unified] {
        let out = extract_diff(text.lines(), dialect);
        assert!(out.len() <= text.lines().count());
    }
});
