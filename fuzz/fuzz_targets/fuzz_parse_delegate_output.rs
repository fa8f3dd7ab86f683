#![no_main]
use diffsbom::compare::parse_delegate_output;
use libfuzzer_sys::fuzz_target;

/// Fuzz the tree-diff delegate report parser.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_delegate_output(s);
    }
});
