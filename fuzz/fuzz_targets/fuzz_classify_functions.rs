#![no_main]
use diffsbom::config::FunctionsConfig;
use diffsbom::functions::FunctionClassifier;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(classifier) = FunctionClassifier::from_config(&FunctionsConfig::default()) {
            let set = classifier.classify_functions(s.lines());
            assert!(set.added.is_disjoint(&set.removed));
            assert!(set.added.is_disjoint(&set.modified));
            assert!(set.removed.is_disjoint(&set.modified));
        }
    }
});
