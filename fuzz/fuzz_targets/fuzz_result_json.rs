#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz analysis result deserialization.
///
/// Loading runs the full sequence validation, so arbitrary JSON exercises
/// every invariant check on the load path.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(result) = api_evolution::AnalysisResult::from_json(s) {
            let _ = result.summary();
            let _ = result.to_json(false);
        }
    }
});
