#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz signature text parsing.
///
/// Any accepted signature must survive normalization and render back to
/// text without panicking.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(sig) = api_evolution::model::Signature::parse(s) {
            let _ = sig.normalized().to_string();
        }
    }
});
