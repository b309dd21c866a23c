#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }
    let src = String::from_utf8_lossy(data);
    // The checker must classify, never panic, on arbitrary input.
    let _ = pythia::check_syntax(&src);
});
