#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 || data.len() > 32 * 1024 {
        return;
    }
    // First two bytes pick the cursor; the rest is the document. Out-of-range
    // positions must come back as errors, not panics.
    let line = data[0] as usize;
    let column = data[1] as usize;
    let src = String::from_utf8_lossy(&data[2..]);
    let engine = pythia::Engine::new();
    let _ = engine.complete(&src, "<fuzz>", line, column);
});
