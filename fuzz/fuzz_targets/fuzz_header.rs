#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header, palette and inspect must never panic
    let _ = zenpcx::decode_palette(data);
    let _ = zenpcx::inspect(data);

    if let Ok(header) = zenpcx::decode_header(data) {
        // Serialization reproduces the 128 input bytes exactly
        assert_eq!(&header.to_bytes()[..], &data[..128]);
        let _ = header.to_string();
    }
});
