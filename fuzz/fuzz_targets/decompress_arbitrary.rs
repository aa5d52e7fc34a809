#![no_main]
use huffpack::{compress, decompress};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must be rejected or decoded, never panic.
    if let Ok(restored) = decompress(data) {
        // Anything that decodes re-encodes to a container that decodes the same.
        let packed = compress(&restored).unwrap();
        assert_eq!(decompress(&packed).unwrap(), restored);
    }
});
