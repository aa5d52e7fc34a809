#![no_main]
use huffpack::{compress, decompress};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let packed = compress(data).unwrap();
    let restored = decompress(&packed).unwrap();
    assert_eq!(data, &restored[..]);
});
