use huffpack::{
    compress, decompress, CodeTable, Container, HuffmanEncoder, HuffmanTree, SerializedTree,
};
use proptest::prelude::*;

/// Bytes drawn mostly from a small alphabet, with occasional outliers.
fn skewed_bytes(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            20 => Just(b'e'),
            3 => prop::sample::select(b"tao".to_vec()),
            1 => any::<u8>(),
        ],
        len,
    )
}

proptest! {
    #[test]
    fn test_roundtrip(input in prop::collection::vec(any::<u8>(), 0..2000)) {
        let packed = compress(&input).unwrap();
        prop_assert_eq!(decompress(&packed).unwrap(), input);
    }

    #[test]
    fn test_roundtrip_skewed(input in skewed_bytes(0..4000)) {
        let packed = compress(&input).unwrap();
        prop_assert_eq!(decompress(&packed).unwrap(), input);
    }

    #[test]
    fn test_skewed_payload_is_smaller(input in skewed_bytes(256..4000)) {
        let container = Container::compress(&input).unwrap();
        prop_assert!(container.payload().len() < 8 * input.len());
    }

    #[test]
    fn test_codes_are_prefix_free(input in prop::collection::vec(any::<u8>(), 1..600)) {
        let table = CodeTable::from_tree(&HuffmanTree::from_bytes(&input).unwrap());
        let codes: Vec<Vec<bool>> = table.iter().map(|(_, c)| c.iter().collect()).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    prop_assert!(!b.starts_with(a), "code {:?} is a prefix of {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_payload_length_matches_code_table(input in prop::collection::vec(any::<u8>(), 0..1000)) {
        let encoder = HuffmanEncoder::from_bytes(&input).unwrap();
        let payload = encoder.encode(&input).unwrap();
        prop_assert_eq!(payload.len() as u64, encoder.encoded_len());
    }

    #[test]
    fn test_tree_shape_matches_symbols(input in prop::collection::vec(any::<u8>(), 0..1000)) {
        let tree = HuffmanTree::from_bytes(&input).unwrap();
        let serialized = tree.serialize();
        prop_assert_eq!(serialized.leaf_count(), serialized.symbols().len());

        let restored = serialized.to_tree().unwrap();
        prop_assert_eq!(restored.leaf_count(), serialized.symbols().len());
        prop_assert_eq!(restored.symbols(), serialized.symbols().to_vec());
        prop_assert_eq!(SerializedTree::from_tree(&restored), serialized);
    }

    #[test]
    fn test_decompress_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = decompress(&bytes);
    }
}

#[test]
fn test_degenerate_inputs() {
    assert_eq!(decompress(&compress(b"").unwrap()).unwrap(), b"");
    assert_eq!(decompress(&compress(b"aaaa").unwrap()).unwrap(), b"aaaa");
}

#[test]
fn test_abracadabra() {
    let container = Container::compress(b"abracadabra").unwrap();
    assert!(container.payload().len() < 11 * 8);

    let bytes = container.to_bytes().unwrap();
    assert_eq!(decompress(&bytes).unwrap(), b"abracadabra");
}

#[test]
fn test_every_byte_as_sole_symbol() {
    for byte in 0..=255u8 {
        let input = vec![byte; 37];
        let packed = compress(&input).unwrap();
        assert_eq!(decompress(&packed).unwrap(), input, "byte {byte:#04x}");
    }
}

#[test]
fn test_full_alphabet_roundtrip() {
    let input: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    let packed = compress(&input).unwrap();
    assert_eq!(decompress(&packed).unwrap(), input);
}
