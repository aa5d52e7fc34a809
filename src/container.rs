//! The self-describing container joining a serialized tree and its payload.
//!
//! All integers are little-endian:
//!
//! ```text
//! [shape bit length: u32][shape: u8 words]
//! [symbol count: i32][symbols: u8 × symbol count]
//! [payload bit length: u32][payload: u64 words]
//! ```

use std::io::{Read, Write};

use binout::{read_int, write_int};
use log::debug;

use crate::bits::BitBuffer;
use crate::error::{truncated, Error, Malformed, Result};
use crate::huffman::{HuffmanDecoder, HuffmanEncoder};
use crate::tree::SerializedTree;
use crate::ALPHABET_SIZE;

/// A serialized tree together with the payload it decodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    tree: SerializedTree,
    payload: BitBuffer<u64>,
}

impl Container {
    /// Join a serialized tree and a payload.
    pub fn from_parts(tree: SerializedTree, payload: BitBuffer<u64>) -> Self {
        Self { tree, payload }
    }

    /// Encode `data` into a container.
    pub fn compress(data: &[u8]) -> Result<Self> {
        let encoder = HuffmanEncoder::from_bytes(data)?;
        let payload = encoder.encode(data)?;
        Ok(Self::from_parts(encoder.serialized_tree(), payload))
    }

    /// Decode the payload with the stored tree.
    ///
    /// # Errors
    /// Returns `Error::Malformed` if the tree or the payload is inconsistent;
    /// no partial output is returned.
    pub fn decompress(&self) -> Result<Vec<u8>> {
        let decoder = HuffmanDecoder::from_serialized(&self.tree)?;
        decoder.decode(&self.payload)
    }

    /// The serialized tree.
    pub fn tree(&self) -> &SerializedTree {
        &self.tree
    }

    /// The packed payload.
    pub fn payload(&self) -> &BitBuffer<u64> {
        &self.payload
    }

    /// Split into the serialized tree and the payload.
    pub fn into_parts(self) -> (SerializedTree, BitBuffer<u64>) {
        (self.tree, self.payload)
    }

    /// Size in bytes of the serialized container.
    pub fn serialized_len(&self) -> usize {
        self.tree.shape().serialized_len()
            + 4
            + self.tree.symbols().len()
            + self.payload.serialized_len()
    }

    /// Write the container to `output`.
    ///
    /// # Errors
    /// Returns `Error::PayloadTooLarge` if the payload has more than
    /// `u32::MAX` bits, `Error::TooManySymbols` if the tree lists more than
    /// [`ALPHABET_SIZE`] symbols, or `Error::Io` if `output` fails.
    pub fn write_to<W: Write + ?Sized>(&self, output: &mut W) -> Result<()> {
        let symbols = self.tree.symbols();
        if symbols.len() > ALPHABET_SIZE {
            return Err(Error::TooManySymbols {
                count: symbols.len(),
            });
        }
        self.tree.shape().write_to(output)?;
        let count = symbols.len() as i32;
        write_int!(output, count)?;
        output.write_all(symbols)?;
        self.payload.write_to(output)
    }

    /// Read a container from `input`, stopping right after the payload.
    ///
    /// # Errors
    /// Returns `Error::Malformed` if `input` ends early or the symbol count
    /// is out of range.
    pub fn read_from<R: Read + ?Sized>(input: &mut R) -> Result<Self> {
        let shape = BitBuffer::<u8>::read_from(input)?;

        let count = read_int!(input, i32).map_err(truncated)?;
        if count < 0 {
            return Err(Malformed::NegativeSymbolCount(count).into());
        }
        let count = count as usize;
        if count > ALPHABET_SIZE {
            return Err(Malformed::TooManySymbols(count).into());
        }
        let mut symbols = vec![0u8; count];
        input.read_exact(&mut symbols).map_err(truncated)?;

        let payload = BitBuffer::<u64>::read_from(input)?;
        Ok(Self::from_parts(
            SerializedTree::from_parts(shape, symbols),
            payload,
        ))
    }

    /// Serialize the container into a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.serialized_len());
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Parse a container that spans exactly `bytes`.
    ///
    /// # Errors
    /// Besides the errors of [`Self::read_from`], returns
    /// `Malformed::TrailingBytes` if bytes follow the payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut input = bytes;
        let container = Self::read_from(&mut input)?;
        if !input.is_empty() {
            return Err(Malformed::TrailingBytes(input.len()).into());
        }
        Ok(container)
    }
}

/// Compress `data` into container bytes.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let bytes = Container::compress(data)?.to_bytes()?;
    debug!("compressed {} bytes into {} bytes", data.len(), bytes.len());
    Ok(bytes)
}

/// Compress `data` and write the container to `output`.
pub fn compress_to<W: Write>(data: &[u8], mut output: W) -> Result<()> {
    Container::compress(data)?.write_to(&mut output)
}

/// Restore the bytes stored in a container.
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    let data = Container::from_bytes(bytes)?.decompress()?;
    debug!("decompressed {} bytes into {} bytes", bytes.len(), data.len());
    Ok(data)
}

/// Read a whole container from `input` and restore its bytes.
pub fn decompress_from<R: Read>(mut input: R) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    decompress(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed(bytes: &[u8]) -> Malformed {
        match decompress(bytes) {
            Err(Error::Malformed(m)) => m,
            other => panic!("expected a malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_layout() {
        let bytes = compress(b"").unwrap();
        // empty shape, zero symbols, empty payload
        assert_eq!(bytes, vec![0u8; 12]);
        assert!(decompress(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_single_symbol_layout() {
        let bytes = compress(b"aaaa").unwrap();
        let expected = [
            &[1u8, 0, 0, 0, 0b1][..],
            &[1, 0, 0, 0, b'a'][..],
            // four `0` bits in one u64 word
            &[4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0][..],
        ]
        .concat();
        assert_eq!(bytes, expected);
        assert_eq!(decompress(&bytes).unwrap(), b"aaaa".to_vec());
    }

    #[test]
    fn test_abracadabra_container() {
        let container = Container::compress(b"abracadabra").unwrap();
        assert_eq!(container.tree().symbols(), b"acdbr");
        assert_eq!(container.payload().len(), 23);

        let bytes = container.to_bytes().unwrap();
        assert_eq!(bytes.len(), container.serialized_len());
        // shape: 4 + 2, symbols: 4 + 5, payload: 4 + 8
        assert_eq!(bytes.len(), 27);

        let mut header = &bytes[..];
        assert_eq!(read_int!(&mut header, u32).unwrap(), 9);
        header = &header[2..];
        assert_eq!(read_int!(&mut header, i32).unwrap(), 5);
        assert_eq!(&header[..5], b"acdbr");
        header = &header[5..];
        assert_eq!(read_int!(&mut header, u32).unwrap(), 23);

        let parsed = Container::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, container);
        assert_eq!(parsed.decompress().unwrap(), b"abracadabra".to_vec());
    }

    #[test]
    fn test_stream_helpers() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let mut out = Vec::new();
        compress_to(data, &mut out).unwrap();
        assert_eq!(decompress_from(&out[..]).unwrap(), data.to_vec());
    }

    #[test]
    fn test_truncated_container() {
        let bytes = compress(b"abracadabra").unwrap();
        for cut in 0..bytes.len() {
            assert_eq!(malformed(&bytes[..cut]), Malformed::Truncated, "cut at {cut}");
        }
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = compress(b"abc").unwrap();
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(malformed(&bytes), Malformed::TrailingBytes(2));
    }

    #[test]
    fn test_symbol_count_out_of_range() {
        let mut bytes = vec![1, 0, 0, 0, 1];
        bytes.extend_from_slice(&(-1i32).to_le_bytes());
        assert_eq!(malformed(&bytes), Malformed::NegativeSymbolCount(-1));

        let mut bytes = vec![1, 0, 0, 0, 1];
        bytes.extend_from_slice(&257i32.to_le_bytes());
        assert_eq!(malformed(&bytes), Malformed::TooManySymbols(257));
    }

    #[test]
    fn test_symbol_count_disagrees_with_shape() {
        // shape "011" has two leaves, only one symbol stored
        let mut bytes = vec![3, 0, 0, 0, 0b110];
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.push(b'a');
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        assert_eq!(
            malformed(&bytes),
            Malformed::SymbolCountMismatch { leaves: 2, symbols: 1 }
        );
    }

    #[test]
    fn test_payload_ends_inside_code() {
        let container = Container::compress(b"abracadabra").unwrap();
        let (tree, mut cut) = container.into_parts();
        // drop the last 'a' and the final bit of the 'r' before it
        cut.pop();
        cut.pop();
        let bytes = Container::from_parts(tree, cut).to_bytes().unwrap();
        assert_eq!(malformed(&bytes), Malformed::IncompleteCode { bits: 21 });
    }

    #[test]
    fn test_write_rejects_oversized_alphabet() {
        let symbols: Vec<u8> = (0..=255u8).chain([0]).collect();
        let tree = SerializedTree::from_parts(BitBuffer::new(), symbols);
        let container = Container::from_parts(tree, BitBuffer::new());

        let mut out = Vec::new();
        let err = container.write_to(&mut out).unwrap_err();
        assert!(matches!(err, Error::TooManySymbols { count: 257 }));
        assert!(out.is_empty());
    }
}
