//! Static Huffman encoder and decoder.
//!
//! The encoder counts the input, builds the tree and packs every byte's code
//! in input order. The decoder never sees the frequencies: it walks the tree
//! rebuilt from the serialized shape, one bit at a time, and stops exactly
//! when the payload length is consumed.

use log::debug;

use crate::bits::BitBuffer;
use crate::code::CodeTable;
use crate::error::{Error, Malformed, Result};
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, Node, SerializedTree};

/// Huffman encoder.
#[derive(Debug, Clone)]
pub struct HuffmanEncoder {
    frequencies: FrequencyTable,
    tree: HuffmanTree,
    codes: CodeTable,
}

impl HuffmanEncoder {
    /// Create an encoder for input with the given symbol counts.
    pub fn new(frequencies: FrequencyTable) -> Result<Self> {
        let tree = HuffmanTree::from_frequencies(&frequencies)?;
        let codes = CodeTable::from_tree(&tree);
        Ok(Self {
            frequencies,
            tree,
            codes,
        })
    }

    /// Create an encoder fitted to `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::new(FrequencyTable::from_bytes(data))
    }

    /// The counts the tree was built from.
    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// The Huffman tree.
    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// The code table derived from the tree.
    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    /// Shape and alphabet of the tree, as stored in a container.
    pub fn serialized_tree(&self) -> SerializedTree {
        self.tree.serialize()
    }

    /// Payload length in bits for the input the encoder was fitted to.
    pub fn encoded_len(&self) -> u64 {
        self.codes.encoded_len(&self.frequencies)
    }

    /// Encode a byte sequence into a bit stream.
    ///
    /// # Errors
    /// Returns `Error::UnknownSymbol` for a byte absent from the counts the
    /// encoder was built with.
    pub fn encode(&self, data: &[u8]) -> Result<BitBuffer<u64>> {
        let hint = usize::try_from(self.encoded_len()).unwrap_or(0);
        let mut bits = BitBuffer::with_capacity(hint);
        for &byte in data {
            let code = self.codes.get(byte).ok_or(Error::UnknownSymbol(byte))?;
            bits.append(code);
        }
        debug!(
            "encoded {} bytes over {} symbols into {} bits",
            data.len(),
            self.codes.len(),
            bits.len()
        );
        Ok(bits)
    }
}

/// Huffman decoder.
#[derive(Debug, Clone)]
pub struct HuffmanDecoder {
    tree: HuffmanTree,
}

impl HuffmanDecoder {
    /// Create a decoder for `tree`.
    pub fn new(tree: HuffmanTree) -> Self {
        Self { tree }
    }

    /// Create a decoder from a serialized tree.
    ///
    /// # Errors
    /// Returns `Error::Malformed` if the tree cannot be rebuilt.
    pub fn from_serialized(tree: &SerializedTree) -> Result<Self> {
        Ok(Self::new(tree.to_tree()?))
    }

    /// The tree used for decoding.
    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// Decode a bit stream into a symbol sequence.
    ///
    /// # Errors
    /// Returns `Error::Malformed` if the stream ends inside a code, if a
    /// single-symbol stream contains a `1`, or if the tree is empty but the
    /// stream is not.
    pub fn decode(&self, bits: &BitBuffer<u64>) -> Result<Vec<u8>> {
        let root = match self.tree.root() {
            Some(root) => root,
            None if bits.is_empty() => return Ok(Vec::new()),
            None => return Err(Malformed::PayloadWithoutTree { bits: bits.len() }.into()),
        };

        if root.is_leaf() {
            if let Some(index) = bits.iter().position(|bit| bit) {
                return Err(Malformed::InvalidCode { index }.into());
            }
            return Ok(self.tree.symbols().repeat(bits.len()));
        }

        let mut out = Vec::new();
        let mut cursor = 0;
        while cursor < bits.len() {
            let mut curr = root;
            while let Node::Internal { left, right, .. } = curr {
                if cursor == bits.len() {
                    return Err(Malformed::IncompleteCode { bits: bits.len() }.into());
                }
                curr = if bits.get(cursor) { right } else { left };
                cursor += 1;
            }
            if let Node::Leaf { symbol, .. } = curr {
                out.push(*symbol);
            }
        }
        Ok(out)
    }
}
