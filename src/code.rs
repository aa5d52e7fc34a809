//! Symbol to code mapping derived from a [`HuffmanTree`].

use crate::bits::BitBuffer;
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, Node};
use crate::ALPHABET_SIZE;

/// The code of every symbol reachable in a tree: the root-to-leaf path with
/// `0` for a left edge and `1` for a right edge.
///
/// No leaf is an ancestor of another, so the codes are prefix-free. A tree
/// whose root is a leaf gives its only symbol the one-bit code `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<BitBuffer<u64>>>,
}

impl CodeTable {
    /// Derive the codes of `tree`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes: Vec<Option<BitBuffer<u64>>> = vec![None; ALPHABET_SIZE];
        match tree.root() {
            None => {}
            Some(Node::Leaf { symbol, .. }) => {
                codes[*symbol as usize] = Some(std::iter::once(false).collect());
            }
            Some(root) => {
                let mut path = BitBuffer::new();
                Self::assign(root, &mut path, &mut codes);
            }
        }
        Self { codes }
    }

    fn assign(node: &Node, path: &mut BitBuffer<u64>, codes: &mut [Option<BitBuffer<u64>>]) {
        match node {
            Node::Leaf { symbol, .. } => {
                codes[*symbol as usize] = Some(path.clone());
            }
            Node::Internal { left, right, .. } => {
                path.push(false);
                Self::assign(left, path, codes);
                let last = path.len() - 1;
                path.set_bit(last);
                Self::assign(right, path, codes);
                path.pop();
            }
        }
    }

    /// The code of `symbol`, if it occurs in the tree.
    pub fn get(&self, symbol: u8) -> Option<&BitBuffer<u64>> {
        self.codes[symbol as usize].as_ref()
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    /// Whether no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Option::is_none)
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitBuffer<u64>)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, code)| code.as_ref().map(|c| (s as u8, c)))
    }

    /// Length of the longest code.
    pub fn max_len(&self) -> usize {
        self.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
    }

    /// Bits needed to encode input with the given counts. Symbols without a
    /// code contribute nothing.
    pub fn encoded_len(&self, frequencies: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(s, code)| frequencies.get(s) * code.len() as u64)
            .sum()
    }
}
