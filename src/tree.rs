//! Huffman trees and their serialized shape.
//!
//! The same [`Node`] model is produced by the encoder (from byte frequencies)
//! and by the decoder (from a [`SerializedTree`]). Only the encoder's nodes
//! carry meaningful weights; nodes read back from a container weigh zero.

use log::trace;

use crate::bits::BitBuffer;
use crate::error::{Malformed, Result};
use crate::frequency::FrequencyTable;
use crate::heap::BoundedHeap;
use crate::{ALPHABET_SIZE, MAX_SHAPE_BITS};

/// Huffman tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A node carrying one symbol.
    Leaf {
        /// The byte this leaf decodes to.
        symbol: u8,
        /// Occurrences of `symbol`.
        weight: u64,
    },
    /// A node with exactly two children.
    Internal {
        /// Subtree reached by bit `0`.
        left: Box<Node>,
        /// Subtree reached by bit `1`.
        right: Box<Node>,
        /// Sum of the children's weights.
        weight: u64,
    },
}

impl Node {
    /// Create a leaf.
    pub fn leaf(symbol: u8, weight: u64) -> Self {
        Node::Leaf { symbol, weight }
    }

    /// Create an internal node owning `left` and `right`.
    pub fn merge(left: Node, right: Node) -> Self {
        let weight = left.weight() + right.weight();
        Node::Internal {
            left: Box::new(left),
            right: Box::new(right),
            weight,
        }
    }

    /// Weight of the node.
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight,
        }
    }

    /// Whether the node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn write_shape(&self, shape: &mut BitBuffer<u8>, symbols: &mut Vec<u8>) {
        match self {
            Node::Leaf { symbol, .. } => {
                shape.push(true);
                symbols.push(*symbol);
            }
            Node::Internal { left, right, .. } => {
                shape.push(false);
                left.write_shape(shape, symbols);
                right.write_shape(shape, symbols);
            }
        }
    }
}

/// A static Huffman tree; empty when built from empty input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Option<Node>,
}

/// Queue entry: ties in weight are broken by insertion order.
struct Ranked {
    node: Node,
    order: usize,
}

impl HuffmanTree {
    /// Create a tree with the given root.
    pub fn new(root: Node) -> Self {
        Self { root: Some(root) }
    }

    /// The tree of empty input.
    pub fn empty() -> Self {
        Self { root: None }
    }

    /// Build the tree for the byte frequencies of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_frequencies(&FrequencyTable::from_bytes(data))
    }

    /// Build a minimum-redundancy tree for `frequencies`.
    ///
    /// Leaves enter the queue in ascending symbol order and merged nodes
    /// after them in creation order; among equal weights the earlier entry is
    /// popped first, so the result depends only on the counts. With a single
    /// distinct symbol the root is that symbol's leaf.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        if frequencies.is_empty() {
            return Ok(Self::empty());
        }
        let mut queue = BoundedHeap::new(ALPHABET_SIZE, |a: &Ranked, b: &Ranked| {
            a.node
                .weight()
                .cmp(&b.node.weight())
                .then(a.order.cmp(&b.order))
        });

        let mut order = 0;
        for (symbol, weight) in frequencies.iter() {
            queue.push(Ranked {
                node: Node::leaf(symbol, weight),
                order,
            })?;
            order += 1;
        }

        loop {
            let Some(left) = queue.pop() else {
                return Ok(Self::empty());
            };
            let Some(right) = queue.pop() else {
                return Ok(Self::new(left.node));
            };
            trace!(
                "merging weights {} and {}",
                left.node.weight(),
                right.node.weight()
            );
            queue.push(Ranked {
                node: Node::merge(left.node, right.node),
                order,
            })?;
            order += 1;
        }
    }

    /// The root, or `None` for an empty tree.
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of leaves, i.e. of distinct symbols.
    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, Node::leaf_count)
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::depth)
    }

    /// Weight of the root (the input length for encoder-built trees).
    pub fn weight(&self) -> u64 {
        self.root.as_ref().map_or(0, Node::weight)
    }

    /// Leaf symbols in pre-order.
    pub fn symbols(&self) -> Vec<u8> {
        self.serialize().symbols
    }

    /// Serialize the shape and alphabet of the tree.
    pub fn serialize(&self) -> SerializedTree {
        SerializedTree::from_tree(self)
    }
}

/// The pre-order shape bits and leaf symbols of a [`HuffmanTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializedTree {
    shape: BitBuffer<u8>,
    symbols: Vec<u8>,
}

impl SerializedTree {
    /// Wrap shape bits and symbols as read from a container.
    ///
    /// Nothing is validated until [`Self::to_tree`].
    pub fn from_parts(shape: BitBuffer<u8>, symbols: Vec<u8>) -> Self {
        Self { shape, symbols }
    }

    /// Serialize `tree`: bit `1` and the symbol for a leaf, bit `0` for an
    /// internal node followed by its left and right subtrees.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut result = Self::default();
        if let Some(root) = tree.root() {
            root.write_shape(&mut result.shape, &mut result.symbols);
        }
        result
    }

    /// Shape bits, `1` for a leaf and `0` for an internal node.
    pub fn shape(&self) -> &BitBuffer<u8> {
        &self.shape
    }

    /// Leaf symbols in pre-order.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Number of leaves marked in the shape.
    pub fn leaf_count(&self) -> usize {
        self.shape.count_ones()
    }

    /// Rebuild the tree.
    ///
    /// # Errors
    /// Returns `Error::Malformed` if the shape does not describe exactly one
    /// complete tree whose leaves match the stored symbols one to one.
    pub fn to_tree(&self) -> Result<HuffmanTree> {
        if self.shape.len() > MAX_SHAPE_BITS {
            return Err(Malformed::ShapeTooLong(self.shape.len()).into());
        }
        if self.symbols.len() > ALPHABET_SIZE {
            return Err(Malformed::TooManySymbols(self.symbols.len()).into());
        }
        let leaves = self.leaf_count();
        if leaves != self.symbols.len() {
            return Err(Malformed::SymbolCountMismatch {
                leaves,
                symbols: self.symbols.len(),
            }
            .into());
        }
        if self.shape.is_empty() {
            return Ok(HuffmanTree::empty());
        }

        let mut seen = [false; ALPHABET_SIZE];
        for &symbol in &self.symbols {
            if std::mem::replace(&mut seen[symbol as usize], true) {
                return Err(Malformed::DuplicateSymbol(symbol).into());
            }
        }

        let mut reader = ShapeReader {
            shape: &self.shape,
            symbols: &self.symbols,
            bit: 0,
            symbol: 0,
        };
        let root = reader.read_node()?;
        if reader.bit != self.shape.len() {
            return Err(Malformed::TrailingShapeBits {
                consumed: reader.bit,
                total: self.shape.len(),
            }
            .into());
        }
        Ok(HuffmanTree::new(root))
    }
}

/// Cursors over the shape bits and the symbols.
struct ShapeReader<'a> {
    shape: &'a BitBuffer<u8>,
    symbols: &'a [u8],
    bit: usize,
    symbol: usize,
}

impl ShapeReader<'_> {
    // Recursion depth is bounded by MAX_SHAPE_BITS.
    fn read_node(&mut self) -> Result<Node> {
        if self.bit >= self.shape.len() {
            return Err(Malformed::ShapeOverrun.into());
        }
        let is_leaf = self.shape.get(self.bit);
        self.bit += 1;

        if is_leaf {
            let symbol = *self
                .symbols
                .get(self.symbol)
                .ok_or(Malformed::ShapeOverrun)?;
            self.symbol += 1;
            return Ok(Node::leaf(symbol, 0));
        }
        let left = self.read_node()?;
        let right = self.read_node()?;
        Ok(Node::merge(left, right))
    }
}
