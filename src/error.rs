//! Error types for Huffman coding and the container format.

use thiserror::Error;

/// Error variants for compression and decompression.
#[derive(Debug, Error)]
pub enum Error {
    /// A push was attempted on a priority queue that is already full.
    #[error("priority queue is full (capacity {capacity})")]
    QueueFull {
        /// Fixed capacity of the queue.
        capacity: usize,
    },

    /// The encoder was asked to encode a byte its code table has no code for.
    #[error("symbol {0:#04x} has no code in the table")]
    UnknownSymbol(u8),

    /// A tree handed to the container writer lists more symbols than the
    /// alphabet has.
    #[error("{count} symbols exceed the 256-symbol alphabet")]
    TooManySymbols {
        /// Number of symbols in the tree.
        count: usize,
    },

    /// A bit sequence is too long for the 32-bit length field of the container.
    #[error("{0} bits do not fit the 32-bit length field")]
    PayloadTooLarge(u64),

    /// The container could not be decoded.
    #[error("malformed container: {0}")]
    Malformed(#[from] Malformed),

    /// An I/O error occurred while reading or writing a container.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a container is rejected by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    /// The input ended before the container did.
    #[error("unexpected end of input")]
    Truncated,

    /// Bytes remain after the payload.
    #[error("{0} trailing bytes after the payload")]
    TrailingBytes(usize),

    /// The symbol count field is negative.
    #[error("negative symbol count {0}")]
    NegativeSymbolCount(i32),

    /// More symbols are declared than the alphabet holds.
    #[error("{0} symbols declared, the alphabet has 256")]
    TooManySymbols(usize),

    /// The shape bit sequence is longer than any tree over the alphabet.
    #[error("tree shape of {0} bits exceeds the 511-bit limit")]
    ShapeTooLong(usize),

    /// The number of leaves in the shape differs from the number of symbols.
    #[error("tree shape has {leaves} leaves but {symbols} symbols were stored")]
    SymbolCountMismatch {
        /// Leaves marked in the shape bits.
        leaves: usize,
        /// Symbols present in the container.
        symbols: usize,
    },

    /// The shape bits ended before the tree was complete.
    #[error("tree shape ended before the tree was complete")]
    ShapeOverrun,

    /// The tree was complete before all shape bits were consumed.
    #[error("tree complete after {consumed} of {total} shape bits")]
    TrailingShapeBits {
        /// Shape bits consumed by the tree.
        consumed: usize,
        /// Shape bits present.
        total: usize,
    },

    /// A symbol occurs at more than one leaf.
    #[error("symbol {0:#04x} appears at more than one leaf")]
    DuplicateSymbol(u8),

    /// The payload ended in the middle of a code.
    #[error("payload of {bits} bits ends inside a code")]
    IncompleteCode {
        /// Length of the payload.
        bits: usize,
    },

    /// A single-symbol payload contains a bit other than `0`.
    #[error("invalid code bit at payload index {index}")]
    InvalidCode {
        /// Position of the offending bit.
        index: usize,
    },

    /// The tree is empty but the payload is not.
    #[error("payload of {bits} bits without a tree")]
    PayloadWithoutTree {
        /// Length of the payload.
        bits: usize,
    },
}

/// A specialized Result type for Huffman operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Maps a short read to [`Malformed::Truncated`], keeping other I/O errors.
pub(crate) fn truncated(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        Malformed::Truncated.into()
    } else {
        Error::Io(e)
    }
}
