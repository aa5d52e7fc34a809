//! # Static Huffman Coding
//!
//! *Lossless byte-stream compression with a minimum-redundancy prefix code.*
//!
//! ## Intuition First
//!
//! Morse code gives the most common letter, `E`, a single dot and rare letters
//! long sequences. Huffman coding does the same for bytes, but derives the
//! code from the input itself: bytes that occur often get short bit strings,
//! rare bytes get long ones, and no code is the beginning of another, so the
//! concatenated bits can be split back into bytes without separators.
//!
//! ## The Problem
//!
//! A plain byte stream spends 8 bits on every symbol regardless of how often
//! it occurs. Given the counts of each byte value, we want the prefix code that
//! minimizes the total encoded length, and we want to ship that code alongside
//! the data so the decoder needs nothing else.
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon     Entropy as the fundamental limit
//! 1949  Fano        Shannon-Fano coding: top-down splitting, not optimal
//! 1952  Huffman     Bottom-up merging: optimal prefix codes
//! 1978  Gallager    Adaptive (dynamic) Huffman coding
//! 1993  Katz        DEFLATE pairs LZ77 with Huffman codes
//! ```
//!
//! ## Mathematical Formulation
//!
//! For symbol counts $f_s$ and code lengths $\ell_s$, Huffman's greedy
//! construction minimizes
//!
//! ```text
//! L = Σ_s f_s · ℓ_s
//! ```
//!
//! over all prefix codes. Repeatedly merging the two lightest subtrees is
//! optimal because the two least frequent symbols can always be made siblings
//! at the deepest level of some optimal tree.
//!
//! ## Complexity Analysis
//!
//! - **Tree construction**: $O(k \log k)$ for $k \le 256$ distinct bytes.
//! - **Encoding / decoding**: $O(n + L)$ for $n$ input bytes and $L$ payload bits.
//! - **Space**: the whole input and payload are held in memory.
//!
//! ## Failure Modes
//!
//! 1. **Flat distributions**: uniformly random bytes need 8 bits each, and the
//!    container header makes the output slightly larger than the input.
//! 2. **Malformed containers**: every inconsistency between shape, symbols and
//!    payload is reported as [`Error::Malformed`]; nothing is partially decoded.
//!
//! ## Implementation Notes
//!
//! - [`bits::BitBuffer`] is the single bit-level primitive: it stores the tree
//!   shape over `u8` words and the payload over `u64` words.
//! - [`heap::BoundedHeap`] is sized to the alphabet and breaks weight ties by
//!   insertion order, so a given input always yields the same tree.
//! - The container layout is documented in [`container`].
//!
//! ```
//! let packed = huffpack::compress(b"abracadabra")?;
//! assert_eq!(huffpack::decompress(&packed)?, b"abracadabra");
//! # Ok::<(), huffpack::Error>(())
//! ```
//!
//! ## References
//!
//! - Huffman, D. A. (1952). "A Method for the Construction of Minimum-Redundancy Codes."
//! - Cover, T. M., Thomas, J. A. (2006). *Elements of Information Theory*, ch. 5.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bits;
pub mod code;
pub mod container;
pub mod error;
pub mod frequency;
pub mod heap;
pub mod huffman;
pub mod tree;

/// Number of distinct symbols: every byte value.
pub const ALPHABET_SIZE: usize = 256;

/// Shape bits of the largest tree over the alphabet (`2 × 256 − 1` nodes).
pub const MAX_SHAPE_BITS: usize = 2 * ALPHABET_SIZE - 1;

pub use bits::BitBuffer;
pub use code::CodeTable;
pub use container::{compress, compress_to, decompress, decompress_from, Container};
pub use error::{Error, Malformed, Result};
pub use frequency::FrequencyTable;
pub use huffman::{HuffmanDecoder, HuffmanEncoder};
pub use tree::{HuffmanTree, Node, SerializedTree};
