//! Growable bit sequences backed by fixed-width words.
//!
//! The same [`BitBuffer`] type stores the few hundred bits of a tree shape
//! (over `u8` words) and the packed payload (over `u64` words). Its logical
//! length is tracked separately from the backing words, so a buffer of
//! `len` bits always occupies exactly `ceil(len / W::BITS)` words.
//!
//! # Layout
//!
//! Bit `i` lives in word `i / W::BITS` at position `i % W::BITS`, counting
//! from the least significant bit. Bits of the last word at or beyond `len`
//! are kept zero.
//!
//! # Serialized form
//!
//! ```text
//! [len: u32 LE][word 0: LE][word 1: LE] ... [word ceil(len / W::BITS) - 1: LE]
//! ```

use std::fmt;
use std::io::{Read, Write};

use binout::{read_int, write_int};

use crate::error::{truncated, Error, Result};

/// Words allocated up front when reading; the rest grows as data arrives.
const MAX_PREALLOCATED_WORDS: usize = 1 << 16;

/// Unsigned integer types usable as backing storage of a [`BitBuffer`].
pub trait Word: Copy + Default + Eq + fmt::Debug {
    /// Number of bits in the word.
    const BITS: usize;

    /// Gets bit `bit` (0 is the least significant).
    fn get_bit(self, bit: usize) -> bool;

    /// Sets bit `bit` to `1`.
    fn set_bit(&mut self, bit: usize);

    /// Sets bit `bit` to `0`.
    fn clear_bit(&mut self, bit: usize);

    /// Returns `self` with every bit at position `len` or above cleared.
    fn lowest_bits(self, len: usize) -> Self;

    /// Number of bits set to `1`.
    fn ones(self) -> u32;

    /// Writes the word to `output` in little-endian byte order.
    fn write_le<W: Write + ?Sized>(self, output: &mut W) -> std::io::Result<()>;

    /// Reads a little-endian word from `input`.
    fn read_le<R: Read + ?Sized>(input: &mut R) -> std::io::Result<Self>;
}

macro_rules! impl_word {
    ($($t:ty),*) => {$(
        impl Word for $t {
            const BITS: usize = <$t>::BITS as usize;

            #[inline(always)] fn get_bit(self, bit: usize) -> bool {
                let mask: $t = 1 << bit;
                (self & mask) != 0
            }

            #[inline(always)] fn set_bit(&mut self, bit: usize) {
                let mask: $t = 1 << bit;
                *self |= mask;
            }

            #[inline(always)] fn clear_bit(&mut self, bit: usize) {
                let mask: $t = 1 << bit;
                *self &= !mask;
            }

            #[inline(always)] fn lowest_bits(self, len: usize) -> Self {
                if len >= <Self as Word>::BITS {
                    return self;
                }
                let mask: $t = (1 << len) - 1;
                self & mask
            }

            #[inline(always)] fn ones(self) -> u32 { self.count_ones() }

            fn write_le<W: Write + ?Sized>(self, output: &mut W) -> std::io::Result<()> {
                write_int!(output, self)
            }

            fn read_le<R: Read + ?Sized>(input: &mut R) -> std::io::Result<Self> {
                read_int!(input, $t)
            }
        }
    )*}
}

impl_word!(u8, u16, u32, u64);

/// Number of `W` words needed to hold `bits` bits.
#[inline(always)]
fn words_for<W: Word>(bits: usize) -> usize {
    bits.div_ceil(W::BITS)
}

/// An ordered, growable sequence of bits stored in words of type `W`.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct BitBuffer<W: Word = u64> {
    words: Vec<W>,
    len: usize,
}

impl<W: Word> BitBuffer<W> {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            len: 0,
        }
    }

    /// Create an empty buffer with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: Vec::with_capacity(words_for::<W>(bits)),
            len: 0,
        }
    }

    /// Number of bits in the buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reserve room for `additional` more bits.
    pub fn reserve(&mut self, additional: usize) {
        let needed = words_for::<W>(self.len + additional);
        self.words.reserve(needed.saturating_sub(self.words.len()));
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) {
        let offset = self.len % W::BITS;
        if offset == 0 {
            self.words.push(W::default());
        }
        if bit {
            if let Some(last) = self.words.last_mut() {
                last.set_bit(offset);
            }
        }
        self.len += 1;
    }

    /// Remove and return the last bit, or `None` if the buffer is empty.
    pub fn pop(&mut self) -> Option<bool> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let (word, offset) = (self.len / W::BITS, self.len % W::BITS);
        let bit = self.words[word].get_bit(offset);
        if offset == 0 {
            self.words.pop();
        } else {
            self.words[word].clear_bit(offset);
        }
        Some(bit)
    }

    /// Append a copy of every bit of `other`, in order.
    pub fn append<V: Word>(&mut self, other: &BitBuffer<V>) {
        self.reserve(other.len());
        for bit in other.iter() {
            self.push(bit);
        }
    }

    /// Get the bit at `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn get(&self, index: usize) -> bool {
        assert!(
            index < self.len,
            "bit index {index} out of range for length {}",
            self.len
        );
        self.words[index / W::BITS].get_bit(index % W::BITS)
    }

    /// Set the bit at `index` to `1`.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn set_bit(&mut self, index: usize) {
        assert!(
            index < self.len,
            "bit index {index} out of range for length {}",
            self.len
        );
        self.words[index / W::BITS].set_bit(index % W::BITS);
    }

    /// Iterate over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.words[i / W::BITS].get_bit(i % W::BITS))
    }

    /// Number of bits set to `1`.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.ones() as usize).sum()
    }

    /// Size in bytes of the serialized form written by [`Self::write_to`].
    pub fn serialized_len(&self) -> usize {
        4 + self.words.len() * W::BITS / 8
    }

    /// Write the bit length followed by the backing words.
    ///
    /// # Errors
    /// Returns `Error::PayloadTooLarge` if the length does not fit in a `u32`.
    pub fn write_to<Out: Write + ?Sized>(&self, output: &mut Out) -> Result<()> {
        let len = u32::try_from(self.len).map_err(|_| Error::PayloadTooLarge(self.len as u64))?;
        write_int!(output, len)?;
        for word in &self.words {
            word.write_le(output)?;
        }
        Ok(())
    }

    /// Read a buffer written by [`Self::write_to`].
    ///
    /// Bits of the last word beyond the stored length are discarded.
    ///
    /// # Errors
    /// Returns `Malformed::Truncated` if `input` ends early.
    pub fn read_from<In: Read + ?Sized>(input: &mut In) -> Result<Self> {
        let len = read_int!(input, u32).map_err(truncated)? as usize;

        let count = words_for::<W>(len);
        let mut words = Vec::with_capacity(count.min(MAX_PREALLOCATED_WORDS));
        for _ in 0..count {
            words.push(W::read_le(input).map_err(truncated)?);
        }
        if let Some(last) = words.last_mut() {
            *last = last.lowest_bits(len - (count - 1) * W::BITS);
        }
        Ok(Self { words, len })
    }
}

impl<W: Word> FromIterator<bool> for BitBuffer<W> {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut result = Self::new();
        result.extend(iter);
        result
    }
}

impl<W: Word> Extend<bool> for BitBuffer<W> {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        for bit in iter {
            self.push(bit);
        }
    }
}

impl<W: Word> fmt::Display for BitBuffer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl<W: Word> fmt::Debug for BitBuffer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitBuffer")
            .field("len", &self.len)
            .field("bits", &format_args!("{self}"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Malformed;
    use proptest::prelude::*;

    fn bits<W: Word>(text: &str) -> BitBuffer<W> {
        text.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_push_crosses_word_boundary() {
        let mut buffer = BitBuffer::<u8>::new();
        for i in 0..20 {
            buffer.push(i % 3 == 0);
        }
        assert_eq!(buffer.len(), 20);
        assert_eq!(buffer.words.len(), 3);
        for i in 0..20 {
            assert_eq!(buffer.get(i), i % 3 == 0, "bit {i}");
        }
    }

    #[test]
    fn test_set_bit_and_pop() {
        let mut path = BitBuffer::<u64>::new();
        path.push(false);
        path.push(false);
        path.set_bit(1);
        assert_eq!(path.to_string(), "01");
        assert_eq!(path.pop(), Some(true));
        assert_eq!(path.pop(), Some(false));
        assert_eq!(path.pop(), None);
        assert!(path.words.is_empty());
    }

    #[test]
    fn test_pop_clears_storage() {
        let mut a = bits::<u8>("101");
        a.pop();
        a.push(false);
        assert_eq!(a, bits::<u8>("100"));
    }

    #[test]
    fn test_append_copies_between_word_types() {
        let code = bits::<u64>("1101");
        let mut payload = bits::<u8>("0000001");
        payload.append(&code);
        payload.append(&code);
        assert_eq!(payload.to_string(), "000000111011101");
        // `code` is untouched
        assert_eq!(code.to_string(), "1101");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_out_of_range_panics() {
        bits::<u64>("01").get(2);
    }

    #[test]
    fn test_serialized_layout() {
        let mut out = Vec::new();
        bits::<u8>("101000001").write_to(&mut out).unwrap();
        assert_eq!(out, vec![9, 0, 0, 0, 0b0000_0101, 0b0000_0001]);

        let mut out = Vec::new();
        bits::<u64>("1").write_to(&mut out).unwrap();
        assert_eq!(out, vec![1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(out.len(), bits::<u64>("1").serialized_len());
    }

    #[test]
    fn test_read_ignores_bits_past_length() {
        let input = [3u8, 0, 0, 0, 0xFF];
        let buffer = BitBuffer::<u8>::read_from(&mut &input[..]).unwrap();
        assert_eq!(buffer, bits::<u8>("111"));
        assert_eq!(buffer.count_ones(), 3);
    }

    #[test]
    fn test_read_empty() {
        let input = [0u8, 0, 0, 0];
        let buffer = BitBuffer::<u64>::read_from(&mut &input[..]).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_read_truncated() {
        let input = [65u8, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8];
        let err = BitBuffer::<u64>::read_from(&mut &input[..]).unwrap_err();
        assert!(matches!(err, Error::Malformed(Malformed::Truncated)));

        let err = BitBuffer::<u8>::read_from(&mut &[1u8, 0][..]).unwrap_err();
        assert!(matches!(err, Error::Malformed(Malformed::Truncated)));
    }

    proptest! {
        #[test]
        fn prop_write_read_identity(input in prop::collection::vec(any::<bool>(), 0..300)) {
            let buffer: BitBuffer<u16> = input.iter().copied().collect();
            let mut out = Vec::new();
            buffer.write_to(&mut out).unwrap();
            prop_assert_eq!(out.len(), buffer.serialized_len());

            let read = BitBuffer::<u16>::read_from(&mut &out[..]).unwrap();
            prop_assert_eq!(read.iter().collect::<Vec<_>>(), input);
            prop_assert_eq!(read, buffer);
        }
    }
}
