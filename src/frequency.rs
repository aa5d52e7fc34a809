//! Byte occurrence counts.

use std::fmt;

use crate::ALPHABET_SIZE;

/// Number of occurrences of every byte value in some input.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Create a table with every count zero.
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut result = Self::new();
        result.count_all(data.iter().copied());
        result
    }

    /// Add one occurrence of `symbol`.
    #[inline(always)]
    pub fn count(&mut self, symbol: u8) {
        self.counts[symbol as usize] += 1;
    }

    /// Call [`Self::count`] for every symbol of `iter`.
    pub fn count_all<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for symbol in iter {
            self.count(symbol);
        }
    }

    /// Occurrences of `symbol`.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Sum of all counts, i.e. the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of symbols with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Whether nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// `(symbol, count)` pairs with a nonzero count, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(s, &c)| (s as u8, c))
    }

    /// Shannon entropy of the counted symbols, in bits per symbol.
    ///
    /// This is the lower bound on the average code length; a Huffman code is
    /// within one bit of it.
    pub fn entropy(&self) -> f64 {
        let total = self.total() as f64;
        if total == 0.0 {
            return 0.0;
        }
        -self
            .iter()
            .map(|(_, c)| {
                let p = c as f64 / total;
                p * p.log2()
            })
            .sum::<f64>()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abracadabra_counts() {
        let freq = FrequencyTable::from_bytes(b"abracadabra");
        assert_eq!(freq.get(b'a'), 5);
        assert_eq!(freq.get(b'b'), 2);
        assert_eq!(freq.get(b'r'), 2);
        assert_eq!(freq.get(b'c'), 1);
        assert_eq!(freq.get(b'd'), 1);
        assert_eq!(freq.get(b'z'), 0);
        assert_eq!(freq.total(), 11);
        assert_eq!(freq.distinct(), 5);

        let symbols: Vec<u8> = freq.iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, b"abcdr".to_vec());
    }

    #[test]
    fn test_empty() {
        let freq = FrequencyTable::from_bytes(b"");
        assert!(freq.is_empty());
        assert_eq!(freq.total(), 0);
        assert_eq!(freq.distinct(), 0);
        assert_eq!(freq.entropy(), 0.0);
    }

    #[test]
    fn test_entropy() {
        assert_eq!(FrequencyTable::from_bytes(b"aaaa").entropy(), 0.0);
        let uniform = FrequencyTable::from_bytes(b"abcd");
        assert!((uniform.entropy() - 2.0).abs() < 1e-12);
    }
}
