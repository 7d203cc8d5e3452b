use alloc::vec;
use alloc::vec::Vec;
use core::cmp::{max, min};
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Range, Sub, SubAssign,
};

use log::trace;

use crate::error::BitVectorError;

const ADDRESS_BITS_PER_WORD: usize = 6;
pub(crate) const BITS_PER_WORD: usize = 1 << ADDRESS_BITS_PER_WORD;
const BIT_INDEX_MASK: usize = BITS_PER_WORD - 1;
const WORD_MASK: u64 = !0u64;

/// Returns the index of the word holding the bit at `bit_idx`.
///
/// # Examples
/// ```
/// use light_bitvector::word_index;
///
/// assert_eq!(word_index(0), 0);
/// assert_eq!(word_index(63), 0);
/// assert_eq!(word_index(64), 1);
/// assert_eq!(word_index(130), 2);
/// ```
pub const fn word_index(bit_idx: usize) -> usize {
    bit_idx >> ADDRESS_BITS_PER_WORD
}

/// Mask selecting the bits of a word at or above `start`.
pub(crate) const fn first_word_mask(start: usize) -> u64 {
    WORD_MASK << (start & BIT_INDEX_MASK)
}

/// Mask selecting the bits of a word strictly below the exclusive bound
/// `end`. `end` must be non-zero.
pub(crate) const fn last_word_mask(end: usize) -> u64 {
    WORD_MASK >> (BIT_INDEX_MASK - ((end - 1) & BIT_INDEX_MASK))
}

/// Counts the set bits of a word by folding neighbouring bit fields of
/// doubling width.
pub(crate) const fn popcount(word: u64) -> usize {
    if word == 0 {
        return 0;
    }
    if word == WORD_MASK {
        return BITS_PER_WORD;
    }
    let mut x = word;
    x = (x & 0x5555_5555_5555_5555) + ((x >> 1) & 0x5555_5555_5555_5555);
    x = (x & 0x3333_3333_3333_3333) + ((x >> 2) & 0x3333_3333_3333_3333);
    x = (x & 0x0f0f_0f0f_0f0f_0f0f) + ((x >> 4) & 0x0f0f_0f0f_0f0f_0f0f);
    x = (x & 0x00ff_00ff_00ff_00ff) + ((x >> 8) & 0x00ff_00ff_00ff_00ff);
    x = (x & 0x0000_ffff_0000_ffff) + ((x >> 16) & 0x0000_ffff_0000_ffff);
    x = (x & 0x0000_0000_ffff_ffff) + (x >> 32);
    x as usize
}

fn check_range(range: &Range<usize>) -> Result<(), BitVectorError> {
    if range.start > range.end {
        return Err(BitVectorError::IndexOutOfRange {
            start: range.start,
            end: range.end,
        });
    }
    Ok(())
}

/// A growable set of bit indices packed into `u64` words.
///
/// Bits that were never set read as unset, no matter how large the index.
/// Writing a bit beyond the current capacity grows the backing array;
/// reading never does.
///
/// Internally only the leading `words_in_use` words may hold set bits and
/// the highest of them is never zero, so two vectors holding the same bits
/// compare equal regardless of their capacity.
pub struct BitVector {
    words: Vec<u64>,
    words_in_use: usize,
    size_is_sticky: bool,
}

impl BitVector {
    /// Creates a new, empty bit vector with room for 64 bits.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let bv = BitVector::new();
    /// assert!(bv.is_empty());
    /// assert_eq!(bv.size(), 64);
    /// ```
    pub fn new() -> Self {
        Self {
            words: vec![0; 1],
            words_in_use: 0,
            size_is_sticky: false,
        }
    }

    /// Creates an empty bit vector whose backing array can hold at least
    /// `bit_count` bits without growing.
    ///
    /// The requested capacity is kept when the vector is cloned, unless the
    /// vector had to grow past it in the meantime.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let bv = BitVector::with_capacity(100);
    /// assert_eq!(bv.size(), 128);
    /// assert_eq!(bv.length(), 0);
    /// ```
    pub fn with_capacity(bit_count: usize) -> Self {
        Self {
            words: vec![0; bit_count.div_ceil(BITS_PER_WORD)],
            words_in_use: 0,
            size_is_sticky: true,
        }
    }

    /// Adopts `words` as the backing array with every word counted as in
    /// use. The caller restores the invariants.
    fn from_words(words: Vec<u64>) -> Self {
        Self {
            words_in_use: words.len(),
            words,
            size_is_sticky: false,
        }
    }

    /// Creates a bit vector from a word array, where bit `n` of the vector
    /// is bit `n % 64` of `words[n / 64]`.
    ///
    /// Trailing zero words are dropped. This is the inverse of
    /// [`to_bit_list`].
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let bv = BitVector::value_of(&[0b1010, 0, 0]);
    /// assert_eq!(bv.to_string(), "{1, 3}");
    /// assert_eq!(bv.to_bit_list(), vec![0b1010]);
    /// ```
    ///
    /// [`to_bit_list`]: BitVector::to_bit_list
    pub fn value_of(words: &[u64]) -> Self {
        let in_use = words.iter().rposition(|&w| w != 0).map_or(0, |i| i + 1);
        if in_use < words.len() {
            trace!(
                "value_of: dropping {} trailing zero words",
                words.len() - in_use
            );
        }
        let bv = Self::from_words(words[..in_use].to_vec());
        bv.check_invariants();
        bv
    }

    /// Creates a bit vector from raw bit values, where `bits[n]` is bit `n`.
    ///
    /// # Errors
    /// Returns [`BitVectorError::IllegalArgument`] if any value is neither
    /// `0` nor `1`.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::{BitVector, BitVectorError};
    ///
    /// let bv = BitVector::from_bits(&[1, 0, 1, 1]).unwrap();
    /// assert_eq!(bv.to_string(), "{0, 2, 3}");
    ///
    /// assert_eq!(
    ///     BitVector::from_bits(&[1, 2]),
    ///     Err(BitVectorError::IllegalArgument { position: 1, value: 2 })
    /// );
    /// ```
    pub fn from_bits(bits: &[u8]) -> Result<Self, BitVectorError> {
        if let Some((position, &value)) = bits.iter().enumerate().find(|(_, b)| **b > 1) {
            return Err(BitVectorError::IllegalArgument { position, value });
        }
        let mut bv = Self::with_capacity(bits.len());
        for (idx, _) in bits.iter().enumerate().filter(|(_, b)| **b == 1) {
            bv.set(idx);
        }
        Ok(bv)
    }

    /// Creates a bit vector from a little-endian byte dump, where bit `n` of
    /// the vector is bit `n % 8` of `bytes[n / 8]`.
    ///
    /// This is the inverse of [`to_le_bytes`].
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let bv = BitVector::from_le_bytes(&[0b0000_0001, 0b1000_0000]);
    /// assert_eq!(bv.to_string(), "{0, 15}");
    /// ```
    ///
    /// [`to_le_bytes`]: BitVector::to_le_bytes
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        let words: Vec<u64> = bytes
            .chunks(BITS_PER_WORD / 8)
            .map(|chunk| {
                let mut buf = [0u8; BITS_PER_WORD / 8];
                buf[..chunk.len()].copy_from_slice(chunk);
                u64::from_le_bytes(buf)
            })
            .collect();
        Self::value_of(&words)
    }

    /// Returns a copy of the words that may hold set bits. The highest
    /// returned word is never zero.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// bv.set(1);
    /// bv.set(64);
    /// assert_eq!(bv.to_bit_list(), vec![0b10, 0b1]);
    /// ```
    pub fn to_bit_list(&self) -> Vec<u64> {
        self.words[..self.words_in_use].to_vec()
    }

    /// Returns the in-use words as little-endian bytes, with trailing zero
    /// bytes removed.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// bv.set(0);
    /// bv.set(15);
    /// assert_eq!(bv.to_le_bytes(), vec![0b0000_0001, 0b1000_0000]);
    /// ```
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let byte_count = self.length().div_ceil(8);
        let mut bytes = Vec::with_capacity(self.words_in_use * (BITS_PER_WORD / 8));
        for word in &self.words[..self.words_in_use] {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes.truncate(byte_count);
        bytes
    }

    #[inline]
    fn check_invariants(&self) {
        debug_assert!(self.words_in_use == 0 || self.words[self.words_in_use - 1] != 0);
        debug_assert!(self.words_in_use <= self.words.len());
        debug_assert!(self.words[self.words_in_use..].iter().all(|&w| w == 0));
    }

    /// Sets `words_in_use` to one past the highest non-zero word.
    fn recalculate_words_in_use(&mut self) {
        self.words_in_use = self.words[..self.words_in_use]
            .iter()
            .rposition(|&w| w != 0)
            .map_or(0, |i| i + 1);
    }

    fn ensure_capacity(&mut self, words_required: usize) {
        if self.words.len() < words_required {
            let request = max(2 * self.words.len(), words_required);
            trace!(
                "growing bit vector from {} to {request} words",
                self.words.len()
            );
            self.words.resize(request, 0);
            self.size_is_sticky = false;
        }
    }

    /// Makes `word_idx` an in-use word. Leaves the highest in-use word
    /// possibly zero; the caller either writes a set bit into it or
    /// recalculates.
    fn expand_to(&mut self, word_idx: usize) {
        let words_required = word_idx + 1;
        if self.words_in_use < words_required {
            self.ensure_capacity(words_required);
            self.words_in_use = words_required;
        }
    }

    /// Shrinks the backing array to the words in use, unless the capacity
    /// was requested explicitly with [`with_capacity`].
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// bv.set(1000);
    /// bv.clear(1000);
    /// bv.set(3);
    /// bv.trim_to_size();
    /// assert_eq!(bv.size(), 64);
    ///
    /// let mut sticky = BitVector::with_capacity(1000);
    /// sticky.trim_to_size();
    /// assert_eq!(sticky.size(), 1024);
    /// ```
    ///
    /// [`with_capacity`]: BitVector::with_capacity
    pub fn trim_to_size(&mut self) {
        if !self.size_is_sticky && self.words_in_use != self.words.len() {
            trace!(
                "trimming bit vector from {} to {} words",
                self.words.len(),
                self.words_in_use
            );
            self.words.truncate(self.words_in_use);
            self.words.shrink_to_fit();
        }
        self.check_invariants();
    }

    /// Sets the bit at the given index, growing the vector if needed.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// bv.set(3);
    /// bv.set(500);
    /// assert!(bv.get(3));
    /// assert!(bv.get(500));
    /// assert_eq!(bv.length(), 501);
    /// ```
    #[inline]
    pub fn set(&mut self, idx: usize) {
        let word_idx = word_index(idx);
        self.expand_to(word_idx);
        self.words[word_idx] |= 1u64 << (idx & BIT_INDEX_MASK);
        self.check_invariants();
    }

    /// Sets the bit at the given index to `value`.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// bv.set_value(7, true);
    /// assert!(bv.get(7));
    /// bv.set_value(7, false);
    /// assert!(!bv.get(7));
    /// ```
    #[inline]
    pub fn set_value(&mut self, idx: usize, value: bool) {
        if value {
            self.set(idx);
        } else {
            self.clear(idx);
        }
    }

    /// Unsets the bit at the given index. Never grows the vector.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// bv.set(3);
    /// bv.clear(3);
    /// assert!(!bv.get(3));
    /// assert!(bv.is_empty());
    ///
    /// bv.clear(1_000_000);
    /// assert_eq!(bv.size(), 64);
    /// ```
    pub fn clear(&mut self, idx: usize) {
        let word_idx = word_index(idx);
        if word_idx >= self.words_in_use {
            return;
        }
        self.words[word_idx] &= !(1u64 << (idx & BIT_INDEX_MASK));
        self.recalculate_words_in_use();
        self.check_invariants();
    }

    /// Unsets all bits. The capacity is left untouched.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv: BitVector = [1, 70, 140].into_iter().collect();
    /// let size = bv.size();
    /// bv.clear_all();
    /// assert!(bv.is_empty());
    /// assert_eq!(bv.size(), size);
    /// ```
    pub fn clear_all(&mut self) {
        self.words[..self.words_in_use].fill(0);
        self.words_in_use = 0;
    }

    /// Toggles the bit at the given index, growing the vector if needed.
    ///
    /// Returns the previous value of the bit (before the toggle).
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// assert_eq!(bv.flip(4), false); // flipped from false to true
    /// assert_eq!(bv.flip(4), true); // flipped from true to false
    /// assert!(bv.is_empty());
    /// ```
    pub fn flip(&mut self, idx: usize) -> bool {
        let word_idx = word_index(idx);
        self.expand_to(word_idx);
        let bit = 1u64 << (idx & BIT_INDEX_MASK);
        let previous = self.words[word_idx] & bit != 0;
        self.words[word_idx] ^= bit;
        self.recalculate_words_in_use();
        self.check_invariants();
        previous
    }

    /// Returns `true` if the bit at the given index is set.
    ///
    /// Any index is valid; bits beyond the end of the vector read as unset.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// bv.set(1);
    /// assert!(bv.get(1));
    /// assert!(!bv.get(0));
    /// assert!(!bv.get(10_000));
    /// ```
    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        let word_idx = word_index(idx);
        word_idx < self.words_in_use && self.words[word_idx] & 1u64 << (idx & BIT_INDEX_MASK) != 0
    }

    /// Applies `apply` to every word touched by a bit range, passing the
    /// mask of the range's bits within that word.
    fn for_each_masked_word(
        &mut self,
        start_word: usize,
        end_word: usize,
        first_mask: u64,
        last_mask: u64,
        mut apply: impl FnMut(&mut u64, u64),
    ) {
        // all within one word
        if start_word == end_word {
            apply(&mut self.words[start_word], first_mask & last_mask);
            return;
        }

        apply(&mut self.words[start_word], first_mask);
        for word in &mut self.words[start_word + 1..end_word] {
            apply(word, WORD_MASK);
        }
        apply(&mut self.words[end_word], last_mask);
    }

    /// Sets all bits in the given range, growing the vector if needed.
    ///
    /// # Errors
    /// Returns [`BitVectorError::IndexOutOfRange`] if `range.start >
    /// range.end`.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// bv.set_range(2..5).unwrap();
    /// assert_eq!(bv.to_string(), "{2, 3, 4}");
    /// ```
    pub fn set_range(&mut self, range: Range<usize>) -> Result<(), BitVectorError> {
        check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }

        let start_word = word_index(range.start);
        let end_word = word_index(range.end - 1);
        self.expand_to(end_word);
        self.for_each_masked_word(
            start_word,
            end_word,
            first_word_mask(range.start),
            last_word_mask(range.end),
            |word, mask| *word |= mask,
        );
        self.check_invariants();
        Ok(())
    }

    /// Sets all bits in the given range to `value`.
    ///
    /// # Errors
    /// Returns [`BitVectorError::IndexOutOfRange`] if `range.start >
    /// range.end`.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// bv.set_value_range(0..4, true).unwrap();
    /// bv.set_value_range(1..3, false).unwrap();
    /// assert_eq!(bv.to_string(), "{0, 3}");
    /// ```
    pub fn set_value_range(
        &mut self,
        range: Range<usize>,
        value: bool,
    ) -> Result<(), BitVectorError> {
        if value {
            self.set_range(range)
        } else {
            self.clear_range(range)
        }
    }

    /// Unsets all bits in the given range. Never grows the vector.
    ///
    /// # Errors
    /// Returns [`BitVectorError::IndexOutOfRange`] if `range.start >
    /// range.end`.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// bv.set_range(2..5).unwrap();
    /// bv.clear_range(3..4).unwrap();
    /// assert_eq!(bv.to_string(), "{2, 4}");
    /// ```
    pub fn clear_range(&mut self, range: Range<usize>) -> Result<(), BitVectorError> {
        check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }

        let start_word = word_index(range.start);
        if start_word >= self.words_in_use {
            return Ok(());
        }

        // words past the ones in use are already clear
        let (end_word, last_mask) = match word_index(range.end - 1) {
            end_word if end_word >= self.words_in_use => (self.words_in_use - 1, WORD_MASK),
            end_word => (end_word, last_word_mask(range.end)),
        };
        self.for_each_masked_word(
            start_word,
            end_word,
            first_word_mask(range.start),
            last_mask,
            |word, mask| *word &= !mask,
        );
        self.recalculate_words_in_use();
        self.check_invariants();
        Ok(())
    }

    /// Toggles all bits in the given range, growing the vector if needed.
    ///
    /// # Errors
    /// Returns [`BitVectorError::IndexOutOfRange`] if `range.start >
    /// range.end`.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// bv.set(1);
    /// bv.flip_range(0..3).unwrap();
    /// assert_eq!(bv.to_string(), "{0, 2}");
    /// ```
    pub fn flip_range(&mut self, range: Range<usize>) -> Result<(), BitVectorError> {
        check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }

        let start_word = word_index(range.start);
        let end_word = word_index(range.end - 1);
        self.expand_to(end_word);
        self.for_each_masked_word(
            start_word,
            end_word,
            first_word_mask(range.start),
            last_word_mask(range.end),
            |word, mask| *word ^= mask,
        );
        self.recalculate_words_in_use();
        self.check_invariants();
        Ok(())
    }

    /// Returns a new bit vector holding the bits of the given range, moved
    /// down so that `range.start` becomes bit 0.
    ///
    /// # Errors
    /// Returns [`BitVectorError::IndexOutOfRange`] if `range.start >
    /// range.end`.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let bv: BitVector = [3, 5, 70, 200].into_iter().collect();
    /// let slice = bv.get_range(5..100).unwrap();
    /// assert_eq!(slice.to_string(), "{0, 65}");
    /// assert!(bv.get_range(300..400).unwrap().is_empty());
    /// ```
    pub fn get_range(&self, range: Range<usize>) -> Result<BitVector, BitVectorError> {
        check_range(&range)?;
        let len = self.length();
        if len <= range.start || range.is_empty() {
            return Ok(Self::with_capacity(0));
        }

        let (start, end) = (range.start, min(range.end, len));
        let offset = start & BIT_INDEX_MASK;
        let target_words = word_index(end - start - 1) + 1;
        let mut source_idx = word_index(start);
        let mut result = Self::with_capacity(end - start);

        // every target word but the last merges two whole source words
        for target in &mut result.words[..target_words - 1] {
            *target = if offset == 0 {
                self.words[source_idx]
            } else {
                (self.words[source_idx] >> offset)
                    | (self.words[source_idx + 1] << (BITS_PER_WORD - offset))
            };
            source_idx += 1;
        }

        let last_mask = last_word_mask(end);
        result.words[target_words - 1] = if (end - 1) & BIT_INDEX_MASK < offset {
            // the last bits straddle a word boundary
            (self.words[source_idx] >> offset)
                | ((self.words[source_idx + 1] & last_mask) << (BITS_PER_WORD - offset))
        } else {
            (self.words[source_idx] & last_mask) >> offset
        };

        result.words_in_use = target_words;
        result.recalculate_words_in_use();
        result.check_invariants();
        Ok(result)
    }

    /// Returns the index of the first set bit at or after `from`, or `None`
    /// if there is none.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let bv: BitVector = [3, 5].into_iter().collect();
    /// assert_eq!(bv.next_set_bit(0), Some(3));
    /// assert_eq!(bv.next_set_bit(4), Some(5));
    /// assert_eq!(bv.next_set_bit(6), None);
    /// ```
    pub fn next_set_bit(&self, from: usize) -> Option<usize> {
        let mut word_idx = word_index(from);
        if word_idx >= self.words_in_use {
            return None;
        }

        let mut word = self.words[word_idx] & first_word_mask(from);
        loop {
            if word != 0 {
                return Some(word_idx * BITS_PER_WORD + word.trailing_zeros() as usize);
            }
            word_idx += 1;
            if word_idx == self.words_in_use {
                return None;
            }
            word = self.words[word_idx];
        }
    }

    /// Returns the index of the first unset bit at or after `from`.
    ///
    /// Since everything past the last set bit is unset, this always
    /// succeeds and may return an index beyond the current capacity.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let bv: BitVector = [0, 1, 2, 4].into_iter().collect();
    /// assert_eq!(bv.next_clear_bit(0), 3);
    /// assert_eq!(bv.next_clear_bit(4), 5);
    /// assert_eq!(bv.next_clear_bit(1000), 1000);
    /// ```
    pub fn next_clear_bit(&self, from: usize) -> usize {
        let mut word_idx = word_index(from);
        if word_idx >= self.words_in_use {
            return from;
        }

        let mut word = !self.words[word_idx] & first_word_mask(from);
        loop {
            if word != 0 {
                return word_idx * BITS_PER_WORD + word.trailing_zeros() as usize;
            }
            word_idx += 1;
            if word_idx == self.words_in_use {
                return self.words_in_use * BITS_PER_WORD;
            }
            word = !self.words[word_idx];
        }
    }

    /// Returns the index of the last set bit at or before `from`, or `None`
    /// if there is none.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let bv: BitVector = [3, 5].into_iter().collect();
    /// assert_eq!(bv.previous_set_bit(100), Some(5));
    /// assert_eq!(bv.previous_set_bit(4), Some(3));
    /// assert_eq!(bv.previous_set_bit(2), None);
    /// ```
    pub fn previous_set_bit(&self, from: usize) -> Option<usize> {
        let mut word_idx = word_index(from);
        if word_idx >= self.words_in_use {
            return self.length().checked_sub(1);
        }

        let mut word = self.words[word_idx] & last_word_mask(from + 1);
        loop {
            if word != 0 {
                return Some((word_idx + 1) * BITS_PER_WORD - 1 - word.leading_zeros() as usize);
            }
            if word_idx == 0 {
                return None;
            }
            word_idx -= 1;
            word = self.words[word_idx];
        }
    }

    /// Returns the index of the last unset bit at or before `from`, or
    /// `None` if every bit in `0..=from` is set.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let bv: BitVector = [0, 1, 3, 4].into_iter().collect();
    /// assert_eq!(bv.previous_clear_bit(4), Some(2));
    /// assert_eq!(bv.previous_clear_bit(1), None);
    /// assert_eq!(bv.previous_clear_bit(1000), Some(1000));
    /// ```
    pub fn previous_clear_bit(&self, from: usize) -> Option<usize> {
        let mut word_idx = word_index(from);
        if word_idx >= self.words_in_use {
            return Some(from);
        }

        let mut word = !self.words[word_idx] & last_word_mask(from + 1);
        loop {
            if word != 0 {
                return Some((word_idx + 1) * BITS_PER_WORD - 1 - word.leading_zeros() as usize);
            }
            if word_idx == 0 {
                return None;
            }
            word_idx -= 1;
            word = !self.words[word_idx];
        }
    }

    /// Returns the logical length: the index of the highest set bit plus
    /// one, or 0 if no bit is set.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::with_capacity(1000);
    /// assert_eq!(bv.length(), 0);
    /// bv.set(5);
    /// assert_eq!(bv.length(), 6);
    /// ```
    pub fn length(&self) -> usize {
        match self.words_in_use {
            0 => 0,
            n => BITS_PER_WORD * n - self.words[n - 1].leading_zeros() as usize,
        }
    }

    /// Returns the number of bits the backing array can hold without
    /// growing.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// assert_eq!(BitVector::with_capacity(65).size(), 128);
    /// ```
    pub fn size(&self) -> usize {
        self.words.len() * BITS_PER_WORD
    }

    /// Returns `true` if no bit is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words_in_use == 0
    }

    /// Returns the number of set bits.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut bv = BitVector::new();
    /// bv.set_range(60..200).unwrap();
    /// assert_eq!(bv.cardinality(), 140);
    /// ```
    pub fn cardinality(&self) -> usize {
        self.words[..self.words_in_use]
            .iter()
            .map(|&w| popcount(w))
            .sum()
    }

    /// Keeps only the bits that are also set in `other`.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut a: BitVector = [1, 2, 3].into_iter().collect();
    /// let b: BitVector = [2, 3, 4].into_iter().collect();
    /// a.and(&b);
    /// assert_eq!(a.to_string(), "{2, 3}");
    /// ```
    pub fn and(&mut self, other: &BitVector) {
        if self.words_in_use > other.words_in_use {
            self.words[other.words_in_use..self.words_in_use].fill(0);
            self.words_in_use = other.words_in_use;
        }

        for (word, other_word) in self.words[..self.words_in_use].iter_mut().zip(&other.words) {
            *word &= other_word;
        }
        self.recalculate_words_in_use();
        self.check_invariants();
    }

    /// Adds every bit that is set in `other`.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut a: BitVector = [1, 2, 3].into_iter().collect();
    /// let b: BitVector = [2, 3, 4].into_iter().collect();
    /// a.or(&b);
    /// assert_eq!(a.to_string(), "{1, 2, 3, 4}");
    /// ```
    pub fn or(&mut self, other: &BitVector) {
        let common = min(self.words_in_use, other.words_in_use);
        if self.words_in_use < other.words_in_use {
            self.ensure_capacity(other.words_in_use);
            self.words_in_use = other.words_in_use;
        }

        for (word, other_word) in self.words[..common].iter_mut().zip(&other.words) {
            *word |= other_word;
        }
        // the remaining words of `self` beyond `common` are still zero
        if common < other.words_in_use {
            self.words[common..other.words_in_use]
                .copy_from_slice(&other.words[common..other.words_in_use]);
        }
        self.check_invariants();
    }

    /// Keeps the bits that are set in exactly one of `self` and `other`.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut a: BitVector = [1, 2, 3].into_iter().collect();
    /// let b: BitVector = [2, 3, 4].into_iter().collect();
    /// a.xor(&b);
    /// assert_eq!(a.to_string(), "{1, 4}");
    /// ```
    pub fn xor(&mut self, other: &BitVector) {
        let common = min(self.words_in_use, other.words_in_use);
        if self.words_in_use < other.words_in_use {
            self.ensure_capacity(other.words_in_use);
            self.words_in_use = other.words_in_use;
        }

        for (word, other_word) in self.words[..common].iter_mut().zip(&other.words) {
            *word ^= other_word;
        }
        if common < other.words_in_use {
            self.words[common..other.words_in_use]
                .copy_from_slice(&other.words[common..other.words_in_use]);
        }
        self.recalculate_words_in_use();
        self.check_invariants();
    }

    /// Removes every bit that is set in `other`.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let mut a: BitVector = [1, 2, 3].into_iter().collect();
    /// let b: BitVector = [2, 3, 4].into_iter().collect();
    /// a.and_not(&b);
    /// assert_eq!(a.to_string(), "{1}");
    /// ```
    pub fn and_not(&mut self, other: &BitVector) {
        let common = min(self.words_in_use, other.words_in_use);
        for (word, other_word) in self.words[..common].iter_mut().zip(&other.words) {
            *word &= !other_word;
        }
        self.recalculate_words_in_use();
        self.check_invariants();
    }

    /// Returns `true` if some bit is set in both `self` and `other`.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let a: BitVector = [1, 200].into_iter().collect();
    /// let b: BitVector = [200].into_iter().collect();
    /// let c: BitVector = [2].into_iter().collect();
    /// assert!(a.intersects(&b));
    /// assert!(!a.intersects(&c));
    /// ```
    pub fn intersects(&self, other: &BitVector) -> bool {
        let common = min(self.words_in_use, other.words_in_use);
        self.words[..common]
            .iter()
            .zip(&other.words[..common])
            .any(|(word, other_word)| word & other_word != 0)
    }

    /// Returns `true` if every bit set in `other` is also set in `self`.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let a: BitVector = [1, 2, 3].into_iter().collect();
    /// let b: BitVector = [1, 3].into_iter().collect();
    /// assert!(a.contains_all(&b));
    /// assert!(!b.contains_all(&a));
    /// ```
    pub fn contains_all(&self, other: &BitVector) -> bool {
        // the highest in-use word of `other` is non-zero
        if other.words_in_use > self.words_in_use {
            return false;
        }
        self.words[..other.words_in_use]
            .iter()
            .zip(&other.words[..other.words_in_use])
            .all(|(word, other_word)| other_word & !word == 0)
    }

    /// Returns a hash of the set bits that only depends on which bits are
    /// set, not on the capacity.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// assert_eq!(BitVector::new().hash_code(), 1234);
    ///
    /// let mut small = BitVector::new();
    /// let mut large = BitVector::with_capacity(4096);
    /// small.set(70);
    /// large.set(70);
    /// assert_eq!(small.hash_code(), large.hash_code());
    /// ```
    pub fn hash_code(&self) -> u32 {
        let mut h: u64 = 1234;
        for (i, word) in self.words[..self.words_in_use].iter().enumerate().rev() {
            h ^= word.wrapping_mul(i as u64 + 1);
        }
        ((h >> 32) ^ h) as u32
    }

    /// Returns an iterator over the indices of all set bits, in ascending
    /// order.
    ///
    /// Iterating through the entire iterator runs in O(max(k, w)) where k is
    /// the number of set bits and w is the number of words in use.
    ///
    /// # Examples
    /// ```
    /// use light_bitvector::BitVector;
    ///
    /// let bv: BitVector = [0, 2, 64, 130].into_iter().collect();
    /// let ones: Vec<usize> = bv.iter_ones().collect();
    /// assert_eq!(ones, vec![0, 2, 64, 130]);
    /// ```
    #[inline]
    pub fn iter_ones(&self) -> IterOnes<'_> {
        let words = &self.words[..self.words_in_use];
        IterOnes {
            words,
            word_idx: 0,
            current: words.first().copied().unwrap_or(0),
        }
    }
}

impl Default for BitVector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for BitVector {
    /// Clones the vector into an independent backing array. A vector whose
    /// capacity was not explicitly requested is cloned trimmed to the words
    /// in use.
    fn clone(&self) -> Self {
        let words = if self.size_is_sticky {
            self.words.clone()
        } else {
            self.to_bit_list()
        };
        Self {
            words,
            words_in_use: self.words_in_use,
            size_is_sticky: self.size_is_sticky,
        }
    }
}

impl PartialEq for BitVector {
    fn eq(&self, other: &Self) -> bool {
        self.words_in_use == other.words_in_use
            && self.words[..self.words_in_use] == other.words[..other.words_in_use]
    }
}

impl Eq for BitVector {}

impl Hash for BitVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code());
    }
}

impl Display for BitVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, idx) in self.iter_ones().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{idx}")?;
        }
        write!(f, "}}")
    }
}

impl Debug for BitVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let length = self.length();
        write!(f, "LSB -> ")?;
        for i in 0..length {
            if i % 8 == 0 {
                write!(f, "{i}: ")?;
            }
            write!(f, "{}", if self.get(i) { '1' } else { '0' })?;
            if i % 8 == 7 && i < length - 1 {
                write!(f, " ")?;
            }
        }
        write!(f, " <- MSB")
    }
}

impl<'bv> IntoIterator for &'bv BitVector {
    type Item = usize;
    type IntoIter = IterOnes<'bv>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_ones()
    }
}

/// Constructs a bit vector by setting every index yielded by the iterator.
impl FromIterator<usize> for BitVector {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut bv = Self::new();
        bv.extend(iter);
        bv
    }
}

impl Extend<usize> for BitVector {
    fn extend<T: IntoIterator<Item = usize>>(&mut self, iter: T) {
        for idx in iter {
            self.set(idx);
        }
    }
}

impl BitAnd for &BitVector {
    type Output = BitVector;

    fn bitand(self, rhs: Self) -> Self::Output {
        let mut result = self.clone();
        result.and(rhs);
        result
    }
}

impl BitAndAssign<&BitVector> for BitVector {
    fn bitand_assign(&mut self, rhs: &BitVector) {
        self.and(rhs)
    }
}

impl BitOr for &BitVector {
    type Output = BitVector;

    fn bitor(self, rhs: Self) -> Self::Output {
        let mut result = self.clone();
        result.or(rhs);
        result
    }
}

impl BitOrAssign<&BitVector> for BitVector {
    fn bitor_assign(&mut self, rhs: &BitVector) {
        self.or(rhs)
    }
}

impl BitXor for &BitVector {
    type Output = BitVector;

    fn bitxor(self, rhs: Self) -> Self::Output {
        let mut result = self.clone();
        result.xor(rhs);
        result
    }
}

impl BitXorAssign<&BitVector> for BitVector {
    fn bitxor_assign(&mut self, rhs: &BitVector) {
        self.xor(rhs)
    }
}

/// Set difference, equivalent to [`BitVector::and_not`].
impl Sub for &BitVector {
    type Output = BitVector;

    fn sub(self, rhs: Self) -> Self::Output {
        let mut result = self.clone();
        result.and_not(rhs);
        result
    }
}

impl SubAssign<&BitVector> for BitVector {
    fn sub_assign(&mut self, rhs: &BitVector) {
        self.and_not(rhs)
    }
}

/// Iterator over the indices of set bits in the bit vector.
///
/// Yields the positions of all bits that are set, in ascending order.
///
/// Returned by [`BitVector::iter_ones()`].
#[derive(Clone, Copy)]
pub struct IterOnes<'bv> {
    words: &'bv [u64],
    word_idx: usize,
    current: u64,
}

impl Iterator for IterOnes<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.word_idx < self.words.len() {
            if self.current != 0 {
                let tz = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1; // unset LSB
                return Some(self.word_idx * BITS_PER_WORD + tz);
            }

            self.word_idx += 1;
            self.current = self.words.get(self.word_idx).copied().unwrap_or(0);
        }
        None
    }
}

impl FusedIterator for IterOnes<'_> {}
