//! BitVector - fixed-capacity, thread-safe slot map.
//!
//! Each bit tracks whether slot `i` of an allocator or pool is in use. The
//! vector is shared by reference (typically through `Arc`). Every method
//! takes `&self`.
//!
//! # Design
//!
//! - Packed `usize` words, LSB-first (see [`crate::storage`])
//! - One [`VectorLock`] guards every read-modify-write and every multi-word
//!   read, so searches observe a consistent snapshot
//! - An `AtomicUsize` caches the population count; it is only written while
//!   the lock is held and can be read without it
//! - Padding bits past `capacity` in the last word are always 0 and never
//!   returned by a search
//!
//! Indices are validated before the lock is taken, so a failed call never
//! mutates the words or the count.
//!
//! # Examples
//!
//! ```
//! use slotbits::FixedBitVector;
//!
//! let slots = FixedBitVector::new(100, 0).unwrap();
//! assert_eq!(slots.get_and_set_first_zero(), Some(0));
//! assert_eq!(slots.get_and_set_first_zero(), Some(1));
//! assert_eq!(slots.count_ones(), 2);
//!
//! assert_eq!(slots.test_and_clear(0).unwrap(), 1);
//! assert_eq!(slots.first_zero(), Some(0));
//! ```

use crate::config::BitVectorConfig;
use crate::error::{Result, SlotBitsError};
use crate::lock::VectorLock;
use crate::render::{self, BitVectorSnapshot};
use crate::storage::{
    bit_offset, bitmask, word_count_for, word_index, FixedWords, HeapWords, Word, WordStorage,
    BITS_PER_WORD, WORD_MAX,
};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, trace};

/// Thread-safe bit vector with a fixed capacity.
///
/// Not `Clone`: a vector's lock identity must not be duplicated. Take a
/// [`snapshot`](BitVector::snapshot) to copy its contents.
pub struct BitVector<S: WordStorage = FixedWords> {
    label: String,
    capacity: usize,
    word_count: usize,
    words: VectorLock<S>,
    count_of_ones: AtomicUsize,
}

/// Allocation-free vector bounded by [`crate::MAX_BITS`].
pub type FixedBitVector = BitVector<FixedWords>;

/// Heap-backed vector with unbounded capacity.
pub type HeapBitVector = BitVector<HeapWords>;

impl<S: WordStorage> BitVector<S> {
    /// Create a vector of `capacity` bits, all set to `initial_value` (0 or 1).
    ///
    /// # Errors
    ///
    /// - [`SlotBitsError::CapacityExceeded`] if the storage cannot hold
    ///   `capacity` bits
    /// - [`SlotBitsError::InvalidParameter`] if `initial_value > 1`
    ///
    /// # Examples
    ///
    /// ```
    /// use slotbits::HeapBitVector;
    ///
    /// let bv = HeapBitVector::new(70, 1).unwrap();
    /// assert_eq!(bv.count_ones(), 70);
    /// assert_eq!(bv.first_zero(), None);
    /// ```
    pub fn new(capacity: usize, initial_value: u8) -> Result<Self> {
        Self::from_config(&BitVectorConfig::new(capacity, initial_value))
    }

    /// Same as [`new`](BitVector::new), with a label for logs and snapshots.
    pub fn with_label(label: impl Into<String>, capacity: usize, initial_value: u8) -> Result<Self> {
        Self::from_config(&BitVectorConfig::new(capacity, initial_value).with_label(label))
    }

    /// Build a vector from a [`BitVectorConfig`].
    pub fn from_config(config: &BitVectorConfig) -> Result<Self> {
        config.validate()?;

        let capacity = config.capacity;
        if let Some(max) = S::MAX_BITS {
            if capacity > max {
                return Err(SlotBitsError::CapacityExceeded {
                    requested: capacity,
                    max,
                });
            }
        }

        let fill = config.initial_value == 1;
        let word_count = word_count_for(capacity);
        let mut storage = S::allocate(word_count, fill)?;

        // Clear padding bits in the last word
        let tail = bit_offset(capacity);
        if tail != 0 {
            storage.words_mut()[word_count - 1] &= bitmask(tail);
        }

        debug!(
            label = %config.label,
            capacity,
            word_count,
            storage = S::NAME,
            initial_value = config.initial_value,
            "created bit vector"
        );

        Ok(Self {
            label: config.label.clone(),
            capacity,
            word_count,
            words: VectorLock::new(storage),
            count_of_ones: AtomicUsize::new(if fill { capacity } else { 0 }),
        })
    }

    /// Get total number of bits.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get number of storage words.
    #[inline(always)]
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Label given at construction.
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    fn check_index(&self, bit_number: usize) -> Result<()> {
        if bit_number >= self.capacity {
            return Err(SlotBitsError::IndexOutOfRange {
                index: bit_number,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Single Bit Operations
    // =========================================================================

    /// Whether bit `bit_number` is 1.
    ///
    /// # Errors
    ///
    /// [`SlotBitsError::IndexOutOfRange`] if `bit_number >= capacity`.
    pub fn is_set(&self, bit_number: usize) -> Result<bool> {
        self.check_index(bit_number)?;
        let guard = self.words.lock();
        Ok(read_bit(guard.words(), bit_number))
    }

    /// Value of bit `bit_number` as 0 or 1.
    pub fn bit_value(&self, bit_number: usize) -> Result<u8> {
        self.is_set(bit_number).map(u8::from)
    }

    /// Set bit `bit_number` to `new_bit_value`. Any non-zero value is 1.
    pub fn set_bit_to(&self, bit_number: usize, new_bit_value: u8) -> Result<()> {
        self.check_index(bit_number)?;
        let mut guard = self.words.lock();
        self.write_and_count(guard.words_mut(), bit_number, new_bit_value != 0);
        Ok(())
    }

    /// Set bit `bit_number` to 1 and return its prior value.
    ///
    /// Read and write happen under one lock acquisition, so two callers
    /// racing on the same free slot see exactly one 0.
    pub fn test_and_set(&self, bit_number: usize) -> Result<u8> {
        self.check_index(bit_number)?;
        let mut guard = self.words.lock();
        let prior = self.write_and_count(guard.words_mut(), bit_number, true);
        Ok(u8::from(prior))
    }

    /// Clear bit `bit_number` and return its prior value.
    pub fn test_and_clear(&self, bit_number: usize) -> Result<u8> {
        self.check_index(bit_number)?;
        let mut guard = self.words.lock();
        let prior = self.write_and_count(guard.words_mut(), bit_number, false);
        Ok(u8::from(prior))
    }

    /// Write one bit and keep the count in step. Caller holds the lock.
    #[inline]
    fn write_and_count(&self, words: &mut [Word], bit_number: usize, value: bool) -> bool {
        let prior = write_bit(words, bit_number, value);
        match (prior, value) {
            (false, true) => {
                self.count_of_ones.fetch_add(1, Ordering::Release);
            }
            (true, false) => {
                self.count_of_ones.fetch_sub(1, Ordering::Release);
            }
            _ => {}
        }
        prior
    }

    // =========================================================================
    // Search Operations
    // =========================================================================

    /// Index of the lowest clear bit, or `None` if every bit is set.
    pub fn first_zero(&self) -> Option<usize> {
        let guard = self.words.lock();
        find_first_zero(guard.words(), self.capacity)
    }

    /// Find the lowest clear bit and set it, as one step.
    ///
    /// Concurrent callers never claim the same index.
    pub fn get_and_set_first_zero(&self) -> Option<usize> {
        self.claim_first(false)
    }

    /// Index of the lowest set bit, or `None` if every bit is clear.
    pub fn first_one(&self) -> Option<usize> {
        let guard = self.words.lock();
        find_first_one(guard.words(), self.capacity)
    }

    /// Find the lowest set bit and clear it, as one step.
    pub fn get_and_clear_first_one(&self) -> Option<usize> {
        self.claim_first(true)
    }

    /// Search for the first bit equal to `from` and flip it, under one lock.
    fn claim_first(&self, from: bool) -> Option<usize> {
        let mut guard = self.words.lock();
        let words = guard.words_mut();

        let found = if from {
            find_first_one(words, self.capacity)
        } else {
            find_first_zero(words, self.capacity)
        };

        match found {
            Some(index) => {
                self.write_and_count(words, index, !from);
                trace!(label = %self.label, index, value = u8::from(!from), "flipped first match");
            }
            None => {
                trace!(label = %self.label, wanted = u8::from(from), "no matching bit");
            }
        }

        found
    }

    // =========================================================================
    // Counting Operations
    // =========================================================================

    /// Number of set bits. O(1), reads the cached count without locking.
    ///
    /// Reflects every completed mutation. It is not linearized with a
    /// mutation in flight on another thread.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.count_of_ones.load(Ordering::Acquire)
    }

    /// Number of clear bits, `capacity - count_ones()`.
    #[inline]
    pub fn count_zeroes(&self) -> usize {
        self.capacity - self.count_ones()
    }

    // =========================================================================
    // Information and Debug
    // =========================================================================

    /// Hex rendering, most-significant nibble first (see [`crate::render`]).
    pub fn to_hex_string(&self) -> String {
        let guard = self.words.lock();
        render::hex_string(guard.words(), self.capacity)
    }

    /// Binary rendering, one character per bit in index order.
    pub fn to_binary_string(&self) -> String {
        let guard = self.words.lock();
        render::binary_string(guard.words(), self.capacity)
    }

    /// Consistent copy of the words and count, taken under the lock.
    pub fn snapshot(&self) -> BitVectorSnapshot {
        let guard = self.words.lock();
        BitVectorSnapshot {
            label: self.label.clone(),
            capacity: self.capacity,
            ones: self.count_ones(),
            words: guard.words().to_vec(),
        }
    }

    /// Estimate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        let guard = self.words.lock();
        std::mem::size_of::<Self>() + self.label.capacity() + guard.heap_bytes()
    }
}

impl<S: WordStorage> fmt::Debug for BitVector<S> {
    /// Never blocks: a held lock prints as `<locked>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("BitVector");
        dbg.field("label", &self.label)
            .field("capacity", &self.capacity)
            .field("storage", &S::NAME)
            .field("ones", &self.count_ones());
        match self.words.try_lock() {
            Some(guard) => dbg.field("bits", &render::hex_string(guard.words(), self.capacity)),
            None => dbg.field("bits", &"<locked>"),
        };
        dbg.finish()
    }
}

// =============================================================================
// Word-Level Helpers
// =============================================================================

#[inline(always)]
fn read_bit(words: &[Word], bit_number: usize) -> bool {
    (words[word_index(bit_number)] >> bit_offset(bit_number)) & 1 == 1
}

/// Write a bit, returning its prior value.
#[inline(always)]
fn write_bit(words: &mut [Word], bit_number: usize, value: bool) -> bool {
    let word = &mut words[word_index(bit_number)];
    let mask: Word = 1 << bit_offset(bit_number);
    let prior = *word & mask != 0;
    if value {
        *word |= mask;
    } else {
        *word &= !mask;
    }
    prior
}

/// Lowest clear bit below `capacity`.
///
/// Padding bits in the last word read as set, so they are never returned.
fn find_first_zero(words: &[Word], capacity: usize) -> Option<usize> {
    let last = words.len().checked_sub(1)?;
    let tail = bit_offset(capacity);
    let padding = if tail == 0 { 0 } else { !bitmask(tail) };

    for (word_idx, &word) in words.iter().enumerate() {
        let word = if word_idx == last { word | padding } else { word };
        if word != WORD_MAX {
            return Some(word_idx * BITS_PER_WORD + word.trailing_ones() as usize);
        }
    }

    None
}

/// Lowest set bit below `capacity`.
fn find_first_one(words: &[Word], capacity: usize) -> Option<usize> {
    words
        .iter()
        .enumerate()
        .find(|(_, word)| **word != 0)
        .map(|(word_idx, &word)| word_idx * BITS_PER_WORD + word.trailing_zeros() as usize)
        .filter(|&index| index < capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LABEL;
    use crate::MAX_BITS;

    #[test]
    fn test_new() {
        let bv = FixedBitVector::new(1024, 0).unwrap();
        assert_eq!(bv.capacity(), 1024);
        assert_eq!(bv.word_count(), 1024 / BITS_PER_WORD);
        assert_eq!(bv.count_ones(), 0);
        assert_eq!(bv.count_zeroes(), 1024);
        assert_eq!(bv.label(), DEFAULT_LABEL);
    }

    #[test]
    fn test_new_all_set_masks_padding() {
        let capacity = BITS_PER_WORD + 3;
        let bv = FixedBitVector::new(capacity, 1).unwrap();
        assert_eq!(bv.count_ones(), capacity);

        let snap = bv.snapshot();
        assert_eq!(snap.words[1], 0b111);
        assert_eq!(bv.first_zero(), None);
    }

    #[test]
    fn test_new_rejects_bad_initial_value() {
        let err = FixedBitVector::new(8, 2).unwrap_err();
        assert!(matches!(err, SlotBitsError::InvalidParameter(_)));
    }

    #[test]
    fn test_fixed_capacity_limit() {
        assert!(FixedBitVector::new(MAX_BITS, 1).is_ok());

        let err = FixedBitVector::new(MAX_BITS + 1, 0).unwrap_err();
        assert_eq!(
            err,
            SlotBitsError::CapacityExceeded {
                requested: MAX_BITS + 1,
                max: MAX_BITS
            }
        );

        assert!(HeapBitVector::new(MAX_BITS + 1, 0).is_ok());
    }

    #[test]
    fn test_set_get_bit() {
        let bv = FixedBitVector::new(32, 0).unwrap();
        assert!(!bv.is_set(5).unwrap());
        bv.set_bit_to(5, 1).unwrap();
        assert!(bv.is_set(5).unwrap());
        assert_eq!(bv.bit_value(5).unwrap(), 1);
        bv.set_bit_to(5, 0).unwrap();
        assert_eq!(bv.bit_value(5).unwrap(), 0);
    }

    #[test]
    fn test_set_bit_to_counts_transitions_only() {
        let bv = FixedBitVector::new(32, 0).unwrap();
        bv.set_bit_to(3, 1).unwrap();
        bv.set_bit_to(3, 1).unwrap();
        assert_eq!(bv.count_ones(), 1);

        bv.set_bit_to(3, 42).unwrap(); // Any non-zero is treated as 1
        assert_eq!(bv.count_ones(), 1);

        bv.set_bit_to(3, 0).unwrap();
        bv.set_bit_to(3, 0).unwrap();
        assert_eq!(bv.count_ones(), 0);
    }

    #[test]
    fn test_test_and_set_clear() {
        let bv = FixedBitVector::new(16, 0).unwrap();
        assert_eq!(bv.test_and_set(7).unwrap(), 0);
        assert_eq!(bv.test_and_set(7).unwrap(), 1);
        assert_eq!(bv.count_ones(), 1);

        assert_eq!(bv.test_and_clear(7).unwrap(), 1);
        assert_eq!(bv.test_and_clear(7).unwrap(), 0);
        assert_eq!(bv.count_ones(), 0);
    }

    #[test]
    fn test_out_of_range_has_no_side_effects() {
        let bv = FixedBitVector::new(10, 0).unwrap();
        let before = bv.snapshot();

        for idx in [10, 11, usize::MAX] {
            let expected = SlotBitsError::IndexOutOfRange {
                index: idx,
                capacity: 10,
            };
            assert_eq!(bv.is_set(idx).unwrap_err(), expected);
            assert_eq!(bv.bit_value(idx).unwrap_err(), expected);
            assert_eq!(bv.set_bit_to(idx, 1).unwrap_err(), expected);
            assert_eq!(bv.test_and_set(idx).unwrap_err(), expected);
            assert_eq!(bv.test_and_clear(idx).unwrap_err(), expected);
        }

        assert_eq!(bv.snapshot(), before);
    }

    #[test]
    fn test_find_first_zero_and_one() {
        let bv = FixedBitVector::new(200, 0).unwrap();
        assert_eq!(bv.first_zero(), Some(0));
        assert_eq!(bv.first_one(), None);

        for i in 0..130 {
            bv.set_bit_to(i, 1).unwrap();
        }
        assert_eq!(bv.first_zero(), Some(130));
        assert_eq!(bv.first_one(), Some(0));

        bv.set_bit_to(0, 0).unwrap();
        assert_eq!(bv.first_zero(), Some(0));
        assert_eq!(bv.first_one(), Some(1));
    }

    #[test]
    fn test_get_and_clear_first_one() {
        let bv = FixedBitVector::new(70, 1).unwrap();
        for expected in 0..70 {
            assert_eq!(bv.get_and_clear_first_one(), Some(expected));
        }
        assert_eq!(bv.get_and_clear_first_one(), None);
        assert_eq!(bv.count_ones(), 0);
    }

    #[test]
    fn test_zero_capacity() {
        let bv = HeapBitVector::new(0, 1).unwrap();
        assert_eq!(bv.word_count(), 0);
        assert_eq!(bv.count_ones(), 0);
        assert_eq!(bv.first_zero(), None);
        assert_eq!(bv.first_one(), None);
        assert_eq!(bv.get_and_set_first_zero(), None);
        assert!(bv.is_set(0).is_err());
        assert_eq!(bv.to_binary_string(), "");
        assert_eq!(bv.to_hex_string(), "");
    }

    #[test]
    fn test_renderings() {
        let bv = FixedBitVector::new(12, 0).unwrap();
        bv.set_bit_to(0, 1).unwrap();
        bv.set_bit_to(11, 1).unwrap();
        assert_eq!(bv.to_binary_string(), "100000000001");
        assert_eq!(bv.to_hex_string(), "801");
    }

    #[test]
    fn test_debug_does_not_block() {
        let bv = FixedBitVector::with_label("frames", 8, 0).unwrap();
        bv.set_bit_to(1, 1).unwrap();
        let text = format!("{:?}", bv);
        assert!(text.contains("frames"));
        assert!(text.contains("\"02\""));

        let _guard = bv.words.lock();
        assert!(format!("{:?}", bv).contains("<locked>"));
    }

    #[test]
    fn test_memory_usage() {
        let fixed = FixedBitVector::new(64, 0).unwrap();
        assert!(fixed.memory_usage() >= std::mem::size_of::<FixedWords>());

        let heap = HeapBitVector::new(1 << 16, 0).unwrap();
        assert!(heap.memory_usage() >= (1 << 16) / 8);
    }

    #[test]
    fn test_helpers_direct() {
        let mut words = [0 as Word; 2];
        assert!(!write_bit(&mut words, BITS_PER_WORD + 1, true));
        assert!(write_bit(&mut words, BITS_PER_WORD + 1, true));
        assert!(read_bit(&words, BITS_PER_WORD + 1));
        assert_eq!(find_first_one(&words, 2 * BITS_PER_WORD), Some(BITS_PER_WORD + 1));
        // Set bit sits past the logical capacity
        assert_eq!(find_first_one(&words, BITS_PER_WORD + 1), None);
    }
}
