//! Packed word storage for bit vectors.
//!
//! Bits are packed into `usize` words, LSB-first:
//!
//! - word index = `bit / BITS_PER_WORD`
//! - bit offset = `bit % BITS_PER_WORD` (offset 0 is the least significant bit)
//!
//! Two storage variants share the [`WordStorage`] contract:
//!
//! - [`FixedWords`]: an inline array sized for [`MAX_BITS`]. No heap
//!   allocation, predictable construction latency. Suited to embedding in an
//!   allocator or pool.
//! - [`HeapWords`]: heap-backed words over `bitvec::BitVec<usize, Lsb0>`, for
//!   any capacity.
//!
//! Storage only knows about whole words. Masking of padding bits past the
//! logical capacity is the owner's job (see [`crate::BitVector`]).

use crate::error::{Result, SlotBitsError};
use bitvec::prelude::*;

/// Word type for bit storage (native machine word)
pub type Word = usize;

/// Number of bits per word
pub const BITS_PER_WORD: usize = Word::BITS as usize;

/// Maximum word value
pub const WORD_MAX: Word = Word::MAX;

/// Maximum number of bits a [`FixedWords`] store can hold
pub const MAX_BITS: usize = 10240;

/// Number of words in a [`FixedWords`] store
pub const MAX_WORDS: usize = MAX_BITS.div_ceil(BITS_PER_WORD);

/// Get word index from bit position
#[inline(always)]
pub const fn word_index(bit_pos: usize) -> usize {
    bit_pos / BITS_PER_WORD
}

/// Get bit offset within word from bit position
#[inline(always)]
pub const fn bit_offset(bit_pos: usize) -> usize {
    bit_pos % BITS_PER_WORD
}

/// Create bitmask with `n` bits set (from LSB)
#[inline(always)]
pub const fn bitmask(n: usize) -> Word {
    if n == 0 {
        0
    } else if n >= BITS_PER_WORD {
        WORD_MAX
    } else {
        WORD_MAX >> (BITS_PER_WORD - n)
    }
}

/// Number of words needed to hold `capacity` bits
#[inline(always)]
pub const fn word_count_for(capacity: usize) -> usize {
    capacity.div_ceil(BITS_PER_WORD)
}

/// Backing store of packed words.
///
/// Implementations must be `Send` so the owning vector can be shared across
/// threads behind its lock.
pub trait WordStorage: Send + Sized {
    /// Largest capacity in bits this storage accepts, `None` if unbounded.
    const MAX_BITS: Option<usize>;

    /// Short name used in log output.
    const NAME: &'static str;

    /// Allocate `word_count` words, every bit set to `fill`.
    fn allocate(word_count: usize, fill: bool) -> Result<Self>;

    /// Read-only view of the live words.
    fn words(&self) -> &[Word];

    /// Mutable view of the live words.
    fn words_mut(&mut self) -> &mut [Word];

    /// Bytes held outside the owning struct.
    fn heap_bytes(&self) -> usize {
        0
    }
}

/// Inline, allocation-free word storage bounded by [`MAX_BITS`].
pub struct FixedWords {
    words: [Word; MAX_WORDS],
    len: usize,
}

impl WordStorage for FixedWords {
    const MAX_BITS: Option<usize> = Some(MAX_BITS);
    const NAME: &'static str = "fixed";

    fn allocate(word_count: usize, fill: bool) -> Result<Self> {
        if word_count > MAX_WORDS {
            return Err(SlotBitsError::CapacityExceeded {
                requested: word_count.saturating_mul(BITS_PER_WORD),
                max: MAX_BITS,
            });
        }
        let pattern = if fill { WORD_MAX } else { 0 };
        let mut words = [0; MAX_WORDS];
        words[..word_count].fill(pattern);
        Ok(Self {
            words,
            len: word_count,
        })
    }

    #[inline(always)]
    fn words(&self) -> &[Word] {
        &self.words[..self.len]
    }

    #[inline(always)]
    fn words_mut(&mut self) -> &mut [Word] {
        &mut self.words[..self.len]
    }
}

/// Heap-backed word storage with no upper bound.
pub struct HeapWords {
    bv: BitVec<Word, Lsb0>,
}

impl WordStorage for HeapWords {
    const MAX_BITS: Option<usize> = None;
    const NAME: &'static str = "heap";

    fn allocate(word_count: usize, fill: bool) -> Result<Self> {
        let num_bits = word_count.checked_mul(BITS_PER_WORD).ok_or_else(|| {
            SlotBitsError::InvalidParameter(format!("{} words overflow bit count", word_count))
        })?;
        Ok(Self {
            bv: BitVec::repeat(fill, num_bits),
        })
    }

    #[inline(always)]
    fn words(&self) -> &[Word] {
        self.bv.as_raw_slice()
    }

    #[inline(always)]
    fn words_mut(&mut self) -> &mut [Word] {
        self.bv.as_raw_mut_slice()
    }

    fn heap_bytes(&self) -> usize {
        self.bv.capacity().div_ceil(8)
    }
}
