//! Human-readable renderings of a bit vector, for diagnostics only.
//!
//! - Hex: `ceil(capacity / 4)` lowercase digits, most-significant nibble
//!   first, i.e. the vector printed as one big integer. Bit 0 is the lowest
//!   bit of the last digit. A partial top nibble pads with zeros.
//! - Binary: exactly `capacity` characters in bit-index order, so character
//!   `k` is `'1'` iff bit `k` is set.
//!
//! Neither format is meant to be parsed back.

use crate::error::{Result, SlotBitsError};
use crate::storage::{bit_offset, word_index, Word};
use serde::{Deserialize, Serialize};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

#[inline]
fn bit_at(words: &[Word], bit_pos: usize) -> bool {
    (words[word_index(bit_pos)] >> bit_offset(bit_pos)) & 1 == 1
}

/// Render the first `capacity` bits of `words` as hex, most-significant first.
///
/// Bits past `capacity` must already be cleared.
pub fn hex_string(words: &[Word], capacity: usize) -> String {
    let num_nibbles = capacity.div_ceil(4);
    let mut out = String::with_capacity(num_nibbles);

    // Word width is a multiple of 4, so a nibble never straddles two words.
    for nibble_idx in (0..num_nibbles).rev() {
        let bit_pos = nibble_idx * 4;
        let nibble = (words[word_index(bit_pos)] >> bit_offset(bit_pos)) & 0xF;
        out.push(HEX_DIGITS[nibble] as char);
    }

    out
}

/// Render the first `capacity` bits of `words` as `'0'`/`'1'` in index order.
pub fn binary_string(words: &[Word], capacity: usize) -> String {
    (0..capacity)
        .map(|i| if bit_at(words, i) { '1' } else { '0' })
        .collect()
}

/// Point-in-time copy of a vector's state, taken under its lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitVectorSnapshot {
    /// Label of the vector the snapshot was taken from
    pub label: String,
    /// Capacity in bits
    pub capacity: usize,
    /// Number of set bits when the snapshot was taken
    pub ones: usize,
    /// Packed words, padding bits cleared
    pub words: Vec<Word>,
}

impl BitVectorSnapshot {
    /// Hex rendering of the captured bits.
    pub fn to_hex_string(&self) -> String {
        hex_string(&self.words, self.capacity)
    }

    /// Binary rendering of the captured bits.
    pub fn to_binary_string(&self) -> String {
        binary_string(&self.words, self.capacity)
    }

    /// Indices of the set bits, ascending.
    pub fn ones_indices(&self) -> Vec<usize> {
        (0..self.capacity).filter(|&i| bit_at(&self.words, i)).collect()
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlotBitsError::Serialization(e.to_string()))
    }
}
