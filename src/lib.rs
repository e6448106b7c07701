//! Slotbits - Thread-Safe Slot Tracking Bit Vector
//!
//! Slotbits provides a fixed-capacity bit vector meant to sit underneath a
//! memory allocator or object pool: bit `i` set means "slot `i` is in use".
//! Callers hold bit indices as opaque slot identifiers and claim or release
//! them through the vector.
//!
//! # Key Characteristics
//!
//! - Packed `usize` words, LSB-first
//! - One lock per vector serializes every mutation and every search
//! - O(1) population count through a cached atomic counter
//! - First-zero / first-one search in O(words) using `trailing_ones` /
//!   `trailing_zeros`
//! - Atomic claim primitives: `test_and_set`, `get_and_set_first_zero`
//! - Capacity fixed at construction, no resizing
//!
//! # Architecture
//!
//! - **storage**: [`FixedWords`] (inline array, no heap, bounded by
//!   [`MAX_BITS`]) and [`HeapWords`] (heap-backed, unbounded)
//! - **lock**: [`VectorLock`], a non-cloneable mutex wrapper
//! - **bitvector**: [`BitVector`], the public type
//! - **render**: hex and binary diagnostics, [`BitVectorSnapshot`]
//! - **config**: [`BitVectorConfig`], serializable construction parameters
//!
//! # Examples
//!
//! ## Claiming slots
//!
//! ```
//! use slotbits::FixedBitVector;
//!
//! let slots = FixedBitVector::new(4, 0).unwrap();
//! assert_eq!(slots.get_and_set_first_zero(), Some(0));
//! assert_eq!(slots.test_and_set(2).unwrap(), 0);
//! assert_eq!(slots.get_and_set_first_zero(), Some(1));
//! assert_eq!(slots.get_and_set_first_zero(), Some(3));
//! assert_eq!(slots.get_and_set_first_zero(), None);
//! assert_eq!(slots.count_zeroes(), 0);
//! ```
//!
//! ## Sharing across threads
//!
//! ```
//! use slotbits::HeapBitVector;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let slots = Arc::new(HeapBitVector::new(1000, 0).unwrap());
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let slots = Arc::clone(&slots);
//!         thread::spawn(move || slots.get_and_set_first_zero())
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     assert!(handle.join().unwrap().is_some());
//! }
//! assert_eq!(slots.count_ones(), 4);
//! ```

pub mod bitvector;
pub mod config;
pub mod error;
pub mod lock;
pub mod render;
pub mod storage;

// Re-exports for convenient access
pub use bitvector::{BitVector, FixedBitVector, HeapBitVector};
pub use config::BitVectorConfig;
pub use error::{Result, SlotBitsError};
pub use lock::VectorLock;
pub use render::BitVectorSnapshot;
pub use storage::{FixedWords, HeapWords, Word, WordStorage, BITS_PER_WORD, MAX_BITS, MAX_WORDS};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_re_exports() {
        let _bv = FixedBitVector::new(32, 0).unwrap();
        let _result: Result<()> = Ok(());
        assert_eq!(BITS_PER_WORD, usize::BITS as usize);
        assert!(MAX_WORDS * BITS_PER_WORD >= MAX_BITS);
        assert!(VERSION.starts_with("1."));
    }
}
