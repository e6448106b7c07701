//! Error types for slotbits.
//!
//! Every error here is a caller precondition violation. None of them is
//! retried or recovered internally, and none leaves a partially mutated
//! vector behind.

use thiserror::Error;

/// The main error type for slotbits operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotBitsError {
    /// A bit index at or past the vector's capacity
    #[error("Bit index out of range: index {index}, capacity {capacity}")]
    IndexOutOfRange {
        /// The index that was addressed
        index: usize,
        /// The vector's capacity
        capacity: usize,
    },

    /// Construction asked for more bits than the storage can hold
    #[error("Capacity exceeds maximum: requested {requested} bits, maximum {max}")]
    CapacityExceeded {
        /// Requested capacity in bits
        requested: usize,
        /// Maximum capacity of the storage variant
        max: usize,
    },

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration or snapshot (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A specialized `Result` type for slotbits operations.
pub type Result<T> = std::result::Result<T, SlotBitsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SlotBitsError::IndexOutOfRange {
            index: 64,
            capacity: 64,
        };
        assert_eq!(
            err.to_string(),
            "Bit index out of range: index 64, capacity 64"
        );

        let err = SlotBitsError::CapacityExceeded {
            requested: 20000,
            max: 10240,
        };
        assert_eq!(
            err.to_string(),
            "Capacity exceeds maximum: requested 20000 bits, maximum 10240"
        );
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<usize> {
            Ok(7)
        }

        assert_eq!(returns_result().unwrap(), 7);
    }
}
