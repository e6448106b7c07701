//! Bit vector configuration.
//!
//! A [`BitVectorConfig`] captures the construction parameters of a vector so
//! an allocator or pool can describe its slot map in a config file and build
//! it at startup. Configs serialize to JSON (`serde_json`) or a compact binary
//! form (`bincode`).
//!
//! # Example
//!
//! ```
//! use slotbits::{BitVectorConfig, FixedBitVector};
//!
//! let config = BitVectorConfig::new(256, 0).with_label("inode-slots");
//! let json = config.to_json().unwrap();
//!
//! let restored = BitVectorConfig::from_json(&json).unwrap();
//! let slots = FixedBitVector::from_config(&restored).unwrap();
//! assert_eq!(slots.capacity(), 256);
//! assert_eq!(slots.label(), "inode-slots");
//! ```

use crate::error::{Result, SlotBitsError};
use serde::{Deserialize, Serialize};

/// Label given to vectors built without one.
pub const DEFAULT_LABEL: &str = "bitvector";

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

/// Construction parameters for a bit vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitVectorConfig {
    /// Name used in log output and snapshots
    #[serde(default = "default_label")]
    pub label: String,

    /// Number of logical bits
    pub capacity: usize,

    /// Initial value of every bit (0 or 1)
    #[serde(default)]
    pub initial_value: u8,
}

impl BitVectorConfig {
    /// Create a config with the default label.
    pub fn new(capacity: usize, initial_value: u8) -> Self {
        Self {
            label: default_label(),
            capacity,
            initial_value,
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Check that the initial value is 0 or 1.
    ///
    /// Capacity limits depend on the storage variant and are checked at
    /// construction.
    pub fn validate(&self) -> Result<()> {
        if self.initial_value > 1 {
            return Err(SlotBitsError::InvalidParameter(format!(
                "initial_value must be 0 or 1, got {}",
                self.initial_value
            )));
        }
        Ok(())
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlotBitsError::Serialization(e.to_string()))
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SlotBitsError::Serialization(e.to_string()))
    }

    /// Serialize to binary (bincode).
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| SlotBitsError::Serialization(format!("Binary serialization failed: {}", e)))
    }

    /// Deserialize from binary (bincode).
    pub fn from_binary(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| SlotBitsError::Serialization(format!("Binary deserialization failed: {}", e)))
    }
}
