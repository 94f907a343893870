//! Error types for container operations
//!
//! Reads are total and return `Option`. Errors are reserved for:
//! - Construction with an invalid size
//! - Explicit writes addressed before the start of a sequence
//! - Strict mapping lookups (`fetch`)
//! - Handle borrow conflicts and configuration parsing

/// Errors raised by container construction and explicit writes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    /// Requested size is negative or above the configured maximum
    #[error("invalid size {size}: {reason}")]
    InvalidSize {
        /// Requested size
        size: i64,
        /// Why the size was rejected
        reason: String,
    },

    /// Write addressed a negative index that lies before the first slot
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: isize,
        /// Sequence length at the time of the write
        len: usize,
    },

    /// Strict lookup of a key that is not present
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Handle is already borrowed through another alias
    #[error("value is already borrowed through another alias")]
    BorrowConflict,

    /// Configuration could not be parsed
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ContainerError {
    /// Negative size error
    #[must_use]
    pub fn negative_size(size: i64) -> Self {
        Self::InvalidSize {
            size,
            reason: "size must not be negative".to_string(),
        }
    }

    /// Size above the configured `max_slots`
    #[must_use]
    pub fn size_limit(size: i64, max_slots: usize) -> Self {
        Self::InvalidSize {
            size,
            reason: format!("exceeds configured maximum of {max_slots} slots"),
        }
    }

    /// Size the allocator refused
    #[must_use]
    pub fn unallocatable(size: i64, err: &std::collections::TryReserveError) -> Self {
        Self::InvalidSize {
            size,
            reason: err.to_string(),
        }
    }

    /// Missing key, rendered with its `Debug` form
    #[must_use]
    pub fn key_not_found(key: &impl std::fmt::Debug) -> Self {
        Self::KeyNotFound(format!("{key:?}"))
    }
}

impl From<toml::de::Error> for ContainerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias for container operations
pub type Result<T> = std::result::Result<T, ContainerError>;
