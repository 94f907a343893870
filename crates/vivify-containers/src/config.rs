//! Container configuration
//!
//! [`ContainerConfig`] can bound how many slots a [`crate::FixedSizeContainer`]
//! will allocate in one call. Unbounded unless set.

use crate::error::Result;
use serde::Deserialize;

/// Default upper bound on slots allocated by a single construction call
pub const DEFAULT_MAX_SLOTS: usize = usize::MAX;

/// Limits applied at construction time
///
/// # Example
/// ```
/// use vivify_containers::ContainerConfig;
///
/// let config = ContainerConfig::from_toml_str("max_slots = 64").unwrap();
/// assert_eq!(config.max_slots, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Largest size accepted by `create*` operations
    pub max_slots: usize,
}

impl ContainerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With max slots
    #[inline]
    #[must_use]
    pub fn with_max_slots(mut self, max: usize) -> Self {
        self.max_slots = max;
        self
    }

    /// Parse from TOML; missing fields take their defaults
    ///
    /// # Errors
    /// Returns [`crate::ContainerError::Config`] on malformed input
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_slots: DEFAULT_MAX_SLOTS,
        }
    }
}
