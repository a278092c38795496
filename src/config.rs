//! Configuration types for CatalogDB.
//!
//! The [`Config`] struct controls catalog behavior including:
//! - Input limits (name length, description length, batch size)
//! - Result limits (prefix search, ratings)
//! - Compiled-regex cache size and durability settings
//!
//! # Example
//! ```rust
//! use catalogdb::{Config, SyncMode};
//!
//! // Use defaults (35-char names, 10-entry ratings)
//! let config = Config::default();
//!
//! // Customize for production
//! let config = Config {
//!     rule_cache_capacity: 1024,
//!     sync_mode: SyncMode::Paranoid,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Catalog configuration options.
///
/// All fields have sensible defaults. Use struct update syntax to override
/// specific settings:
///
/// ```rust
/// use catalogdb::Config;
///
/// let config = Config {
///     default_prefix_limit: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum record name length in characters.
    ///
    /// Default: 35
    pub max_name_length: usize,

    /// Maximum description length in characters.
    ///
    /// Default: 2000
    pub max_description_length: usize,

    /// Maximum number of records in one add batch.
    ///
    /// Default: 100
    pub max_batch_size: usize,

    /// Prefix search limit used when the caller gives none.
    ///
    /// Default: 10
    pub default_prefix_limit: usize,

    /// Upper bound on the caller-supplied prefix search limit.
    ///
    /// Default: 100
    pub max_prefix_limit: usize,

    /// Number of records in the likes/dislikes ratings.
    ///
    /// Default: 10
    pub rating_limit: usize,

    /// Number of compiled validation regexes kept in memory.
    ///
    /// Default: 256
    pub rule_cache_capacity: usize,

    /// Durability mode for write operations.
    pub sync_mode: SyncMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_name_length: 35,
            max_description_length: 2000,
            max_batch_size: 100,
            default_prefix_limit: 10,
            max_prefix_limit: 100,
            rating_limit: 10,
            rule_cache_capacity: 256,
            sync_mode: SyncMode::Normal,
        }
    }
}

impl Config {
    /// Creates a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// Called automatically by `Catalog::open()`.
    ///
    /// # Errors
    /// Returns `ValidationError` if any limit is 0, or if the default
    /// prefix limit exceeds the maximum.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let positive = [
            ("max_name_length", self.max_name_length),
            ("max_description_length", self.max_description_length),
            ("max_batch_size", self.max_batch_size),
            ("default_prefix_limit", self.default_prefix_limit),
            ("max_prefix_limit", self.max_prefix_limit),
            ("rating_limit", self.rating_limit),
            ("rule_cache_capacity", self.rule_cache_capacity),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ValidationError::invalid_field(
                    field,
                    "must be greater than 0",
                ));
            }
        }

        if self.default_prefix_limit > self.max_prefix_limit {
            return Err(ValidationError::invalid_field(
                "default_prefix_limit",
                format!("must not exceed max_prefix_limit ({})", self.max_prefix_limit),
            ));
        }

        Ok(())
    }

    /// Resolves a caller-supplied prefix limit against the configured bounds.
    ///
    /// `None` falls back to `default_prefix_limit`; zero is rejected.
    pub fn prefix_limit(&self, requested: Option<usize>) -> Result<usize, ValidationError> {
        match requested {
            None => Ok(self.default_prefix_limit),
            Some(0) => Err(ValidationError::invalid_field(
                "limit",
                "must be greater than 0",
            )),
            Some(n) => Ok(n.min(self.max_prefix_limit)),
        }
    }
}

/// Durability mode for write operations.
///
/// Controls the trade-off between write performance and crash safety.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    /// Sync to disk on transaction commit.
    #[default]
    Normal,

    /// Commit without fsync (faster writes, may lose recent data on crash).
    Fast,

    /// Two-phase commit on every write (slowest, maximum durability).
    Paranoid,
}

impl SyncMode {
    /// Returns true if this mode syncs on every write.
    pub fn is_paranoid(&self) -> bool {
        matches!(self, Self::Paranoid)
    }

    /// Returns true if this mode is async (may lose data on crash).
    pub fn is_fast(&self) -> bool {
        matches!(self, Self::Fast)
    }
}
