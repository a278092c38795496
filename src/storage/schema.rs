//! Database schema definitions and versioning.
//!
//! This module defines the table structure for the redb storage engine.
//! All table definitions are compile-time constants to ensure consistency.
//!
//! # Schema Versioning
//!
//! The schema version is stored in the metadata table. When opening an
//! existing database, we check the version and fail if it doesn't match.
//!
//! # Table Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ METADATA_TABLE                                               │
//! │   Key: &str                                                  │
//! │   Value: &[u8] (bincode)                                     │
//! │   Entries: "db_metadata" -> DatabaseMetadata                 │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ RECORDS_TABLE                                                │
//! │   Key: u64 (RecordId)                                        │
//! │   Value: &[u8] (bincode-serialized Record)                   │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ NAMES_TABLE                                                  │
//! │   Key: &str (lower-cased name)                               │
//! │   Value: u64 (RecordId)                                      │
//! │   Unique-name constraint and case-insensitive name order     │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ RULES_TABLE                                                  │
//! │   Key: u64 (RuleId)                                          │
//! │   Value: &[u8] (bincode-serialized ValidationRule)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use redb::{MultimapTableDefinition, TableDefinition};
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Current schema version.
///
/// Increment this when making breaking changes to the schema.
/// The database will refuse to open if versions don't match.
pub const SCHEMA_VERSION: u32 = 1;

// ============================================================================
// Table Definitions
// ============================================================================

/// Metadata table for database-level information.
pub const METADATA_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("metadata");

/// Records table.
///
/// Key: RecordId
/// Value: bincode-serialized Record struct
pub const RECORDS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("records");

/// Index: record id by lower-cased name.
///
/// Serves both the case-insensitive uniqueness check on insert and prefix
/// search, which is a range scan starting at the prefix.
pub const NAMES_TABLE: TableDefinition<&str, u64> = TableDefinition::new("record_names");

/// Validation rules table.
///
/// Key: RuleId
/// Value: bincode-serialized ValidationRule struct
pub const RULES_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("rules");

/// Index: rule ids by purpose tag.
///
/// Multimap values are kept sorted, so a purpose lists in ascending id order.
pub const RULES_BY_PURPOSE_TABLE: MultimapTableDefinition<u8, u64> =
    MultimapTableDefinition::new("rules_by_purpose");

/// Id sequences, one entry per id space.
pub const SEQUENCES_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequences");

/// Sequence key for record ids.
pub const RECORD_SEQUENCE: &str = "records";

/// Sequence key for rule ids.
pub const RULE_SEQUENCE: &str = "rules";

// ============================================================================
// Database Metadata
// ============================================================================

/// Database metadata stored in the metadata table.
///
/// This is serialized with bincode and stored under the key "db_metadata".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    /// Schema version for compatibility checking.
    pub schema_version: u32,

    /// Timestamp when the database was created.
    pub created_at: Timestamp,

    /// Last time the database was opened (updated on each open).
    pub last_opened_at: Timestamp,
}

impl DatabaseMetadata {
    /// Creates new metadata for a fresh database.
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            schema_version: SCHEMA_VERSION,
            created_at: now,
            last_opened_at: now,
        }
    }

    /// Updates the last_opened_at timestamp.
    pub fn touch(&mut self) {
        self.last_opened_at = Timestamp::now();
    }

    /// Checks if this metadata is compatible with the current schema.
    pub fn is_compatible(&self) -> bool {
        self.schema_version == SCHEMA_VERSION
    }
}

impl Default for DatabaseMetadata {
    fn default() -> Self {
        Self::new()
    }
}
