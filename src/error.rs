//! Error types for CatalogDB.
//!
//! CatalogDB uses a hierarchical error system:
//! - `CatalogError` is the top-level error returned by all public APIs
//! - Specific error types (`StorageError`, `ValidationError`, `NotFoundError`)
//!   provide detail
//!
//! The variants map onto the outcomes a caller must tell apart: a configured
//! rule rejected the input, the input was malformed, the record is absent,
//! the store refused a duplicate, or the store itself failed.
//!
//! # Error Handling Pattern
//! ```rust,ignore
//! use catalogdb::{Catalog, Config, Result};
//!
//! fn example() -> Result<()> {
//!     let catalog = Catalog::open("./catalog.db", Config::default())?;
//!     let page = catalog.search_by_prefix("an", Some(5))?;
//!     catalog.close()?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::record::Record;
use crate::storage::InsertFailure;
use crate::types::{RecordId, RuleId};

/// Result type alias for CatalogDB operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Top-level error enum for all CatalogDB operations.
///
/// This is the only error type returned by public APIs.
/// Use pattern matching to handle specific error cases.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Storage layer error (I/O, corruption, transactions).
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The candidate failed a configured validation rule.
    ///
    /// `reason` is the rule's description, surfaced verbatim.
    #[error("{reason}")]
    ValidationFailed {
        /// Description of the first violated rule.
        reason: String,
    },

    /// Structurally malformed input, rejected before touching the store.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Requested entity not found.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// The store rejected a write because the name is already taken.
    #[error("Record already exists: {name}")]
    Duplicate {
        /// The conflicting name.
        name: String,
    },

    /// Some records of a batch were inserted, others were not.
    #[error("Batch partially inserted: {} stored, {} failed", .inserted.len(), .failed.len())]
    PartialInsert {
        /// Records that were stored.
        inserted: Vec<Record>,
        /// Records that were rejected, with the reason.
        failed: Vec<InsertFailure>,
    },

    /// A stored validation rule carries a pattern that does not compile.
    #[error("Invalid validation rule {id}: {reason}")]
    InvalidRule {
        /// Offending rule.
        id: RuleId,
        /// Compiler message.
        reason: String,
    },

    /// The store handed back a record that breaks the record contract.
    #[error("Invalid record {id}: {reason}")]
    InvalidRecord {
        /// Offending record.
        id: RecordId,
        /// What is wrong with it.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of what's wrong with the configuration.
        reason: String,
    },

    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Creates a configuration error with the given reason.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Creates a rule-violation error carrying the rule description.
    pub fn validation_failed(reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            reason: reason.into(),
        }
    }

    /// Creates a duplicate-name error.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::Duplicate { name: name.into() }
    }

    /// Creates an invalid rule error.
    pub fn invalid_rule(id: RuleId, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            id,
            reason: reason.into(),
        }
    }

    /// Creates an invalid record error.
    pub fn invalid_record(id: RecordId, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            id,
            reason: reason.into(),
        }
    }

    /// Returns true if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if a configured validation rule rejected the input.
    pub fn is_validation_failed(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    /// Returns true if the input was structurally malformed.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Returns true if the store rejected a duplicate name.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Returns true if this is a storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true if this error is the service's fault rather than the caller's.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::InvalidRule { .. }
                | Self::InvalidRecord { .. }
                | Self::Config { .. }
                | Self::Io(_)
        )
    }
}

/// Storage-related errors.
///
/// These errors indicate problems with the underlying storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database file or data is corrupted.
    #[error("Database corrupted: {0}")]
    Corrupted(String),

    /// Database is locked by another process.
    #[error("Database is locked by another writer")]
    DatabaseLocked,

    /// Transaction failed (commit, rollback, etc.).
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error from the redb storage engine.
    #[error("Storage engine error: {0}")]
    Redb(String),

    /// Database schema version doesn't match expected version.
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch {
        /// Expected schema version.
        expected: u32,
        /// Actual schema version found in database.
        found: u32,
    },

    /// An id counter ran out of values.
    #[error("Id space exhausted for {0}")]
    IdExhausted(&'static str),
}

impl StorageError {
    /// Creates a corruption error with the given message.
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }
}

// Conversions from redb error types
impl From<redb::Error> for StorageError {
    fn from(err: redb::Error) -> Self {
        StorageError::Redb(err.to_string())
    }
}

impl From<redb::DatabaseError> for StorageError {
    fn from(err: redb::DatabaseError) -> Self {
        StorageError::Redb(err.to_string())
    }
}

impl From<redb::TransactionError> for StorageError {
    fn from(err: redb::TransactionError) -> Self {
        StorageError::Transaction(err.to_string())
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(err: redb::CommitError) -> Self {
        StorageError::Transaction(format!("Commit failed: {}", err))
    }
}

impl From<redb::TableError> for StorageError {
    fn from(err: redb::TableError) -> Self {
        StorageError::Redb(format!("Table error: {}", err))
    }
}

impl From<redb::StorageError> for StorageError {
    fn from(err: redb::StorageError) -> Self {
        StorageError::Redb(format!("Storage error: {}", err))
    }
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

// Also allow direct conversion to CatalogError for convenience
impl From<redb::Error> for CatalogError {
    fn from(err: redb::Error) -> Self {
        CatalogError::Storage(StorageError::from(err))
    }
}

impl From<redb::DatabaseError> for CatalogError {
    fn from(err: redb::DatabaseError) -> Self {
        CatalogError::Storage(StorageError::from(err))
    }
}

impl From<redb::TransactionError> for CatalogError {
    fn from(err: redb::TransactionError) -> Self {
        CatalogError::Storage(StorageError::from(err))
    }
}

impl From<redb::CommitError> for CatalogError {
    fn from(err: redb::CommitError) -> Self {
        CatalogError::Storage(StorageError::from(err))
    }
}

impl From<redb::TableError> for CatalogError {
    fn from(err: redb::TableError) -> Self {
        CatalogError::Storage(StorageError::from(err))
    }
}

impl From<redb::StorageError> for CatalogError {
    fn from(err: redb::StorageError) -> Self {
        CatalogError::Storage(StorageError::from(err))
    }
}

impl From<bincode::Error> for CatalogError {
    fn from(err: bincode::Error) -> Self {
        CatalogError::Storage(StorageError::from(err))
    }
}

/// Validation errors for structurally malformed input.
///
/// These errors indicate problems with data provided by the caller that are
/// caught before any validation rule runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A field has an invalid value.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the invalid field.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// A text field exceeds its maximum length.
    #[error("Field '{field}' too long: {len} chars (max: {max})")]
    TooLong {
        /// Name of the field.
        field: String,
        /// Actual length in characters.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// A required field is missing or empty.
    #[error("Required field missing: {field}")]
    RequiredField {
        /// Name of the missing field.
        field: String,
    },

    /// Too many items in a collection field.
    #[error("Too many items in '{field}': {count} (max: {max})")]
    TooManyItems {
        /// Name of the field.
        field: String,
        /// Actual count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
}

impl ValidationError {
    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a too-long error.
    pub fn too_long(field: impl Into<String>, len: usize, max: usize) -> Self {
        Self::TooLong {
            field: field.into(),
            len,
            max,
        }
    }

    /// Creates a required field error.
    pub fn required_field(field: impl Into<String>) -> Self {
        Self::RequiredField {
            field: field.into(),
        }
    }

    /// Creates a too many items error.
    pub fn too_many_items(field: impl Into<String>, count: usize, max: usize) -> Self {
        Self::TooManyItems {
            field: field.into(),
            count,
            max,
        }
    }
}

/// Not found errors for specific entity types.
#[derive(Debug, Error)]
pub enum NotFoundError {
    /// Record with given ID not found.
    #[error("Record not found: {0}")]
    Record(String),

    /// No record name matches the given prefix.
    #[error("No records match prefix: {0}")]
    Prefix(String),

    /// Validation rule with given ID not found.
    #[error("Validation rule not found: {0}")]
    Rule(String),
}

impl NotFoundError {
    /// Creates a record not found error.
    pub fn record(id: impl ToString) -> Self {
        Self::Record(id.to_string())
    }

    /// Creates a prefix not found error.
    pub fn prefix(prefix: impl ToString) -> Self {
        Self::Prefix(prefix.to_string())
    }

    /// Creates a rule not found error.
    pub fn rule(id: impl ToString) -> Self {
        Self::Rule(id.to_string())
    }
}
