//! Storage layer abstractions for CatalogDB.
//!
//! This module provides a trait-based abstraction over the record store,
//! allowing different backends to be used (redb on disk, memory for tests
//! and ephemeral catalogs).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Catalog                                 │
//! │                         │                                    │
//! │                         ▼                                    │
//! │              ┌─────────────────────┐                        │
//! │              │   StorageEngine     │  ← Trait               │
//! │              └─────────────────────┘                        │
//! │                    ▲         ▲                              │
//! │                    │         │                              │
//! │         ┌─────────┴─┐   ┌───┴───────────┐                  │
//! │         │RedbStorage│   │ MemoryStorage │                  │
//! │         └───────────┘   └───────────────┘                  │
//! │           (prod)          (test, ephemeral)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod memory;
pub mod redb;
pub mod schema;

pub use self::memory::MemoryStorage;
pub use self::redb::RedbStorage;
pub use schema::{DatabaseMetadata, SCHEMA_VERSION};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::record::{NewRecord, Record};
use crate::rules::{NewValidationRule, ValidationRule};
use crate::search::SearchFilter;
use crate::types::{CounterDelta, CounterField, RecordId, RuleId, RulePurpose};

/// Storage engine trait for CatalogDB.
///
/// This trait defines the contract that any record store must implement.
/// The primary implementation is [`RedbStorage`]; [`MemoryStorage`] keeps
/// everything in process memory.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow the catalog to be shared
/// across threads. The engine handles internal synchronization and must
/// serialize conflicting writes: a counter adjustment is a single atomic
/// read-modify-write.
///
/// # Example
///
/// ```rust
/// use catalogdb::storage::{MemoryStorage, StorageEngine};
/// use catalogdb::NewRecord;
///
/// let storage = MemoryStorage::new();
/// let batch = storage.insert_records(&[NewRecord::named("Tom")]).unwrap();
/// assert_eq!(batch.inserted.len(), 1);
/// ```
pub trait StorageEngine: Send + Sync {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Returns the database metadata.
    fn metadata(&self) -> &DatabaseMetadata;

    /// Closes the storage engine, flushing any pending writes.
    ///
    /// This method consumes the storage engine. After calling `close()`,
    /// the engine cannot be used.
    fn close(self: Box<Self>) -> Result<()>;

    /// Returns the path to the database file, if applicable.
    ///
    /// In-memory implementations have no path.
    fn path(&self) -> Option<&Path>;

    // =========================================================================
    // Validation Rules
    // =========================================================================

    /// Lists validation rules in ascending id order.
    ///
    /// `None` lists the rules of every purpose.
    fn list_rules(&self, purpose: Option<RulePurpose>) -> Result<Vec<ValidationRule>>;

    /// Stores a new rule under a freshly assigned id.
    ///
    /// Ids are assigned in increasing order and never reused, so a new rule
    /// always evaluates after the existing ones.
    fn save_rule(&self, rule: &NewValidationRule) -> Result<ValidationRule>;

    /// Deletes a rule by id.
    ///
    /// Returns `true` if the rule existed and was deleted.
    fn delete_rule(&self, id: RuleId) -> Result<bool>;

    // =========================================================================
    // Record Reads
    // =========================================================================

    /// Retrieves a record by id.
    ///
    /// Returns `None` if no record with the given id exists.
    fn get_record(&self, id: RecordId) -> Result<Option<Record>>;

    /// Returns the number of stored records.
    fn count_records(&self) -> Result<u64>;

    /// Returns up to `limit` records whose name starts with `prefix`,
    /// ignoring case, ordered case-insensitively by name.
    fn fetch_by_name_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<Record>>;

    /// Returns every record passing `filter`, in ascending id order.
    fn fetch_by_filter(&self, filter: &SearchFilter) -> Result<Vec<Record>>;

    /// Returns the top `limit` records by a counter.
    ///
    /// See [`rank_by_counter`](crate::search::rank_by_counter) for ordering.
    fn top_by_counter(&self, field: CounterField, limit: usize) -> Result<Vec<Record>>;

    // =========================================================================
    // Record Writes
    // =========================================================================

    /// Inserts records one by one.
    ///
    /// The batch is not transactional: each record is committed on its own
    /// and a failure does not undo earlier inserts. Per-record failures are
    /// reported in [`BatchInsert::failed`]; the `Err` variant is reserved
    /// for failures that stop the whole batch.
    ///
    /// Names must already be normalized. A name that equals a stored name
    /// ignoring case fails with [`InsertFailureKind::Duplicate`].
    fn insert_records(&self, records: &[NewRecord]) -> Result<BatchInsert>;

    /// Replaces a record's description.
    ///
    /// Returns the updated record, or `None` if it does not exist.
    fn update_description(&self, id: RecordId, description: &str) -> Result<Option<Record>>;

    /// Adds `delta` to one counter of a record, atomically.
    ///
    /// Returns the updated record, or `None` if it does not exist.
    fn adjust_counter(
        &self,
        id: RecordId,
        field: CounterField,
        delta: CounterDelta,
    ) -> Result<Option<Record>>;
}

// ============================================================================
// Batch insert outcome
// ============================================================================

/// Outcome of [`StorageEngine::insert_records`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInsert {
    /// Stored records, in batch order.
    #[serde(rename = "cats")]
    pub inserted: Vec<Record>,

    /// Records that were not stored.
    pub failed: Vec<InsertFailure>,
}

impl BatchInsert {
    /// Returns true when every record of the batch was stored.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Returns true when the batch failed only on name collisions.
    pub fn only_duplicates(&self) -> bool {
        self.failed
            .iter()
            .all(|f| f.kind == InsertFailureKind::Duplicate)
    }
}

/// A record of an add batch that was not stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertFailure {
    /// Position in the submitted batch.
    pub index: usize,

    /// The (normalized) name that failed.
    pub name: String,

    /// Failure category.
    pub kind: InsertFailureKind,

    /// Human-readable reason.
    pub reason: String,
}

impl InsertFailure {
    /// Creates a duplicate-name failure.
    pub fn duplicate(index: usize, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            reason: format!("{name} already exists"),
            index,
            name,
            kind: InsertFailureKind::Duplicate,
        }
    }

    /// Creates a store failure.
    pub fn storage(index: usize, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            kind: InsertFailureKind::Storage,
            reason: reason.into(),
        }
    }
}

/// Why a record was not stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertFailureKind {
    /// The name collides with a stored name.
    Duplicate,
    /// Any other store failure.
    Storage,
}

/// Opens a storage engine at the given path.
///
/// This is a convenience function that creates a [`RedbStorage`] instance.
/// For more control, use `RedbStorage::open()` directly.
///
/// # Errors
///
/// Returns an error if:
/// - The database file is corrupted
/// - The database is locked by another process
/// - Schema version doesn't match
pub fn open_storage(path: impl AsRef<Path>, config: &Config) -> Result<Box<dyn StorageEngine>> {
    let storage = RedbStorage::open(path, config)?;
    Ok(Box::new(storage))
}
