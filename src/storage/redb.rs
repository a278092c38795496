//! redb storage engine implementation.
//!
//! This module provides the primary storage backend for CatalogDB using
//! [redb](https://docs.rs/redb), a pure Rust embedded key-value store.
//!
//! # Features
//!
//! - ACID transactions with MVCC
//! - Single-writer, multiple-reader concurrency
//! - Automatic crash recovery
//!
//! # File Layout
//!
//! When you open a database at `./catalog.db`, redb creates:
//! - `./catalog.db` - Main database file
//! - `./catalog.db.lock` - Lock file for writer coordination (may not be visible)

use std::path::{Path, PathBuf};

use ::redb::{
    Database, Durability, ReadableMultimapTable, ReadableTable, ReadableTableMetadata,
    WriteTransaction,
};
use tracing::{debug, info, instrument, warn};

use super::schema::{
    DatabaseMetadata, METADATA_TABLE, NAMES_TABLE, RECORDS_TABLE, RECORD_SEQUENCE,
    RULES_BY_PURPOSE_TABLE, RULES_TABLE, RULE_SEQUENCE, SCHEMA_VERSION, SEQUENCES_TABLE,
};
use super::{BatchInsert, InsertFailure, StorageEngine};
use crate::config::{Config, SyncMode};
use crate::error::{CatalogError, Result, StorageError};
use crate::names::canonical_key;
use crate::record::{NewRecord, Record};
use crate::rules::{NewValidationRule, ValidationRule};
use crate::search::{rank_by_counter, SearchFilter};
use crate::types::{CounterDelta, CounterField, RecordId, RuleId, RulePurpose};

/// Metadata key in the metadata table.
const METADATA_KEY: &str = "db_metadata";

/// redb storage engine wrapper.
///
/// This struct holds the redb database handle and cached metadata.
/// It implements [`StorageEngine`] for use with [`Catalog`](crate::Catalog).
///
/// # Thread Safety
///
/// `RedbStorage` is `Send + Sync`. redb handles internal synchronization
/// using MVCC for readers and exclusive locking for writers.
#[derive(Debug)]
pub struct RedbStorage {
    /// The redb database handle.
    db: Database,

    /// Cached database metadata.
    metadata: DatabaseMetadata,

    /// Path to the database file.
    path: PathBuf,

    /// Durability applied to every write transaction.
    sync_mode: SyncMode,
}

impl RedbStorage {
    /// Opens or creates a database at the given path.
    ///
    /// If the database doesn't exist, it will be created and initialized.
    /// If it exists, its schema version is checked against
    /// [`SCHEMA_VERSION`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database file is corrupted
    /// - The database is locked by another process
    /// - Schema version doesn't match
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use catalogdb::{Config, storage::RedbStorage};
    ///
    /// let storage = RedbStorage::open("./catalog.db", &Config::default())?;
    /// # Ok::<(), catalogdb::CatalogError>(())
    /// ```
    #[instrument(skip(config), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let path = path.as_ref();
        let db_exists = path.exists();

        debug!(db_exists = db_exists, "Opening storage engine");

        let db = Self::create_database(path)?;

        if db_exists {
            Self::open_existing(db, path.to_path_buf(), config)
        } else {
            Self::initialize_new(db, path.to_path_buf(), config)
        }
    }

    /// Creates the redb database handle.
    fn create_database(path: &Path) -> Result<Database> {
        let db = Database::builder().create(path).map_err(|e| match e {
            redb::DatabaseError::DatabaseAlreadyOpen => StorageError::DatabaseLocked,
            other => StorageError::Redb(other.to_string()),
        })?;

        debug!("Database file opened successfully");
        Ok(db)
    }

    /// Initializes a new database with tables and metadata.
    #[instrument(skip(db, config), fields(path = %path.display()))]
    fn initialize_new(db: Database, path: PathBuf, config: &Config) -> Result<Self> {
        info!("Initializing new database");

        let metadata = DatabaseMetadata::new();

        // Create all tables and write metadata in a single transaction
        let write_txn = db.begin_write().map_err(StorageError::from)?;
        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata)?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;

            let _ = write_txn.open_table(RECORDS_TABLE)?;
            let _ = write_txn.open_table(NAMES_TABLE)?;
            let _ = write_txn.open_table(RULES_TABLE)?;
            let _ = write_txn.open_multimap_table(RULES_BY_PURPOSE_TABLE)?;
            let _ = write_txn.open_table(SEQUENCES_TABLE)?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        info!(schema_version = SCHEMA_VERSION, "Database initialized");

        Ok(Self {
            db,
            metadata,
            path,
            sync_mode: config.sync_mode,
        })
    }

    /// Opens and validates an existing database.
    #[instrument(skip(db, config), fields(path = %path.display()))]
    fn open_existing(db: Database, path: PathBuf, config: &Config) -> Result<Self> {
        info!("Opening existing database");

        let read_txn = db.begin_read().map_err(StorageError::from)?;

        let metadata = {
            let meta_table = read_txn.open_table(METADATA_TABLE).map_err(|e| {
                StorageError::corrupted(format!("Cannot open metadata table: {}", e))
            })?;

            let metadata_bytes = meta_table
                .get(METADATA_KEY)
                .map_err(StorageError::from)?
                .ok_or_else(|| StorageError::corrupted("Missing database metadata"))?;

            bincode::deserialize::<DatabaseMetadata>(metadata_bytes.value())
                .map_err(|e| StorageError::corrupted(format!("Invalid metadata format: {}", e)))?
        };

        drop(read_txn);

        if !metadata.is_compatible() {
            warn!(
                expected = SCHEMA_VERSION,
                found = metadata.schema_version,
                "Schema version mismatch"
            );
            return Err(CatalogError::Storage(StorageError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found: metadata.schema_version,
            }));
        }

        let mut metadata = metadata;
        metadata.touch();

        let write_txn = db.begin_write().map_err(StorageError::from)?;
        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata)?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        info!(
            schema_version = metadata.schema_version,
            "Database opened successfully"
        );

        Ok(Self {
            db,
            metadata,
            path,
            sync_mode: config.sync_mode,
        })
    }

    /// Begins a write transaction with the configured durability.
    fn begin_write(&self) -> Result<WriteTransaction> {
        let mut txn = self.db.begin_write().map_err(StorageError::from)?;
        match self.sync_mode {
            SyncMode::Normal => txn.set_durability(Durability::Immediate),
            SyncMode::Fast => txn.set_durability(Durability::Eventual),
            SyncMode::Paranoid => {
                txn.set_durability(Durability::Immediate);
                txn.set_two_phase_commit(true);
            }
        }
        Ok(txn)
    }

    /// Inserts one record in its own transaction.
    ///
    /// Returns `None` if the name is already taken; the transaction is
    /// aborted and nothing is written.
    fn insert_one(&self, new: &NewRecord) -> Result<Option<Record>> {
        let key = canonical_key(&new.name);
        let write_txn = self.begin_write()?;

        let record = {
            let mut names = write_txn.open_table(NAMES_TABLE)?;
            if names.get(key.as_str())?.is_some() {
                None
            } else {
                let id = next_id(&write_txn, RECORD_SEQUENCE)?;
                let record = new.clone().into_record(RecordId(id));
                let bytes = bincode::serialize(&record)?;

                let mut records = write_txn.open_table(RECORDS_TABLE)?;
                records.insert(id, bytes.as_slice())?;
                names.insert(key.as_str(), id)?;
                Some(record)
            }
        };

        match record {
            Some(record) => {
                write_txn.commit().map_err(StorageError::from)?;
                debug!(id = %record.id, name = %record.name, "Record inserted");
                Ok(Some(record))
            }
            None => {
                write_txn.abort().map_err(StorageError::from)?;
                Ok(None)
            }
        }
    }

    /// Applies `update` to a stored record inside one write transaction.
    fn modify_record<F>(&self, id: RecordId, update: F) -> Result<Option<Record>>
    where
        F: FnOnce(&mut Record),
    {
        let write_txn = self.begin_write()?;

        let record = {
            let mut table = write_txn.open_table(RECORDS_TABLE)?;
            let current = table.get(id.0)?.map(|v| v.value().to_vec());
            match current {
                Some(bytes) => {
                    let mut record: Record = bincode::deserialize(&bytes)?;
                    update(&mut record);
                    let bytes = bincode::serialize(&record)?;
                    table.insert(id.0, bytes.as_slice())?;
                    Some(record)
                }
                None => None,
            }
        };

        if record.is_some() {
            write_txn.commit().map_err(StorageError::from)?;
        } else {
            write_txn.abort().map_err(StorageError::from)?;
        }
        Ok(record)
    }
}

/// Advances an id sequence and returns the new value. Ids start at 1.
fn next_id(txn: &WriteTransaction, sequence: &'static str) -> Result<u64> {
    let mut table = txn.open_table(SEQUENCES_TABLE)?;
    let current = table.get(sequence)?.map(|v| v.value()).unwrap_or(0);
    let next = current
        .checked_add(1)
        .ok_or(StorageError::IdExhausted(sequence))?;
    table.insert(sequence, next)?;
    Ok(next)
}

fn decode_record(bytes: &[u8]) -> Result<Record> {
    Ok(bincode::deserialize(bytes)?)
}

fn decode_rule(bytes: &[u8]) -> Result<ValidationRule> {
    Ok(bincode::deserialize(bytes)?)
}

impl StorageEngine for RedbStorage {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    fn metadata(&self) -> &DatabaseMetadata {
        &self.metadata
    }

    #[instrument(skip(self))]
    fn close(self: Box<Self>) -> Result<()> {
        info!("Closing storage engine");

        // redb flushes on drop, which is infallible.
        drop(self.db);

        info!("Storage engine closed");
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    // =========================================================================
    // Validation Rules
    // =========================================================================

    fn list_rules(&self, purpose: Option<RulePurpose>) -> Result<Vec<ValidationRule>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(RULES_TABLE)?;

        let mut rules = Vec::new();
        match purpose {
            Some(purpose) => {
                let index = read_txn.open_multimap_table(RULES_BY_PURPOSE_TABLE)?;
                for entry in index.get(purpose.tag())? {
                    let id = entry.map_err(StorageError::from)?.value();
                    let bytes = table.get(id)?.ok_or_else(|| {
                        StorageError::corrupted(format!("rule index points at missing rule {id}"))
                    })?;
                    rules.push(decode_rule(bytes.value())?);
                }
            }
            None => {
                for entry in table.iter()? {
                    let (_, value) = entry.map_err(StorageError::from)?;
                    rules.push(decode_rule(value.value())?);
                }
            }
        }

        Ok(rules)
    }

    #[instrument(skip(self, rule), fields(purpose = %rule.purpose))]
    fn save_rule(&self, rule: &NewValidationRule) -> Result<ValidationRule> {
        let write_txn = self.begin_write()?;
        let stored = {
            let id = next_id(&write_txn, RULE_SEQUENCE)?;
            let stored = rule.clone().with_id(RuleId(id));
            let bytes = bincode::serialize(&stored)?;

            let mut table = write_txn.open_table(RULES_TABLE)?;
            table.insert(id, bytes.as_slice())?;
            let mut index = write_txn.open_multimap_table(RULES_BY_PURPOSE_TABLE)?;
            index.insert(stored.purpose.tag(), id)?;
            stored
        };
        write_txn.commit().map_err(StorageError::from)?;

        debug!(id = %stored.id, "Rule saved");
        Ok(stored)
    }

    #[instrument(skip(self))]
    fn delete_rule(&self, id: RuleId) -> Result<bool> {
        let write_txn = self.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(RULES_TABLE)?;
            let removed = table.remove(id.0)?.map(|v| v.value().to_vec());
            match removed {
                Some(bytes) => {
                    let rule = decode_rule(&bytes)?;
                    let mut index = write_txn.open_multimap_table(RULES_BY_PURPOSE_TABLE)?;
                    index.remove(rule.purpose.tag(), id.0)?;
                    true
                }
                None => false,
            }
        };
        write_txn.commit().map_err(StorageError::from)?;

        debug!(existed, "Rule delete");
        Ok(existed)
    }

    // =========================================================================
    // Record Reads
    // =========================================================================

    fn get_record(&self, id: RecordId) -> Result<Option<Record>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(RECORDS_TABLE)?;

        match table.get(id.0)? {
            Some(value) => Ok(Some(decode_record(value.value())?)),
            None => Ok(None),
        }
    }

    fn count_records(&self) -> Result<u64> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(RECORDS_TABLE)?;
        Ok(table.len()?)
    }

    fn fetch_by_name_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<Record>> {
        let key = canonical_key(prefix);
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let names = read_txn.open_table(NAMES_TABLE)?;
        let records = read_txn.open_table(RECORDS_TABLE)?;

        let mut found = Vec::new();
        if limit == 0 {
            return Ok(found);
        }

        for entry in names.range(key.as_str()..)? {
            let (name, id) = entry.map_err(StorageError::from)?;
            if !name.value().starts_with(key.as_str()) {
                break;
            }
            let id = id.value();
            let bytes = records.get(id)?.ok_or_else(|| {
                StorageError::corrupted(format!("name index points at missing record {id}"))
            })?;
            found.push(decode_record(bytes.value())?);
            if found.len() >= limit {
                break;
            }
        }

        Ok(found)
    }

    fn fetch_by_filter(&self, filter: &SearchFilter) -> Result<Vec<Record>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(RECORDS_TABLE)?;
        let matcher = filter.matcher();

        let mut found = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry.map_err(StorageError::from)?;
            let record = decode_record(value.value())?;
            if matcher.matches(&record) {
                found.push(record);
            }
        }

        Ok(found)
    }

    fn top_by_counter(&self, field: CounterField, limit: usize) -> Result<Vec<Record>> {
        let records = self.fetch_by_filter(&SearchFilter::default())?;
        Ok(rank_by_counter(records, field, limit))
    }

    // =========================================================================
    // Record Writes
    // =========================================================================

    #[instrument(skip(self, records), fields(count = records.len()))]
    fn insert_records(&self, records: &[NewRecord]) -> Result<BatchInsert> {
        let mut outcome = BatchInsert::default();

        for (index, new) in records.iter().enumerate() {
            match self.insert_one(new) {
                Ok(Some(record)) => outcome.inserted.push(record),
                Ok(None) => {
                    warn!(index, name = %new.name, "Duplicate name rejected");
                    outcome.failed.push(InsertFailure::duplicate(index, &new.name));
                }
                Err(e) => {
                    warn!(index, name = %new.name, error = %e, "Record insert failed");
                    outcome
                        .failed
                        .push(InsertFailure::storage(index, &new.name, e.to_string()));
                }
            }
        }

        Ok(outcome)
    }

    #[instrument(skip(self, description))]
    fn update_description(&self, id: RecordId, description: &str) -> Result<Option<Record>> {
        let updated = self.modify_record(id, |record| {
            record.description = Some(description.to_string());
        })?;
        debug!(found = updated.is_some(), "Description update");
        Ok(updated)
    }

    #[instrument(skip(self))]
    fn adjust_counter(
        &self,
        id: RecordId,
        field: CounterField,
        delta: CounterDelta,
    ) -> Result<Option<Record>> {
        let updated = self.modify_record(id, |record| {
            let counter = record.counter_mut(field);
            *counter = delta.apply(*counter);
        })?;
        debug!(found = updated.is_some(), "Counter adjusted");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gender;
    use tempfile::tempdir;

    fn open_temp() -> (RedbStorage, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let storage = RedbStorage::open(dir.path().join("test.db"), &Config::default()).unwrap();
        (storage, dir)
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    // ====================================================================
    // Lifecycle tests
    // ====================================================================

    #[test]
    fn test_open_creates_new_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        assert!(!path.exists());
        let storage = RedbStorage::open(&path, &Config::default()).unwrap();
        assert!(path.exists());
        assert_eq!(storage.metadata().schema_version, SCHEMA_VERSION);
        assert_eq!(storage.path(), Some(path.as_path()));
    }

    #[test]
    fn test_reopen_preserves_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let created_at = {
            let storage = RedbStorage::open(&path, &Config::default()).unwrap();
            storage.insert_records(&[NewRecord::named("Tom")]).unwrap();
            storage.metadata().created_at
        };

        let storage = RedbStorage::open(&path, &Config::default()).unwrap();
        assert_eq!(storage.metadata().created_at, created_at);
        assert_eq!(storage.count_records().unwrap(), 1);
    }

    #[test]
    fn test_schema_version_mismatch_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        drop(RedbStorage::open(&path, &Config::default()).unwrap());

        // Overwrite the stored metadata with a future schema version
        {
            let db = Database::create(&path).unwrap();
            let txn = db.begin_write().unwrap();
            {
                let mut table = txn.open_table(METADATA_TABLE).unwrap();
                let meta = DatabaseMetadata {
                    schema_version: SCHEMA_VERSION + 1,
                    ..DatabaseMetadata::new()
                };
                let bytes = bincode::serialize(&meta).unwrap();
                table.insert(METADATA_KEY, bytes.as_slice()).unwrap();
            }
            txn.commit().unwrap();
        }

        let err = RedbStorage::open(&path, &Config::default()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Storage(StorageError::SchemaVersionMismatch { .. })
        ));
    }

    #[test]
    fn test_sync_modes_open_and_write() {
        for sync_mode in [SyncMode::Normal, SyncMode::Fast, SyncMode::Paranoid] {
            let dir = tempdir().unwrap();
            let config = Config {
                sync_mode,
                ..Default::default()
            };
            let storage = RedbStorage::open(dir.path().join("test.db"), &config).unwrap();
            let batch = storage.insert_records(&[NewRecord::named("Tom")]).unwrap();
            assert!(batch.is_complete());
        }
    }

    // ====================================================================
    // Record tests
    // ====================================================================

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let (storage, _dir) = open_temp();
        let batch = storage
            .insert_records(&[NewRecord::named("Tom"), NewRecord::named("Jerry")])
            .unwrap();

        assert!(batch.is_complete());
        assert_eq!(batch.inserted[0].id, RecordId(1));
        assert_eq!(batch.inserted[1].id, RecordId(2));
        assert_eq!(batch.inserted[0].likes, 0);

        let fetched = storage.get_record(RecordId(2)).unwrap().unwrap();
        assert_eq!(fetched, batch.inserted[1]);
        assert!(storage.get_record(RecordId(99)).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_is_case_insensitive() {
        let (storage, _dir) = open_temp();
        storage.insert_records(&[NewRecord::named("Tom")]).unwrap();

        let batch = storage
            .insert_records(&[NewRecord::named("TOM"), NewRecord::named("Jerry")])
            .unwrap();

        assert_eq!(names(&batch.inserted), vec!["Jerry"]);
        assert_eq!(batch.failed.len(), 1);
        assert_eq!(batch.failed[0].index, 0);
        assert!(batch.only_duplicates());
        assert_eq!(storage.count_records().unwrap(), 2);
    }

    #[test]
    fn test_prefix_scan_is_ordered_and_limited() {
        let (storage, _dir) = open_temp();
        storage
            .insert_records(&[
                NewRecord::named("Anna"),
                NewRecord::named("Bob"),
                NewRecord::named("Andy"),
                NewRecord::named("Annie"),
            ])
            .unwrap();

        let rows = storage.fetch_by_name_prefix("an", 3).unwrap();
        assert_eq!(names(&rows), vec!["Andy", "Anna", "Annie"]);

        let rows = storage.fetch_by_name_prefix("AN", 2).unwrap();
        assert_eq!(names(&rows), vec!["Andy", "Anna"]);

        assert!(storage.fetch_by_name_prefix("zz", 5).unwrap().is_empty());
        assert!(storage.fetch_by_name_prefix("an", 0).unwrap().is_empty());
    }

    #[test]
    fn test_fetch_by_filter() {
        let (storage, _dir) = open_temp();
        storage
            .insert_records(&[
                NewRecord::named("Murka").with_gender(Gender::Female),
                NewRecord::named("Tom").with_gender(Gender::Male),
                NewRecord::named("Murzik").with_gender(Gender::Male),
            ])
            .unwrap();

        let rows = storage
            .fetch_by_filter(&SearchFilter::name_like("mur").with_genders(vec![Gender::Male]))
            .unwrap();
        assert_eq!(names(&rows), vec!["Murzik"]);

        let rows = storage.fetch_by_filter(&SearchFilter::default()).unwrap();
        assert_eq!(names(&rows), vec!["Murka", "Tom", "Murzik"]);
    }

    #[test]
    fn test_update_description() {
        let (storage, _dir) = open_temp();
        storage.insert_records(&[NewRecord::named("Tom")]).unwrap();

        let updated = storage
            .update_description(RecordId(1), "grey and sly")
            .unwrap()
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("grey and sly"));

        let fetched = storage.get_record(RecordId(1)).unwrap().unwrap();
        assert_eq!(fetched.description.as_deref(), Some("grey and sly"));

        assert!(storage.update_description(RecordId(5), "x").unwrap().is_none());
    }

    #[test]
    fn test_adjust_counter_saturates() {
        let (storage, _dir) = open_temp();
        storage.insert_records(&[NewRecord::named("Tom")]).unwrap();

        let id = RecordId(1);
        storage
            .adjust_counter(id, CounterField::Likes, CounterDelta::Increment)
            .unwrap();
        let r = storage
            .adjust_counter(id, CounterField::Likes, CounterDelta::Increment)
            .unwrap()
            .unwrap();
        assert_eq!(r.likes, 2);
        assert_eq!(r.dislikes, 0);

        let r = storage
            .adjust_counter(id, CounterField::Dislikes, CounterDelta::Decrement)
            .unwrap()
            .unwrap();
        assert_eq!(r.dislikes, 0);

        assert!(storage
            .adjust_counter(RecordId(9), CounterField::Likes, CounterDelta::Increment)
            .unwrap()
            .is_none());
    }

    // ====================================================================
    // Rule tests
    // ====================================================================

    #[test]
    fn test_rules_by_purpose_in_id_order() {
        let (storage, _dir) = open_temp();
        let a = storage
            .save_rule(&NewValidationRule::new(RulePurpose::Add, "first", "."))
            .unwrap();
        let s = storage
            .save_rule(&NewValidationRule::new(RulePurpose::Search, "search", "."))
            .unwrap();
        let b = storage
            .save_rule(&NewValidationRule::new(RulePurpose::Add, "second", "."))
            .unwrap();

        assert!(a.id < s.id && s.id < b.id);

        let add = storage.list_rules(Some(RulePurpose::Add)).unwrap();
        assert_eq!(add, vec![a.clone(), b.clone()]);
        assert_eq!(storage.list_rules(None).unwrap().len(), 3);

        assert!(storage.delete_rule(a.id).unwrap());
        assert!(!storage.delete_rule(a.id).unwrap());
        assert_eq!(storage.list_rules(Some(RulePurpose::Add)).unwrap(), vec![b]);
    }

    #[test]
    fn test_rule_ids_are_not_reused() {
        let (storage, _dir) = open_temp();
        let first = storage
            .save_rule(&NewValidationRule::new(RulePurpose::Add, "r", "."))
            .unwrap();
        storage.delete_rule(first.id).unwrap();
        let second = storage
            .save_rule(&NewValidationRule::new(RulePurpose::Add, "r", "."))
            .unwrap();
        assert!(second.id > first.id);
    }
}
