//! Catalog facade and lifecycle operations.
//!
//! The [`Catalog`] struct is the primary interface to the record catalog.
//! It owns the store and the compiled-rule cache and implements every
//! exposed operation:
//!
//! - search by params and by name prefix
//! - batch add, description update, lookup, listing
//! - validation rule listing and management
//! - likes/dislikes and their ratings
//!
//! # Quick Start
//!
//! ```rust
//! use catalogdb::{Catalog, Config, NewRecord};
//!
//! let catalog = Catalog::in_memory(Config::default())?;
//! catalog.seed_default_rules()?;
//!
//! catalog.add_records(vec![NewRecord::named("murka"), NewRecord::named("tom")])?;
//!
//! let page = catalog.search_by_prefix("mu", None)?;
//! assert_eq!(page.records[0].name, "Murka");
//! # Ok::<(), catalogdb::CatalogError>(())
//! ```
//!
//! # Thread Safety
//!
//! `Catalog` is `Send + Sync` and can be shared across threads using `Arc`.
//! All methods take `&self`; the store serializes conflicting writes.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{CatalogError, NotFoundError, Result, ValidationError};
use crate::record::{normalize_batch, validate_description, validate_new_batch, NewRecord, Record};
use crate::rules::{compile_pattern, default_rules, NewValidationRule, RuleCache, ValidationRule};
use crate::search::{group_and_sort, GroupedRecords, PrefixPage, SearchFilter};
use crate::storage::{
    open_storage, BatchInsert, DatabaseMetadata, MemoryStorage, StorageEngine,
};
use crate::types::{CounterDelta, CounterField, Gender, RecordId, RuleId, RulePurpose, SortOrder};

/// The catalog handle.
///
/// Create an instance with [`Catalog::open()`] (redb on disk),
/// [`Catalog::in_memory()`], or [`Catalog::with_storage()`] for a custom
/// store, and close it with [`Catalog::close()`].
pub struct Catalog {
    /// Record store.
    storage: Box<dyn StorageEngine>,

    /// Compiled validation regexes by rule id.
    rule_cache: RuleCache,

    /// Configuration used to open this catalog.
    config: Config,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("config", &self.config)
            .field("path", &self.storage.path())
            .field("cached_rules", &self.rule_cache.len())
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Opens or creates a catalog database at the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration is invalid (see [`Config::validate`])
    /// - Database file is corrupted
    /// - Database is locked by another process
    /// - Schema version doesn't match
    #[instrument(skip(config), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        config.validate().map_err(CatalogError::from)?;

        info!("Opening catalog");
        let storage = open_storage(&path, &config)?;

        info!(sync_mode = ?config.sync_mode, "Catalog opened successfully");
        Self::with_storage(storage, config)
    }

    /// Creates a catalog over an empty in-memory store.
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::with_storage(Box::new(MemoryStorage::new()), config)
    }

    /// Creates a catalog over an already opened store.
    pub fn with_storage(storage: Box<dyn StorageEngine>, config: Config) -> Result<Self> {
        config.validate().map_err(CatalogError::from)?;
        Ok(Self {
            rule_cache: RuleCache::new(config.rule_cache_capacity),
            storage,
            config,
        })
    }

    /// Closes the catalog, flushing all pending writes.
    #[instrument(skip(self))]
    pub fn close(self) -> Result<()> {
        info!("Closing catalog");
        self.storage.close()?;
        info!("Catalog closed successfully");
        Ok(())
    }

    /// Returns a reference to the catalog configuration.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the database metadata.
    #[inline]
    pub fn metadata(&self) -> &DatabaseMetadata {
        self.storage.metadata()
    }

    /// Returns the path to the database file, if any.
    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.storage.path()
    }

    // =========================================================================
    // Validation rules
    // =========================================================================

    /// Lists validation rules in ascending id order, for one purpose or all.
    pub fn validation_rules(&self, purpose: Option<RulePurpose>) -> Result<Vec<ValidationRule>> {
        self.storage.list_rules(purpose)
    }

    /// Validates `candidate` against the current rules of `purpose`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::ValidationFailed`] with the failing rule's description
    /// - [`CatalogError::InvalidRule`] if a stored pattern does not compile
    pub fn validate_name(&self, purpose: RulePurpose, candidate: &str) -> Result<()> {
        let rules = self.storage.list_rules(Some(purpose))?;
        self.rule_cache.validate(candidate, &rules)
    }

    /// Stores a new validation rule after checking that its pattern compiles.
    ///
    /// The rule gets a fresh id, so it runs after every existing rule of the
    /// same purpose.
    #[instrument(skip(self, rule), fields(purpose = %rule.purpose))]
    pub fn add_validation_rule(&self, rule: NewValidationRule) -> Result<ValidationRule> {
        if rule.description.trim().is_empty() {
            return Err(ValidationError::required_field("description").into());
        }
        compile_pattern(&rule.pattern)
            .map_err(|e| ValidationError::invalid_field("regex", e.to_string()))?;

        let stored = self.storage.save_rule(&rule)?;
        info!(id = %stored.id, "Validation rule added");
        Ok(stored)
    }

    /// Removes a validation rule and drops its compiled regex.
    #[instrument(skip(self))]
    pub fn remove_validation_rule(&self, id: RuleId) -> Result<()> {
        if !self.storage.delete_rule(id)? {
            return Err(NotFoundError::rule(id).into());
        }
        self.rule_cache.invalidate(id);
        info!("Validation rule removed");
        Ok(())
    }

    /// Installs [`default_rules`] if the store has no rules at all.
    ///
    /// Returns the number of rules installed.
    #[instrument(skip(self))]
    pub fn seed_default_rules(&self) -> Result<usize> {
        if !self.storage.list_rules(None)?.is_empty() {
            debug!("Rules present, skipping seed");
            return Ok(0);
        }

        let defaults = default_rules();
        for rule in &defaults {
            self.storage.save_rule(rule)?;
        }
        info!(count = defaults.len(), "Default validation rules installed");
        Ok(defaults.len())
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Searches by name fragment and genders, grouped alphabetically.
    ///
    /// `name` is checked against the search rules, then matched as a
    /// case-insensitive substring. An empty `genders` slice means any gender.
    #[instrument(skip(self))]
    pub fn search_by_params(&self, name: &str, genders: &[Gender]) -> Result<GroupedRecords> {
        self.validate_name(RulePurpose::Search, name)?;

        let mut filter = SearchFilter::name_like(name);
        if !genders.is_empty() {
            filter = filter.with_genders(genders.to_vec());
        }

        let records = self.storage.fetch_by_filter(&filter)?;
        debug!(found = records.len(), "Search by params");
        group_and_sort(records, false)
    }

    /// Autocomplete: records whose name starts with `prefix`, ignoring case.
    ///
    /// `limit` defaults to [`Config::default_prefix_limit`] and is clamped to
    /// [`Config::max_prefix_limit`].
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidInput`] if `limit` is zero
    /// - [`CatalogError::ValidationFailed`] if `prefix` breaks a search rule
    /// - [`CatalogError::NotFound`] if nothing matches
    #[instrument(skip(self))]
    pub fn search_by_prefix(&self, prefix: &str, limit: Option<usize>) -> Result<PrefixPage> {
        let limit = self.config.prefix_limit(limit)?;
        self.validate_name(RulePurpose::Search, prefix)?;

        let rows = self
            .storage
            .fetch_by_name_prefix(prefix, PrefixPage::fetch_size(limit))?;
        PrefixPage::from_rows(rows, limit).ok_or_else(|| NotFoundError::prefix(prefix).into())
    }

    /// Lists every record, optionally of one gender, grouped alphabetically.
    #[instrument(skip(self))]
    pub fn get_all(&self, gender: Option<Gender>, order: SortOrder) -> Result<GroupedRecords> {
        let records = self.storage.fetch_by_filter(&SearchFilter::gender(gender))?;
        group_and_sort(records, order.is_reversed())
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Adds a batch of records.
    ///
    /// The batch is validated and normalized as a whole before any write:
    /// a structural problem, a rule violation or an in-batch duplicate
    /// rejects everything. The store then inserts record by record.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidInput`] / [`CatalogError::ValidationFailed`] /
    ///   [`CatalogError::Duplicate`] before any write
    /// - [`CatalogError::Duplicate`] if nothing was stored and every record
    ///   collided with a stored name
    /// - [`CatalogError::PartialInsert`] for any other incomplete batch,
    ///   carrying both the stored records and the failures
    #[instrument(skip(self, batch), fields(count = batch.len()))]
    pub fn add_records(&self, batch: Vec<NewRecord>) -> Result<BatchInsert> {
        validate_new_batch(&batch, &self.config)?;
        let prepared = normalize_batch(batch, &self.config).map_err(|e| {
            warn!(error = %e, "Batch rejected during normalization");
            e
        })?;

        let rules = self.storage.list_rules(Some(RulePurpose::Add))?;
        for record in &prepared {
            self.rule_cache.validate(&record.name, &rules)?;
        }

        let outcome = self.storage.insert_records(&prepared)?;
        if outcome.is_complete() {
            info!(inserted = outcome.inserted.len(), "Records added");
            return Ok(outcome);
        }

        warn!(
            inserted = outcome.inserted.len(),
            failed = outcome.failed.len(),
            "Batch partially stored"
        );
        if outcome.inserted.is_empty() && outcome.only_duplicates() {
            let name = outcome
                .failed
                .first()
                .map(|f| f.name.clone())
                .unwrap_or_default();
            return Err(CatalogError::duplicate(name));
        }
        Err(CatalogError::PartialInsert {
            inserted: outcome.inserted,
            failed: outcome.failed,
        })
    }

    /// Replaces a record's description.
    #[instrument(skip(self, description))]
    pub fn save_description(&self, id: RecordId, description: &str) -> Result<Record> {
        if description.is_empty() {
            return Err(ValidationError::required_field("description").into());
        }
        validate_description(description, &self.config)?;

        self.storage
            .update_description(id, description)?
            .ok_or_else(|| NotFoundError::record(id).into())
    }

    /// Retrieves a record by id.
    pub fn get_by_id(&self, id: RecordId) -> Result<Record> {
        self.storage
            .get_record(id)?
            .ok_or_else(|| NotFoundError::record(id).into())
    }

    // =========================================================================
    // Likes / dislikes
    // =========================================================================

    /// Adds one like.
    pub fn like(&self, id: RecordId) -> Result<Record> {
        self.adjust(id, CounterField::Likes, CounterDelta::Increment)
    }

    /// Removes one like; the counter stops at zero.
    pub fn unlike(&self, id: RecordId) -> Result<Record> {
        self.adjust(id, CounterField::Likes, CounterDelta::Decrement)
    }

    /// Adds one dislike.
    pub fn dislike(&self, id: RecordId) -> Result<Record> {
        self.adjust(id, CounterField::Dislikes, CounterDelta::Increment)
    }

    /// Removes one dislike; the counter stops at zero.
    pub fn undislike(&self, id: RecordId) -> Result<Record> {
        self.adjust(id, CounterField::Dislikes, CounterDelta::Decrement)
    }

    #[instrument(skip(self))]
    fn adjust(&self, id: RecordId, field: CounterField, delta: CounterDelta) -> Result<Record> {
        self.storage
            .adjust_counter(id, field, delta)?
            .ok_or_else(|| NotFoundError::record(id).into())
    }

    /// Most liked records, at most [`Config::rating_limit`].
    pub fn top_liked(&self) -> Result<Vec<Record>> {
        self.storage
            .top_by_counter(CounterField::Likes, self.config.rating_limit)
    }

    /// Most disliked records, at most [`Config::rating_limit`].
    pub fn top_disliked(&self) -> Result<Vec<Record>> {
        self.storage
            .top_by_counter(CounterField::Dislikes, self.config.rating_limit)
    }
}
