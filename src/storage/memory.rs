//! In-memory storage engine.
//!
//! Keeps the whole catalog in process memory behind one `RwLock`. Writes
//! take the lock exclusively, which gives the same per-record atomicity as
//! a redb write transaction. Nothing survives a restart.

use std::collections::BTreeMap;
use std::path::Path;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::schema::DatabaseMetadata;
use super::{BatchInsert, InsertFailure, StorageEngine};
use crate::error::{Result, StorageError};
use crate::names::canonical_key;
use crate::record::{NewRecord, Record};
use crate::rules::{NewValidationRule, ValidationRule};
use crate::search::{rank_by_counter, SearchFilter};
use crate::types::{CounterDelta, CounterField, RecordId, RuleId, RulePurpose};

#[derive(Debug, Default)]
struct State {
    records: BTreeMap<RecordId, Record>,
    names: BTreeMap<String, RecordId>,
    rules: BTreeMap<RuleId, ValidationRule>,
    last_record_id: u64,
    last_rule_id: u64,
}

/// Storage engine backed by ordered maps in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: RwLock<State>,
    metadata: DatabaseMetadata,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(last: &mut u64, sequence: &'static str) -> Result<u64> {
    *last = last
        .checked_add(1)
        .ok_or(StorageError::IdExhausted(sequence))?;
    Ok(*last)
}

impl StorageEngine for MemoryStorage {
    fn metadata(&self) -> &DatabaseMetadata {
        &self.metadata
    }

    fn close(self: Box<Self>) -> Result<()> {
        info!("Closing in-memory storage");
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        None
    }

    fn list_rules(&self, purpose: Option<RulePurpose>) -> Result<Vec<ValidationRule>> {
        let state = self.state.read();
        Ok(state
            .rules
            .values()
            .filter(|r| purpose.map_or(true, |p| r.purpose == p))
            .cloned()
            .collect())
    }

    fn save_rule(&self, rule: &NewValidationRule) -> Result<ValidationRule> {
        let mut state = self.state.write();
        let id = RuleId(next_id(&mut state.last_rule_id, "rules")?);
        let stored = rule.clone().with_id(id);
        state.rules.insert(id, stored.clone());
        debug!(id = %id, "Rule saved");
        Ok(stored)
    }

    fn delete_rule(&self, id: RuleId) -> Result<bool> {
        Ok(self.state.write().rules.remove(&id).is_some())
    }

    fn get_record(&self, id: RecordId) -> Result<Option<Record>> {
        Ok(self.state.read().records.get(&id).cloned())
    }

    fn count_records(&self) -> Result<u64> {
        Ok(self.state.read().records.len() as u64)
    }

    fn fetch_by_name_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<Record>> {
        let key = canonical_key(prefix);
        let state = self.state.read();

        let mut found = Vec::new();
        for (name, id) in state.names.range(key.clone()..) {
            if found.len() >= limit || !name.starts_with(key.as_str()) {
                break;
            }
            let record = state.records.get(id).ok_or_else(|| {
                StorageError::corrupted(format!("name index points at missing record {id}"))
            })?;
            found.push(record.clone());
        }

        Ok(found)
    }

    fn fetch_by_filter(&self, filter: &SearchFilter) -> Result<Vec<Record>> {
        let matcher = filter.matcher();
        Ok(self
            .state
            .read()
            .records
            .values()
            .filter(|r| matcher.matches(r))
            .cloned()
            .collect())
    }

    fn top_by_counter(&self, field: CounterField, limit: usize) -> Result<Vec<Record>> {
        let records: Vec<Record> = self.state.read().records.values().cloned().collect();
        Ok(rank_by_counter(records, field, limit))
    }

    fn insert_records(&self, records: &[NewRecord]) -> Result<BatchInsert> {
        let mut outcome = BatchInsert::default();

        for (index, new) in records.iter().enumerate() {
            let mut state = self.state.write();
            let key = canonical_key(&new.name);
            if state.names.contains_key(&key) {
                warn!(index, name = %new.name, "Duplicate name rejected");
                outcome.failed.push(InsertFailure::duplicate(index, &new.name));
                continue;
            }

            let id = match next_id(&mut state.last_record_id, "records") {
                Ok(id) => RecordId(id),
                Err(e) => {
                    outcome
                        .failed
                        .push(InsertFailure::storage(index, &new.name, e.to_string()));
                    continue;
                }
            };

            let record = new.clone().into_record(id);
            state.names.insert(key, id);
            state.records.insert(id, record.clone());
            debug!(id = %id, name = %record.name, "Record inserted");
            outcome.inserted.push(record);
        }

        Ok(outcome)
    }

    fn update_description(&self, id: RecordId, description: &str) -> Result<Option<Record>> {
        let mut state = self.state.write();
        Ok(state.records.get_mut(&id).map(|record| {
            record.description = Some(description.to_string());
            record.clone()
        }))
    }

    fn adjust_counter(
        &self,
        id: RecordId,
        field: CounterField,
        delta: CounterDelta,
    ) -> Result<Option<Record>> {
        let mut state = self.state.write();
        Ok(state.records.get_mut(&id).map(|record| {
            let counter = record.counter_mut(field);
            *counter = delta.apply(*counter);
            record.clone()
        }))
    }
}
