//! Type definitions for catalog records.

use serde::{Deserialize, Serialize};

use crate::types::{CounterField, Gender, RecordId, Timestamp};

/// A stored catalog record.
///
/// `id` and `created_at` are assigned by the store and never change. The
/// description and the two counters are the only mutable fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned identifier.
    pub id: RecordId,

    /// Display name, stored in normalized form.
    pub name: String,

    /// Free-form description.
    pub description: Option<String>,

    /// Optional gender.
    pub gender: Option<Gender>,

    /// Like counter, never negative.
    pub likes: u64,

    /// Dislike counter, never negative.
    pub dislikes: u64,

    /// When the record was inserted.
    pub created_at: Timestamp,
}

impl Record {
    /// Returns the value of one counter.
    #[inline]
    pub fn counter(&self, field: CounterField) -> u64 {
        match field {
            CounterField::Likes => self.likes,
            CounterField::Dislikes => self.dislikes,
        }
    }

    /// Returns a mutable reference to one counter.
    #[inline]
    pub fn counter_mut(&mut self, field: CounterField) -> &mut u64 {
        match field {
            CounterField::Likes => &mut self.likes,
            CounterField::Dislikes => &mut self.dislikes,
        }
    }
}

/// Input for creating a record.
///
/// The name is validated and normalized by the catalog before it reaches
/// the store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    /// Requested name.
    pub name: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,

    /// Optional gender.
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl NewRecord {
    /// Creates a record input with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the gender.
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Materializes the stored record under a store-assigned id.
    pub fn into_record(self, id: RecordId) -> Record {
        Record {
            id,
            name: self.name,
            description: self.description,
            gender: self.gender,
            likes: 0,
            dislikes: 0,
            created_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_record_starts_with_zero_counters() {
        let record = NewRecord::named("Tom")
            .with_gender(Gender::Male)
            .into_record(RecordId(3));
        assert_eq!(record.id, RecordId(3));
        assert_eq!(record.likes, 0);
        assert_eq!(record.dislikes, 0);
        assert_eq!(record.gender, Some(Gender::Male));
    }

    #[test]
    fn test_counter_access() {
        let mut record = NewRecord::named("Tom").into_record(RecordId(1));
        *record.counter_mut(CounterField::Dislikes) += 2;
        assert_eq!(record.counter(CounterField::Dislikes), 2);
        assert_eq!(record.counter(CounterField::Likes), 0);
    }

    #[test]
    fn test_record_json_shape() {
        let record = NewRecord::named("Tom")
            .with_description("grey")
            .into_record(RecordId(9));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 9);
        assert_eq!(json["name"], "Tom");
        assert_eq!(json["description"], "grey");
        assert!(json["gender"].is_null());
        assert!(json["created_at"].is_number());
    }

    #[test]
    fn test_new_record_json_defaults() {
        let record: NewRecord = serde_json::from_str(r#"{"name":"Tom"}"#).unwrap();
        assert_eq!(record, NewRecord::named("Tom"));
    }

    #[test]
    fn test_record_bincode_keeps_created_at() {
        let record = NewRecord::named("Tom").into_record(RecordId(1));
        let bytes = bincode::serialize(&record).unwrap();
        let restored: Record = bincode::deserialize(&bytes).unwrap();
        assert_eq!(record, restored);
    }
}
