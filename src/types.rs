//! Core type definitions for CatalogDB identifiers, enums and timestamps.
//!
//! Record and rule ids are assigned by the store from monotonically
//! increasing counters, so they order by creation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Record identifier (store-assigned, immutable).
///
/// # Example
/// ```
/// use catalogdb::RecordId;
///
/// let id: RecordId = "42".parse().unwrap();
/// assert_eq!(id, RecordId(42));
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Returns big-endian bytes for storage keys.
    #[inline]
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Returns the raw id.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::invalid_field("id", format!("not a record id: {s:?}")))
    }
}

/// Validation rule identifier.
///
/// Rules of one purpose are evaluated in ascending id order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RuleId(pub u64);

impl RuleId {
    /// Returns big-endian bytes for storage keys.
    #[inline]
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gender of a catalog record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Either.
    Unisex,
}

impl Gender {
    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unisex => "unisex",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "unisex" => Ok(Self::Unisex),
            other => Err(ValidationError::invalid_field(
                "gender",
                format!("expected male, female or unisex, got {other:?}"),
            )),
        }
    }
}

/// What a validation rule guards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePurpose {
    /// Applied to search input (by-params and prefix search).
    Search,
    /// Applied to every name of an add batch.
    Add,
}

impl RulePurpose {
    /// Returns the compact 1-byte tag used in storage.
    #[inline]
    pub const fn tag(&self) -> u8 {
        match self {
            Self::Search => 0,
            Self::Add => 1,
        }
    }

    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Add => "add",
        }
    }
}

impl fmt::Display for RulePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RulePurpose {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "search" => Ok(Self::Search),
            "add" => Ok(Self::Add),
            other => Err(ValidationError::invalid_field(
                "type",
                format!("expected search or add, got {other:?}"),
            )),
        }
    }
}

/// Which counter of a record to adjust.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterField {
    /// The `likes` counter.
    Likes,
    /// The `dislikes` counter.
    Dislikes,
}

impl fmt::Display for CounterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Likes => f.write_str("likes"),
            Self::Dislikes => f.write_str("dislikes"),
        }
    }
}

/// Direction of a counter adjustment: exactly one step up or down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterDelta {
    /// +1
    Increment,
    /// -1, saturating at zero
    Decrement,
}

impl CounterDelta {
    /// Applies this delta to a counter value. Counters never go below zero.
    #[inline]
    pub const fn apply(&self, value: u64) -> u64 {
        match self {
            Self::Increment => value.saturating_add(1),
            Self::Decrement => value.saturating_sub(1),
        }
    }
}

/// Ordering of alphabetic groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// A to Z.
    #[default]
    Asc,
    /// Z to A.
    Desc,
}

impl SortOrder {
    /// Returns true when groups must be reversed.
    #[inline]
    pub fn is_reversed(&self) -> bool {
        matches!(self, Self::Desc)
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ValidationError::invalid_field(
                "order",
                format!("expected asc or desc, got {other:?}"),
            )),
        }
    }
}

/// Unix timestamp in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    ///
    /// If the system clock is before the Unix epoch, returns the epoch
    /// rather than panicking.
    #[inline]
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(duration.as_millis() as i64)
    }

    /// Creates a timestamp from Unix milliseconds.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as Unix milliseconds.
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_parse() {
        assert_eq!("7".parse::<RecordId>().unwrap(), RecordId(7));
        assert_eq!(" 12 ".parse::<RecordId>().unwrap(), RecordId(12));
        assert!("abc".parse::<RecordId>().is_err());
        assert!("-1".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_record_id_key_ordering() {
        // Big-endian keys must sort like the ids themselves
        assert!(RecordId(2).to_be_bytes() < RecordId(10).to_be_bytes());
    }

    #[test]
    fn test_gender_parse_and_display() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(Gender::Unisex.to_string(), "unisex");
        assert!("cat".parse::<Gender>().is_err());
    }

    #[test]
    fn test_gender_json() {
        let json = serde_json::to_string(&Gender::Male).unwrap();
        assert_eq!(json, "\"male\"");
    }

    #[test]
    fn test_rule_purpose_parse() {
        assert_eq!("search".parse::<RulePurpose>().unwrap(), RulePurpose::Search);
        assert_eq!("ADD".parse::<RulePurpose>().unwrap(), RulePurpose::Add);
        assert!("delete".parse::<RulePurpose>().is_err());
        assert_ne!(RulePurpose::Search.tag(), RulePurpose::Add.tag());
    }

    #[test]
    fn test_counter_delta_saturates() {
        assert_eq!(CounterDelta::Increment.apply(0), 1);
        assert_eq!(CounterDelta::Decrement.apply(1), 0);
        assert_eq!(CounterDelta::Decrement.apply(0), 0);
        assert_eq!(CounterDelta::Increment.apply(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!("".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!(SortOrder::Desc.is_reversed());
        assert!(!SortOrder::default().is_reversed());
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_timestamp_ordering() {
        let t1 = Timestamp::from_millis(1000);
        let t2 = Timestamp::from_millis(2000);
        assert!(t1 < t2);
        assert!(Timestamp::now().as_millis() > 0);
    }
}
