//! Alphabetic grouping of search results.
//!
//! Records are bucketed by the upper-cased first character of their name.
//! Buckets are ordered by title, members keep their input order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::names::title_of;
use crate::record::Record;

/// Records sharing a leading letter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Upper-cased first character of every member's name.
    pub title: char,

    /// Members in input order.
    #[serde(rename = "cats")]
    pub records: Vec<Record>,

    /// Number of members.
    pub count: usize,
}

/// Result of grouping: ordered groups plus the overall count.
///
/// `total_count` always equals the sum of the group counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedRecords {
    /// Groups ordered by title.
    pub groups: Vec<Group>,

    /// Number of records across all groups.
    #[serde(rename = "count")]
    pub total_count: usize,
}

impl GroupedRecords {
    /// Returns true if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the group with the given title.
    pub fn group(&self, title: char) -> Option<&Group> {
        self.groups.iter().find(|g| g.title == title)
    }
}

/// Buckets records by leading letter and orders the buckets.
///
/// Titles are sorted ascending, or descending when `reverse` is set. The
/// stored names are not modified.
///
/// # Errors
///
/// [`CatalogError::InvalidRecord`] if a record has an empty name. The whole
/// operation fails; such a record can only come from a broken store.
///
/// # Example
///
/// ```rust
/// use catalogdb::search::group_and_sort;
/// use catalogdb::{NewRecord, RecordId};
///
/// let records = ["bob", "amy", "Ann"]
///     .iter()
///     .enumerate()
///     .map(|(i, n)| NewRecord::named(*n).into_record(RecordId(i as u64)))
///     .collect();
///
/// let grouped = group_and_sort(records, false).unwrap();
/// assert_eq!(grouped.total_count, 3);
/// assert_eq!(grouped.groups[0].title, 'A');
/// assert_eq!(grouped.groups[0].count, 2);
/// assert_eq!(grouped.groups[1].title, 'B');
/// ```
pub fn group_and_sort(records: Vec<Record>, reverse: bool) -> Result<GroupedRecords> {
    let mut buckets: BTreeMap<char, Vec<Record>> = BTreeMap::new();

    for record in records {
        let title = title_of(&record.name)
            .ok_or_else(|| CatalogError::invalid_record(record.id, "record has an empty name"))?;
        buckets.entry(title).or_default().push(record);
    }

    let into_group = |(title, records): (char, Vec<Record>)| Group {
        title,
        count: records.len(),
        records,
    };

    let groups: Vec<Group> = if reverse {
        buckets.into_iter().rev().map(into_group).collect()
    } else {
        buckets.into_iter().map(into_group).collect()
    };
    let total_count = groups.iter().map(|g| g.count).sum();

    Ok(GroupedRecords {
        groups,
        total_count,
    })
}
