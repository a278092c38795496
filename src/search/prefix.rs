//! Prefix search paging.
//!
//! Autocomplete asks the store for one row more than it shows: the extra
//! row only proves that more results exist.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// One page of prefix search results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefixPage {
    /// At most `limit` records, ordered case-insensitively by name.
    #[serde(rename = "cats")]
    pub records: Vec<Record>,

    /// True when the store had more matches than `limit`.
    pub has_more: bool,
}

impl PrefixPage {
    /// Number of rows to request from the store for a page of `limit`.
    #[inline]
    pub const fn fetch_size(limit: usize) -> usize {
        limit.saturating_add(1)
    }

    /// Builds a page from up to `limit + 1` store rows.
    ///
    /// Returns `None` when the store returned nothing, which callers report
    /// as "not found" rather than an empty page.
    pub fn from_rows(mut rows: Vec<Record>, limit: usize) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let has_more = rows.len() > limit;
        rows.truncate(limit);

        Some(Self {
            records: rows,
            has_more,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewRecord;
    use crate::types::RecordId;

    fn rows(names: &[&str]) -> Vec<Record> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| NewRecord::named(*n).into_record(RecordId(i as u64 + 1)))
            .collect()
    }

    #[test]
    fn test_truncates_and_flags_more() {
        let page = PrefixPage::from_rows(rows(&["Andy", "Anna", "Annie"]), 2).unwrap();
        let names: Vec<_> = page.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Andy", "Anna"]);
        assert!(page.has_more);
    }

    #[test]
    fn test_exact_fit_has_no_more() {
        let page = PrefixPage::from_rows(rows(&["Andy", "Anna"]), 2).unwrap();
        assert_eq!(page.records.len(), 2);
        assert!(!page.has_more);
    }

    #[test]
    fn test_empty_rows_is_absent() {
        assert!(PrefixPage::from_rows(Vec::new(), 5).is_none());
    }

    #[test]
    fn test_fetch_size() {
        assert_eq!(PrefixPage::fetch_size(2), 3);
        assert_eq!(PrefixPage::fetch_size(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_json_shape() {
        let page = PrefixPage::from_rows(rows(&["Andy"]), 1).unwrap();
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["hasMore"], false);
        assert_eq!(json["cats"][0]["name"], "Andy");
    }
}
