//! Search filtering for record queries.
//!
//! [`SearchFilter`] is the parameter set of "search by params": a name
//! fragment and an optional set of genders. Stores apply it as a post-filter
//! over a record scan.

use crate::names::canonical_key;
use crate::record::Record;
use crate::types::Gender;

/// Filter criteria for search-by-params.
///
/// Fields set to `None` are not filtered on.
///
/// # Example
///
/// ```rust
/// use catalogdb::{Gender, SearchFilter};
///
/// // Names containing "mur", female or unisex only
/// let filter = SearchFilter::name_like("mur")
///     .with_genders(vec![Gender::Female, Gender::Unisex]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Case-insensitive substring the name must contain.
    ///
    /// The empty string matches every name.
    pub name: Option<String>,

    /// Only include records whose gender is in this list.
    ///
    /// `None` means no gender filtering. An empty `Some(vec![])` matches
    /// nothing. Records without a gender never match a gender filter.
    pub genders: Option<Vec<Gender>>,
}

impl SearchFilter {
    /// Filter on a name fragment only.
    pub fn name_like(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            genders: None,
        }
    }

    /// Filter on a single gender, or nothing when `None`.
    pub fn gender(gender: Option<Gender>) -> Self {
        Self {
            name: None,
            genders: gender.map(|g| vec![g]),
        }
    }

    /// Restricts the filter to the given genders.
    pub fn with_genders(mut self, genders: Vec<Gender>) -> Self {
        self.genders = Some(genders);
        self
    }

    /// Returns a matcher with the name fragment lower-cased once.
    pub fn matcher(&self) -> FilterMatcher<'_> {
        FilterMatcher {
            needle: self.name.as_deref().map(canonical_key),
            filter: self,
        }
    }

    /// Returns `true` if the given record passes all filter criteria.
    ///
    /// For scans over many records prefer [`matcher`](Self::matcher).
    pub fn matches(&self, record: &Record) -> bool {
        self.matcher().matches(record)
    }
}

/// A [`SearchFilter`] prepared for repeated matching.
#[derive(Debug)]
pub struct FilterMatcher<'a> {
    needle: Option<String>,
    filter: &'a SearchFilter,
}

impl FilterMatcher<'_> {
    /// Returns `true` if the given record passes all filter criteria.
    pub fn matches(&self, record: &Record) -> bool {
        // Check name fragment
        if let Some(ref needle) = self.needle {
            if !canonical_key(&record.name).contains(needle.as_str()) {
                return false;
            }
        }

        // Check gender
        if let Some(ref genders) = self.filter.genders {
            match record.gender {
                Some(g) if genders.contains(&g) => {}
                _ => return false,
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewRecord;
    use crate::types::RecordId;

    /// Helper to create a minimal test record.
    fn test_record(name: &str, gender: Option<Gender>) -> Record {
        let mut new = NewRecord::named(name);
        new.gender = gender;
        new.into_record(RecordId(1))
    }

    #[test]
    fn test_default_filter_matches_all() {
        let filter = SearchFilter::default();
        assert!(filter.matches(&test_record("Tom", None)));
        assert!(filter.matches(&test_record("Мурка", Some(Gender::Female))));
    }

    #[test]
    fn test_name_filter_is_case_insensitive_substring() {
        let filter = SearchFilter::name_like("UR");
        assert!(filter.matches(&test_record("Murka", None)));
        assert!(filter.matches(&test_record("Arthur", None)));
        assert!(!filter.matches(&test_record("Tom", None)));
    }

    #[test]
    fn test_name_filter_cyrillic() {
        let filter = SearchFilter::name_like("МУР");
        assert!(filter.matches(&test_record("Мурка", None)));
    }

    #[test]
    fn test_empty_name_matches_everything() {
        let filter = SearchFilter::name_like("");
        assert!(filter.matches(&test_record("Tom", None)));
    }

    #[test]
    fn test_gender_filter() {
        let filter = SearchFilter::gender(Some(Gender::Male));
        assert!(filter.matches(&test_record("Tom", Some(Gender::Male))));
        assert!(!filter.matches(&test_record("Murka", Some(Gender::Female))));
        assert!(!filter.matches(&test_record("Pat", None)));

        assert_eq!(SearchFilter::gender(None), SearchFilter::default());
    }

    #[test]
    fn test_empty_gender_list_matches_nothing() {
        let filter = SearchFilter::default().with_genders(vec![]);
        assert!(!filter.matches(&test_record("Tom", Some(Gender::Male))));
    }

    #[test]
    fn test_combined_filters() {
        let filter =
            SearchFilter::name_like("o").with_genders(vec![Gender::Male, Gender::Unisex]);
        assert!(filter.matches(&test_record("Tom", Some(Gender::Male))));
        assert!(filter.matches(&test_record("Bo", Some(Gender::Unisex))));
        assert!(!filter.matches(&test_record("Molly", Some(Gender::Female))));
        assert!(!filter.matches(&test_record("Sam", Some(Gender::Male))));
    }
}
