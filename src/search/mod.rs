//! Search operations for the catalog.
//!
//! This module holds the pure parts of record retrieval: filtering for
//! search-by-params, alphabetic grouping, prefix paging and ratings. Store
//! access lives in [`crate::storage`]; [`crate::Catalog`] wires the two.

mod filter;
mod grouping;
mod prefix;
mod rating;

pub use filter::{FilterMatcher, SearchFilter};
pub use grouping::{group_and_sort, Group, GroupedRecords};
pub use prefix::PrefixPage;
pub use rating::rank_by_counter;
