//! # CatalogDB
//!
//! Catalog of named records with store-driven name validation and
//! alphabetic result grouping, plus the HTTP service that fronts it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use catalogdb::{Catalog, Config, Gender, NewRecord, SortOrder};
//!
//! // Open or create a catalog
//! let catalog = Catalog::open("./catalog.db", Config::default())?;
//! catalog.seed_default_rules()?;
//!
//! // Add a batch; names are trimmed and capitalized before storing
//! catalog.add_records(vec![
//!     NewRecord::named("murka").with_gender(Gender::Female),
//!     NewRecord::named("jean-paul"),
//! ])?;
//!
//! // Autocomplete
//! let page = catalog.search_by_prefix("mu", Some(5))?;
//! assert!(!page.has_more);
//!
//! // Everything, grouped by first letter
//! let grouped = catalog.get_all(None, SortOrder::Asc)?;
//! assert_eq!(grouped.total_count, 2);
//!
//! catalog.close()?;
//! # Ok::<(), catalogdb::CatalogError>(())
//! ```
//!
//! ## Key Concepts
//!
//! ### Record
//!
//! A **record** has a store-assigned id, a unique (ignoring case) name, an
//! optional description and gender, and like/dislike counters.
//!
//! ### Validation rule
//!
//! A **validation rule** is a regex plus a failure message, stored with a
//! purpose (`search` or `add`). Rules of a purpose run in ascending id
//! order; the first one without a match anywhere in the input rejects it
//! with its message.
//!
//! ### Grouping
//!
//! Listings are bucketed by the upper-cased first letter of the name;
//! buckets are sorted by that letter and carry their own counts.
//!
//! ## Thread Safety
//!
//! `Catalog` is `Send + Sync` and can be shared across threads using `Arc`.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

// ============================================================================
// Module declarations
// ============================================================================

mod catalog;
mod config;
mod error;
mod types;

pub mod http;
pub mod names;
pub mod record;
pub mod rules;
pub mod search;
pub mod storage;

// ============================================================================
// Public API re-exports
// ============================================================================

// Main catalog interface
pub use catalog::Catalog;

// Configuration
pub use config::{Config, SyncMode};

// Error handling
pub use error::{CatalogError, NotFoundError, Result, StorageError, ValidationError};

// Core types
pub use types::{
    CounterDelta, CounterField, Gender, RecordId, RuleId, RulePurpose, SortOrder, Timestamp,
};

// Domain types
pub use record::{NewRecord, Record};
pub use rules::{NewValidationRule, ValidationRule};

// Search
pub use search::{Group, GroupedRecords, PrefixPage, SearchFilter};

// Storage (for advanced users)
pub use storage::{BatchInsert, DatabaseMetadata, InsertFailure, InsertFailureKind};

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Convenient imports for common CatalogDB usage.
///
/// ```rust
/// use catalogdb::prelude::*;
/// ```
pub mod prelude {
    pub use crate::catalog::Catalog;
    pub use crate::config::{Config, SyncMode};
    pub use crate::error::{CatalogError, Result};
    pub use crate::record::{NewRecord, Record};
    pub use crate::search::{GroupedRecords, PrefixPage};
    pub use crate::types::{Gender, RecordId, RulePurpose, SortOrder};
}
