//! Catalog record management.
//!
//! A **record** is the named entity the catalog manages: a name, an optional
//! description and gender, and like/dislike counters.
//!
//! # Operations
//!
//! All record operations are available on [`Catalog`](crate::Catalog):
//!
//! - [`add_records(batch)`](crate::Catalog::add_records)
//! - [`get_by_id(id)`](crate::Catalog::get_by_id)
//! - [`save_description(id, text)`](crate::Catalog::save_description)
//! - [`like(id)`](crate::Catalog::like) / [`unlike(id)`](crate::Catalog::unlike)
//! - [`dislike(id)`](crate::Catalog::dislike) / [`undislike(id)`](crate::Catalog::undislike)
//!
//! # Add pipeline
//!
//! A batch goes through three stages before any store write:
//!
//! 1. [`validate_new_batch`]: structural checks (non-empty batch, names
//!    present, size limits)
//! 2. [`normalize_batch`]: symbol trimming, capitalization, length limit and
//!    in-batch duplicate detection
//! 3. the `add` validation rules, evaluated on each normalized name
//!
//! Any failure aborts the whole batch.

pub mod types;

pub use types::{NewRecord, Record};

use std::collections::HashSet;

use crate::config::Config;
use crate::error::{CatalogError, ValidationError};
use crate::names::{canonical_key, normalize, trim_symbols};

/// Structural validation of an add batch.
///
/// # Rules
///
/// - the batch is non-empty and holds at most `max_batch_size` records
/// - every `name` is non-empty
/// - every `description` is at most `max_description_length` chars
pub(crate) fn validate_new_batch(batch: &[NewRecord], config: &Config) -> Result<(), CatalogError> {
    if batch.is_empty() {
        return Err(ValidationError::required_field("cats").into());
    }

    if batch.len() > config.max_batch_size {
        return Err(
            ValidationError::too_many_items("cats", batch.len(), config.max_batch_size).into(),
        );
    }

    for (i, record) in batch.iter().enumerate() {
        if record.name.is_empty() {
            return Err(ValidationError::required_field(format!("cats[{i}].name")).into());
        }
        if let Some(ref description) = record.description {
            validate_description(description, config)?;
        }
    }

    Ok(())
}

/// Validates a description for storage.
pub(crate) fn validate_description(text: &str, config: &Config) -> Result<(), ValidationError> {
    let len = text.chars().count();
    if len > config.max_description_length {
        return Err(ValidationError::too_long(
            "description",
            len,
            config.max_description_length,
        ));
    }
    Ok(())
}

/// Produces the stored form of a name: trimmed of symbols, then normalized.
///
/// # Errors
///
/// - `InvalidField` if nothing is left after trimming
/// - `TooLong` if the result exceeds `max_name_length` chars
pub(crate) fn prepare_name(raw: &str, config: &Config) -> Result<String, ValidationError> {
    let trimmed = trim_symbols(raw);
    if trimmed.is_empty() {
        return Err(ValidationError::invalid_field(
            "name",
            format!("{raw:?} contains no letters"),
        ));
    }

    let name = normalize(trimmed);
    let len = name.chars().count();
    if len > config.max_name_length {
        return Err(ValidationError::too_long("name", len, config.max_name_length));
    }

    Ok(name)
}

/// Normalizes every name of a batch and rejects in-batch duplicates.
///
/// Two names are duplicates when their normalized forms are equal ignoring
/// case.
pub(crate) fn normalize_batch(
    batch: Vec<NewRecord>,
    config: &Config,
) -> Result<Vec<NewRecord>, CatalogError> {
    let mut seen = HashSet::with_capacity(batch.len());
    let mut prepared = Vec::with_capacity(batch.len());

    for mut record in batch {
        record.name = prepare_name(&record.name, config)?;
        if !seen.insert(canonical_key(&record.name)) {
            return Err(CatalogError::duplicate(record.name));
        }
        prepared.push(record);
    }

    Ok(prepared)
}
