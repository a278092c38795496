//! Validation rule engine.
//!
//! A **validation rule** is a regular expression plus a human-readable
//! failure message, scoped to a [`RulePurpose`]. Rules live in the store so
//! they can be changed without redeploying; the engine evaluates a snapshot.
//!
//! # Semantics
//!
//! - Rules run in ascending id order and are conjunctive.
//! - A rule passes when its pattern matches **anywhere** in the candidate.
//!   Patterns are not implicitly anchored; use `^...$` in the pattern for a
//!   full match.
//! - The first failing rule stops evaluation; its description is the error.
//! - An empty rule set accepts everything. The empty candidate is not
//!   special-cased: whether it passes depends on the patterns alone.
//!
//! ```rust
//! use catalogdb::rules::{validate, NewValidationRule};
//! use catalogdb::{RuleId, RulePurpose};
//!
//! let rules = vec![
//!     NewValidationRule::new(RulePurpose::Search, "Name is required", ".")
//!         .with_id(RuleId(1)),
//!     NewValidationRule::new(RulePurpose::Search, "Letters only", "^[a-zA-Z]*$")
//!         .with_id(RuleId(2)),
//! ];
//!
//! assert!(validate("tom", &rules).is_ok());
//! let err = validate("", &rules).unwrap_err();
//! assert_eq!(err.to_string(), "Name is required");
//! ```

mod cache;
pub mod types;

pub use cache::RuleCache;
pub use types::{NewValidationRule, ValidationRule};

use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::error::{CatalogError, Result};
use crate::types::RulePurpose;

/// Upper bound on the compiled size of a single rule pattern.
const MAX_COMPILED_PATTERN_SIZE: usize = 1 << 20;

/// Validates `candidate` against `rules`, compiling each pattern afresh.
///
/// # Errors
///
/// - [`CatalogError::ValidationFailed`] with the description of the first
///   rule (by ascending id) whose pattern has no match in `candidate`.
/// - [`CatalogError::InvalidRule`] if a stored pattern does not compile.
pub fn validate(candidate: &str, rules: &[ValidationRule]) -> Result<()> {
    evaluate(candidate, rules, compile)
}

/// Shared evaluation loop; `regex_for` supplies the compiled pattern.
pub(crate) fn evaluate<F>(candidate: &str, rules: &[ValidationRule], mut regex_for: F) -> Result<()>
where
    F: FnMut(&ValidationRule) -> Result<Regex>,
{
    let in_order = rules.windows(2).all(|w| w[0].id <= w[1].id);
    let mut sorted;
    let ordered: &[ValidationRule] = if in_order {
        rules
    } else {
        sorted = rules.to_vec();
        sorted.sort_by_key(|r| r.id);
        &sorted
    };

    for rule in ordered {
        let regex = regex_for(rule)?;
        if !regex.is_match(candidate) {
            warn!(rule = %rule.id, reason = %rule.description, "Validation rule failed");
            return Err(CatalogError::validation_failed(rule.description.clone()));
        }
    }

    Ok(())
}

/// Compiles a rule pattern.
pub(crate) fn compile(rule: &ValidationRule) -> Result<Regex> {
    compile_pattern(&rule.pattern).map_err(|e| CatalogError::invalid_rule(rule.id, e.to_string()))
}

/// Compiles a raw pattern with the engine's size limit.
pub(crate) fn compile_pattern(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .size_limit(MAX_COMPILED_PATTERN_SIZE)
        .build()
}

/// The rule set installed by `Catalog::seed_default_rules` on an empty store.
pub fn default_rules() -> Vec<NewValidationRule> {
    vec![
        NewValidationRule::new(
            RulePurpose::Search,
            "Search may only contain letters, spaces and hyphens",
            r"^[\p{L}\s-]*$",
        ),
        NewValidationRule::new(RulePurpose::Add, "Name is required", r"\S"),
        NewValidationRule::new(
            RulePurpose::Add,
            "Name must start with a letter",
            r"^\s*\p{L}",
        ),
        NewValidationRule::new(
            RulePurpose::Add,
            "Name may only contain letters, spaces and hyphens",
            r"^[\p{L}\s-]+$",
        ),
    ]
}
