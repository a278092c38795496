//! Compiled-regex cache for validation rules.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use regex::Regex;
use tracing::debug;

use super::{compile, evaluate, ValidationRule};
use crate::error::Result;
use crate::types::RuleId;

/// A compiled pattern together with the source it was compiled from.
#[derive(Clone)]
struct CachedPattern {
    pattern: String,
    regex: Regex,
}

/// LRU cache of compiled rule patterns, keyed by rule id.
///
/// An entry is only reused while the stored pattern is byte-identical to the
/// one it was compiled from, so editing a rule in the store invalidates its
/// entry on the next lookup. [`invalidate`](Self::invalidate) and
/// [`clear`](Self::clear) drop entries eagerly.
///
/// Validating through the cache is observably identical to compiling every
/// pattern on each call.
pub struct RuleCache {
    entries: Mutex<LruCache<RuleId, CachedPattern>>,
}

impl RuleCache {
    /// Creates a cache holding at most `capacity` compiled patterns.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Validates `candidate` against `rules`, compiling patterns on miss.
    ///
    /// Same contract as [`validate`](super::validate).
    pub fn validate(&self, candidate: &str, rules: &[ValidationRule]) -> Result<()> {
        evaluate(candidate, rules, |rule| self.regex_for(rule))
    }

    /// Returns the compiled regex for `rule`, compiling it on miss or when the
    /// stored pattern changed.
    fn regex_for(&self, rule: &ValidationRule) -> Result<Regex> {
        {
            let mut entries = self.entries.lock();
            if let Some(cached) = entries.get(&rule.id) {
                if cached.pattern == rule.pattern {
                    return Ok(cached.regex.clone());
                }
                debug!(rule = %rule.id, "Rule pattern changed, recompiling");
            }
        }

        // Compile outside the lock; a concurrent miss on the same id just
        // compiles twice.
        let regex = compile(rule)?;
        self.entries.lock().put(
            rule.id,
            CachedPattern {
                pattern: rule.pattern.clone(),
                regex: regex.clone(),
            },
        );
        Ok(regex)
    }

    /// Drops the entry for one rule.
    pub fn invalidate(&self, id: RuleId) {
        self.entries.lock().pop(&id);
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of compiled patterns currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for RuleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("RuleCache")
            .field("len", &entries.len())
            .field("capacity", &entries.cap())
            .finish()
    }
}
