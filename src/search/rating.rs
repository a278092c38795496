//! Likes/dislikes ratings.

use std::cmp::Reverse;

use crate::names::canonical_key;
use crate::record::Record;
use crate::types::CounterField;

/// Returns the top `limit` records by one counter.
///
/// Records with a zero counter are left out. Ties are broken by
/// case-insensitive name, then by id, so the result is deterministic.
pub fn rank_by_counter(
    records: impl IntoIterator<Item = Record>,
    field: CounterField,
    limit: usize,
) -> Vec<Record> {
    let mut ranked: Vec<(Reverse<u64>, String, Record)> = records
        .into_iter()
        .filter(|r| r.counter(field) > 0)
        .map(|r| (Reverse(r.counter(field)), canonical_key(&r.name), r))
        .collect();

    ranked.sort_by(|a, b| (a.0, &a.1, a.2.id).cmp(&(b.0, &b.1, b.2.id)));
    ranked.truncate(limit);
    ranked.into_iter().map(|(_, _, r)| r).collect()
}
