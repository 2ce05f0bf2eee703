//! Duplicate-free merging of record sets

use sentinel_domain::{canonical_key, Record, RecordSet};
use std::collections::HashSet;
use tracing::debug;

/// Result of merging incoming records into an existing set
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Merged set: existing records first, then new ones, first occurrence wins
    pub records: RecordSet,

    /// Number of distinct records `incoming` contributed
    pub added: usize,

    /// Whether `records` differs from the existing set
    ///
    /// When false the caller must skip persistence.
    pub changed: bool,
}

/// Fold `existing` followed by `incoming` into a duplicate-free set
///
/// Records are compared by their canonical key, so field order does not
/// matter. Existing records keep their positions; records first introduced by
/// `incoming` are appended in their original relative order.
pub fn merge(existing: &[Record], incoming: &[Record]) -> MergeOutcome {
    let mut seen: HashSet<String> = HashSet::with_capacity(existing.len() + incoming.len());
    let mut records = Vec::with_capacity(existing.len() + incoming.len());

    for record in existing {
        if seen.insert(canonical_key(record)) {
            records.push(record.clone());
        }
    }

    let retained = records.len();
    if retained < existing.len() {
        debug!("Dropped {} duplicate records already on disk", existing.len() - retained);
    }

    for record in incoming {
        if seen.insert(canonical_key(record)) {
            records.push(record.clone());
        }
    }

    let added = records.len() - retained;
    let changed = records.as_slice() != existing;

    MergeOutcome {
        records,
        added,
        changed,
    }
}
