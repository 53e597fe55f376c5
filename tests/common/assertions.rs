//! Domain-specific assertion macros for trailsift harnesses.
//!
//! These add context-rich failure messages that make it clear *which* record
//! and *which* field broke expectations.

use trailsift_core::types::AuditRecord;

// ---------------------------------------------------------------------------
// Field assertions
// ---------------------------------------------------------------------------

/// Assert several fields of one `AuditRecord` at once.
///
/// ```rust
/// assert_fields!(record, actor: "john.doe", action: "File Deleted");
/// ```
#[macro_export]
macro_rules! assert_fields {
    ($record:expr, $($field:ident : $value:expr),+ $(,)?) => {{
        let record: &trailsift_core::types::AuditRecord = &$record;
        $(
            if record.$field != $value {
                panic!(
                    "assert_fields! failed on `{}`:\n  expected: {:?}\n  actual:   {:?}\n  raw: {:?}",
                    stringify!($field),
                    $value,
                    record.$field,
                    record.raw
                );
            }
        )+
    }};
}

/// Assert that a record carries no timestamp.
#[macro_export]
macro_rules! assert_undated {
    ($record:expr) => {{
        let record: &trailsift_core::types::AuditRecord = &$record;
        if let Some(ts) = record.timestamp {
            panic!(
                "assert_undated! failed: record {} has timestamp {}\n  raw: {:?}",
                record.id, ts, record.raw
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Collection assertions
// ---------------------------------------------------------------------------

/// Assert the presentation sort: newest first, undated last.
#[macro_export]
macro_rules! assert_sorted_newest_first {
    ($records:expr) => {{
        let records: &[trailsift_core::types::AuditRecord] = &$records;
        for pair in records.windows(2) {
            let ordered = match (pair[0].timestamp, pair[1].timestamp) {
                (Some(a), Some(b)) => a >= b,
                (Some(_), None) | (None, None) => true,
                (None, Some(_)) => false,
            };
            if !ordered {
                panic!(
                    "assert_sorted_newest_first! failed between ids {} ({:?}) and {} ({:?})",
                    pair[0].id, pair[0].timestamp, pair[1].id, pair[1].timestamp
                );
            }
        }
    }};
}

/// Assert that per-category counts sum to the total.
#[macro_export]
macro_rules! assert_summary_consistent {
    ($summary:expr) => {{
        let summary: &trailsift_core::summary::AuditSummary = &$summary;
        let sum: usize = summary.categories.values().sum();
        if sum != summary.total_entries {
            panic!(
                "assert_summary_consistent! failed: categories sum to {} but total is {}\n  {:?}",
                sum, summary.total_entries, summary.categories
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Record invariant helpers
// ---------------------------------------------------------------------------

/// Assert the invariants every produced record satisfies: non-empty actor
/// and action, and ids unique across the slice.
pub fn assert_record_invariants(records: &[AuditRecord]) {
    let mut ids: Vec<usize> = records.iter().map(|r| r.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), records.len(), "record ids must be unique");
    for record in records {
        assert!(!record.actor.is_empty(), "actor must never be empty: {:?}", record.raw);
        assert!(!record.action.is_empty(), "action must never be empty: {:?}", record.raw);
    }
}
