//! Classifier: maps actions to investigation categories and flags key events.
//!
//! Both are table-driven. [`CATEGORY_RULES`] is checked top to bottom so the
//! more specific signals win; adding a category means adding a row, not a
//! branch.

use crate::types::{AuditRecord, Category};
use std::collections::HashSet;

/// Ordered `(keywords, category)` rules. The first rule with a keyword
/// contained in the lower-cased text decides the category.
pub const CATEGORY_RULES: &[(&[&str], Category)] = &[
    (&["missing", "not found", "cannot find"], Category::MissingResource),
    (&["delete", "purge", "remove"], Category::Deletion),
    (
        &[
            "create", "modify", "update", "move", "copy", "check", "free", "lock", "export",
        ],
        Category::FileOperation,
    ),
    (
        &["login", "logout", "auth", "permission", "access", "grant"],
        Category::SecurityEvent,
    ),
    (
        &["start", "stop", "restart", "shutdown", "init"],
        Category::SystemEvent,
    ),
];

fn match_rules(text: &str) -> Option<Category> {
    let lower = text.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
}

/// Assign exactly one category. The action decides; the detail is only
/// consulted when the action matches no rule.
pub fn classify(action: &str, detail: &str) -> Category {
    match_rules(action)
        .or_else(|| match_rules(detail))
        .unwrap_or(Category::Other)
}

// ---------------------------------------------------------------------------
// Key events
// ---------------------------------------------------------------------------

/// Phrases that mark a record for priority review.
const KEY_EVENT_TERMS: &[&str] = &[
    // deletion
    "delet", "purg", "remov",
    // movement
    "move", "relocat", "transfer",
    // export
    "export", "sent to folder",
    // replacement
    "replac", "overwr",
    "freed",
    "version",
    // failures
    "error", "failed", "corrupt", "missing",
];

const CHECK_OUT_TERMS: &[&str] = &["check out", "checked out", "check-out", "checkout", "checked-out"];
// "checkin" is left out: it would also match "checking".
const CHECK_IN_TERMS: &[&str] = &["check in", "checked in", "check-in", "checked-in"];

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}

/// Record-level key-event test over the action and detail. Unmatched
/// check-outs need the surrounding records and are handled by
/// [`key_events`].
pub fn is_key_event(record: &AuditRecord) -> bool {
    let text = format!("{} {}", record.action, record.detail).to_lowercase();
    contains_any(&text, KEY_EVENT_TERMS)
}

fn is_check_out(record: &AuditRecord) -> bool {
    contains_any(&record.action.to_lowercase(), CHECK_OUT_TERMS)
}

fn is_check_in(record: &AuditRecord) -> bool {
    contains_any(&record.action.to_lowercase(), CHECK_IN_TERMS)
}

/// Ids of check-outs with no later check-in of the same resource, in input
/// order. A check-out without a resource can never be matched.
pub fn unmatched_check_outs(records: &[AuditRecord]) -> HashSet<usize> {
    let mut ordered: Vec<&AuditRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.id);

    let mut checked_in_later: HashSet<String> = HashSet::new();
    let mut unmatched = HashSet::new();
    for record in ordered.into_iter().rev() {
        let resource = record.resource.trim().to_lowercase();
        if is_check_in(record) {
            if !resource.is_empty() {
                checked_in_later.insert(resource);
            }
        } else if is_check_out(record)
            && (resource.is_empty() || !checked_in_later.contains(&resource))
        {
            unmatched.insert(record.id);
        }
    }
    unmatched
}

/// The priority-review subset, in input order, capped at `limit` matches
/// (`None` = unbounded).
pub fn key_events(records: &[AuditRecord], limit: Option<usize>) -> Vec<&AuditRecord> {
    let unmatched = unmatched_check_outs(records);
    let mut ordered: Vec<&AuditRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.id);
    ordered
        .into_iter()
        .filter(|r| is_key_event(r) || unmatched.contains(&r.id))
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
