//! Anchored extraction for document-management exports.
//!
//! Rows in these exports read like `report.dwg 6/3/2025 3:54 PM Checked Out
//! by jo.bloggs in /proj/cad`: a date-time anchor, a verb phrase from a small
//! fixed vocabulary, and the actor and folder trailing the verb. The text in
//! front of the verb, once the anchor is removed, names the document.

use super::probes::{probe_first, ProbeField};
use crate::timestamp::{find_timestamp, YearWindow};
use crate::types::Fields;
use regex::Regex;
use std::sync::LazyLock;

/// Action vocabulary, longest phrases first so "Checked Out" wins over a
/// bare "Checked".
pub const ACTION_VOCABULARY: &[&str] = &[
    "Sent to Folder",
    "Checked Out",
    "Checked In",
    "Check Out",
    "Check In",
    "Unlocked",
    "Restored",
    "Exported",
    "Replaced",
    "Modified",
    "Deleted",
    "Created",
    "Renamed",
    "Updated",
    "Copied",
    "Purged",
    "Locked",
    "Opened",
    "Viewed",
    "Freed",
    "Moved",
    "Added",
];

static VOCABULARY: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = ACTION_VOCABULARY
        .iter()
        .map(|phrase| phrase.replace(' ', r"[\s-]+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({alternation})\b")).expect("valid action vocabulary")
});

static TRAILING_ACTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bby\s+([\w.\-]+)").expect("valid actor regex"));

static TRAILING_CONTAINER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:in|to|from)\s+([^\s,]+)").expect("valid container regex")
});

/// Extract fields around a vocabulary verb. Returns `None` when the row has
/// no vocabulary phrase, leaving the caller to fall back to the probes.
pub fn extract(text: &str, window: YearWindow) -> Option<Fields> {
    let (timestamp, without_anchor) = match find_timestamp(text, window) {
        Some((ts, range)) => {
            let mut stripped = String::with_capacity(text.len());
            stripped.push_str(text[..range.start].trim_end());
            stripped.push(' ');
            stripped.push_str(text[range.end..].trim_start());
            (Some(ts), stripped.trim().to_string())
        }
        None => (None, text.trim().to_string()),
    };

    let verb = VOCABULARY.find(&without_anchor)?;
    let before = without_anchor[..verb.start()].trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, ',' | ';' | '|' | '-')
    });
    let after = &without_anchor[verb.end()..];

    let mut fields = Fields {
        timestamp,
        action: verb.as_str().to_string(),
        detail: without_anchor.clone(),
        ..Fields::default()
    };
    if let Some(actor) = capture(&TRAILING_ACTOR, after) {
        fields.actor = actor;
    }
    if let Some(container) = capture(&TRAILING_CONTAINER, after) {
        fields.container = container;
    }
    fields.resource = probe_first(ProbeField::Resource, &without_anchor)
        .filter(|_| before.is_empty())
        .unwrap_or_else(|| before.to_string());
    fields.application = probe_first(ProbeField::Application, &without_anchor);
    Some(fields)
}

fn capture(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)?
        .get(1)
        .map(|m| m.as_str().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
