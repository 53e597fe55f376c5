//! Repair of completion output into trustworthy records.
//!
//! Completion services wrap JSON in code fences or prose, drop fields, send
//! numbers where strings belong and invent category names. [`repair`] cuts
//! the JSON object out, defaults every field the way the local extractors
//! do, re-validates timestamps and re-classifies entries whose category is
//! missing or unknown.

use crate::error::RemoteError;
use serde::Deserialize;
use serde_json::{Map, Value};
use trailsift_core::timestamp::{parse_timestamp_in, YearWindow};
use trailsift_core::types::{AuditRecord, Category, Fields};

/// Records recovered from one completion, plus the service's own statistics
/// block if it sent one.
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired {
    pub records: Vec<AuditRecord>,
    pub reported_statistics: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    entries: Option<Vec<Value>>,
    #[serde(default)]
    statistics: Option<Value>,
}

/// Keys accepted for each field, canonical name first. Services echo the
/// export's column names as often as the requested ones, sometimes both.
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "date", "time"];
const ACTOR_KEYS: &[&str] = &["actor", "user"];
const ACTION_KEYS: &[&str] = &["action", "event"];
const RESOURCE_KEYS: &[&str] = &["resource", "document", "file"];
const CONTAINER_KEYS: &[&str] = &["container", "folder", "path"];
const DETAIL_KEYS: &[&str] = &["detail", "details"];
const APPLICATION_KEYS: &[&str] = &["application", "app"];
const CATEGORY_KEYS: &[&str] = &["category"];

/// One entry as the service sent it, every field optional.
#[derive(Debug, Default)]
struct RemoteEntry {
    timestamp: Option<String>,
    actor: Option<String>,
    action: Option<String>,
    resource: Option<String>,
    container: Option<String>,
    detail: Option<String>,
    application: Option<String>,
    category: Option<String>,
}

impl RemoteEntry {
    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            timestamp: pick(map, TIMESTAMP_KEYS),
            actor: pick(map, ACTOR_KEYS),
            action: pick(map, ACTION_KEYS),
            resource: pick(map, RESOURCE_KEYS),
            container: pick(map, CONTAINER_KEYS),
            detail: pick(map, DETAIL_KEYS),
            application: pick(map, APPLICATION_KEYS),
            category: pick(map, CATEGORY_KEYS),
        }
    }
}

/// First usable value under `keys`. Numbers and booleans are stringified.
fn pick(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let value = match map.get(*key)? {
            Value::String(s) => s.clone(),
            scalar @ (Value::Number(_) | Value::Bool(_)) => scalar.to_string(),
            _ => return None,
        };
        non_empty(Some(value))
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
}

/// Slice the JSON object out of a completion: the body of the first code
/// fence if there is one, then everything from the first `{` to the last `}`.
pub fn extract_json(completion: &str) -> Option<&str> {
    let body = fenced_block(completion).unwrap_or(completion);
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (start < end).then(|| &body[start..=end])
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after = &text[open + 3..];
    // Skip the info string (`json`) on the opening fence line.
    let body = &after[after.find('\n').map_or(0, |i| i + 1)..];
    let close = body.find("```")?;
    Some(&body[..close])
}

/// Turn completion text into records with ids in response order.
pub fn repair(completion: &str, window: YearWindow) -> Result<Repaired, RemoteError> {
    let json = extract_json(completion).ok_or(RemoteError::NoJson)?;
    let envelope: Envelope = serde_json::from_str(json)?;
    let entries = envelope.entries.ok_or(RemoteError::MissingEntries)?;

    let mut records = Vec::with_capacity(entries.len());
    for value in entries {
        let Some(map) = value.as_object() else {
            tracing::warn!(entry = %value, "skipping non-object completion entry");
            continue;
        };
        let entry = RemoteEntry::from_map(map);
        records.push(into_record(entry, &value, records.len(), window));
    }

    Ok(Repaired {
        records,
        reported_statistics: envelope.statistics,
    })
}

fn into_record(entry: RemoteEntry, value: &Value, id: usize, window: YearWindow) -> AuditRecord {
    let mut fields = Fields {
        timestamp: entry
            .timestamp
            .as_deref()
            .and_then(|ts| parse_timestamp_in(ts, window)),
        resource: entry.resource.unwrap_or_default(),
        container: entry.container.unwrap_or_default(),
        detail: entry.detail.unwrap_or_default(),
        application: entry.application,
        ..Fields::default()
    };
    if let Some(actor) = entry.actor {
        fields.actor = actor;
    }
    if let Some(action) = entry.action {
        fields.action = action;
    }

    let mut record = fields.into_record(id, value.to_string());
    if let Some(category) = entry.category.and_then(|c| c.parse::<Category>().ok()) {
        record.category = category;
    }
    record
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
