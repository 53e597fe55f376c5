//! Core types for trailsift-core.
//!
//! This module defines the fundamental data structures shared across all
//! pipeline stages: the normalised [`AuditRecord`], its investigation
//! [`Category`], and the [`Fields`] draft the extractors fill in before a
//! record is sealed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder actor used when no actor could be recovered from a row.
pub const UNKNOWN_ACTOR: &str = "Unknown";

/// Placeholder action used when no action could be recovered from a row.
pub const UNKNOWN_ACTION: &str = "Unknown Action";

/// Separator placed between detail fragments when several source columns
/// contribute to [`AuditRecord::detail`].
pub const DETAIL_SEPARATOR: &str = " | ";

/// A normalised audit event produced from one input data row.
///
/// Records are created once by a single parse pass and never mutated
/// afterwards. `actor` and `action` always hold a value (a placeholder when
/// nothing was recovered); `resource`, `container` and `detail` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// 0-based ordinal of the data row this record came from. Unique within
    /// one parse result.
    pub id: usize,
    /// Validated point in time, or `None` when the row carried no usable
    /// timestamp. Never a sentinel date.
    pub timestamp: Option<DateTime<Utc>>,
    /// Who performed the action. [`UNKNOWN_ACTOR`] when unrecoverable.
    pub actor: String,
    /// The operation performed. [`UNKNOWN_ACTION`] when unrecoverable.
    pub action: String,
    /// Document, file or folder name acted upon.
    pub resource: String,
    /// Hierarchical location of the resource.
    pub container: String,
    /// Comments, descriptions and any other auxiliary text.
    pub detail: String,
    /// Source application or object-type tag, when the export carries one.
    pub application: Option<String>,
    /// Investigation bucket, assigned by [`crate::classify::classify`].
    pub category: Category,
    /// The original source row, unmodified.
    pub raw: String,
}

impl AuditRecord {
    /// True when neither the actor nor the action could be recovered.
    pub fn is_defaulted(&self) -> bool {
        self.actor == UNKNOWN_ACTOR && self.action == UNKNOWN_ACTION
    }
}

/// Investigation bucket. Every record belongs to exactly one.
///
/// Variant order is the classifier's priority order; more specific signals
/// come first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MissingResource,
    Deletion,
    FileOperation,
    SecurityEvent,
    SystemEvent,
    Other,
}

impl Category {
    /// Every category, in priority order.
    pub const ALL: [Category; 6] = [
        Category::MissingResource,
        Category::Deletion,
        Category::FileOperation,
        Category::SecurityEvent,
        Category::SystemEvent,
        Category::Other,
    ];

    /// Stable machine name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::MissingResource => "missing_resource",
            Category::Deletion => "deletion",
            Category::FileOperation => "file_operation",
            Category::SecurityEvent => "security_event",
            Category::SystemEvent => "system_event",
            Category::Other => "other",
        }
    }

    /// Human-readable label, used by the default CSV export.
    pub fn label(self) -> &'static str {
        match self {
            Category::MissingResource => "Missing Resource",
            Category::Deletion => "Deletion",
            Category::FileOperation => "File Operation",
            Category::SecurityEvent => "Security Event",
            Category::SystemEvent => "System Event",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Accepts the machine name, the label, or either with `-`/space
    /// separators, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Field values recovered from one row, before the record is sealed.
///
/// [`Fields::default`] holds the values every extractor starts from:
/// placeholder actor and action, empty strings elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields {
    pub timestamp: Option<DateTime<Utc>>,
    pub actor: String,
    pub action: String,
    pub resource: String,
    pub container: String,
    pub detail: String,
    pub application: Option<String>,
}

impl Default for Fields {
    fn default() -> Self {
        Self {
            timestamp: None,
            actor: UNKNOWN_ACTOR.to_string(),
            action: UNKNOWN_ACTION.to_string(),
            resource: String::new(),
            container: String::new(),
            detail: String::new(),
            application: None,
        }
    }
}

impl Fields {
    /// Classify and seal the fields into an immutable record.
    pub fn into_record(self, id: usize, raw: impl Into<String>) -> AuditRecord {
        let category = crate::classify::classify(&self.action, &self.detail);
        AuditRecord {
            id,
            timestamp: self.timestamp,
            actor: self.actor,
            action: self.action,
            resource: self.resource,
            container: self.container,
            detail: self.detail,
            application: self.application,
            category,
            raw: raw.into(),
        }
    }

    /// True when neither actor nor action has moved off its placeholder.
    pub fn actor_and_action_defaulted(&self) -> bool {
        self.actor == UNKNOWN_ACTOR && self.action == UNKNOWN_ACTION
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
