//! Test builders: ergonomic constructors for `AuditRecord`.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chrono::{DateTime, TimeZone, Utc};
use trailsift_core::types::{AuditRecord, Category, Fields};

/// UTC instant from calendar parts. Panics on an invalid date.
pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

// ---------------------------------------------------------------------------
// AuditRecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`AuditRecord`] test fixtures. The category is derived
/// from action and detail the same way the engine derives it, unless
/// [`AuditRecordBuilder::category`] pins one.
///
/// # Example
///
/// ```rust
/// let record = AuditRecordBuilder::new(3)
///     .at(utc(2025, 1, 15, 10, 30, 0))
///     .actor("john.doe")
///     .action("File Deleted")
///     .resource("report.pdf")
///     .build();
/// ```
pub struct AuditRecordBuilder {
    id: usize,
    fields: Fields,
    category: Option<Category>,
    raw: String,
}

impl AuditRecordBuilder {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            fields: Fields::default(),
            category: None,
            raw: String::new(),
        }
    }

    pub fn at(mut self, ts: DateTime<Utc>) -> Self {
        self.fields.timestamp = Some(ts);
        self
    }

    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.fields.actor = actor.into();
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.fields.action = action.into();
        self
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.fields.resource = resource.into();
        self
    }

    pub fn container(mut self, container: impl Into<String>) -> Self {
        self.fields.container = container.into();
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.fields.detail = detail.into();
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    pub fn build(self) -> AuditRecord {
        let mut record = self.fields.into_record(self.id, self.raw);
        if let Some(category) = self.category {
            record.category = category;
        }
        record
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// A dated record with the given actor and action.
pub fn dated(id: usize, ts: DateTime<Utc>, actor: &str, action: &str) -> AuditRecord {
    AuditRecordBuilder::new(id).at(ts).actor(actor).action(action).build()
}

/// An undated record with the given actor and action.
pub fn undated(id: usize, actor: &str, action: &str) -> AuditRecord {
    AuditRecordBuilder::new(id).actor(actor).action(action).build()
}
