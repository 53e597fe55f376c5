//! Aggregator: folds records into an [`AuditSummary`], and the record sort
//! policy applied before presentation.

use crate::timestamp::YearWindow;
use crate::types::{AuditRecord, Category};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// How many entries the ranked tables keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    pub top_actors: usize,
    pub top_resources: usize,
    /// Only timestamps inside this window count towards the time range.
    pub window: YearWindow,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            top_actors: 10,
            top_resources: 10,
            window: YearWindow::default(),
        }
    }
}

/// One row of a ranked frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    pub value: String,
    pub count: usize,
}

/// Earliest and latest validated timestamps.
///
/// When no record carries a validated timestamp both ends hold
/// [`TimeRange::SENTINEL`], the Unix epoch. That value is a placeholder and
/// not an observed time; check [`TimeRange::is_sentinel`] before showing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

impl TimeRange {
    pub const SENTINEL: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

    pub fn sentinel() -> Self {
        Self {
            earliest: Self::SENTINEL,
            latest: Self::SENTINEL,
        }
    }

    /// True when the range was not computed from any record.
    pub fn is_sentinel(&self) -> bool {
        self.earliest == Self::SENTINEL && self.latest == Self::SENTINEL
    }
}

/// Derived statistics over a record sequence. Recompute rather than edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_entries: usize,
    /// Count for every category, zero included. Sums to `total_entries`.
    pub categories: BTreeMap<Category, usize>,
    pub top_actors: Vec<Frequency>,
    pub top_resources: Vec<Frequency>,
    pub time_range: TimeRange,
}

impl AuditSummary {
    pub fn count(&self, category: Category) -> usize {
        self.categories.get(&category).copied().unwrap_or(0)
    }
}

/// Frequency counter that remembers first-seen order for tie-breaking.
#[derive(Default)]
struct StableCounter {
    index: HashMap<String, usize>,
    entries: Vec<Frequency>,
}

impl StableCounter {
    fn add(&mut self, value: &str) {
        match self.index.get(value) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(value.to_string(), self.entries.len());
                self.entries.push(Frequency {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    /// Descending by count; `sort_by` is stable so ties keep first-seen order.
    fn top(mut self, n: usize) -> Vec<Frequency> {
        self.entries.sort_by(|a, b| b.count.cmp(&a.count));
        self.entries.truncate(n);
        self.entries
    }
}

/// Summarise with the default options.
pub fn summarize(records: &[AuditRecord]) -> AuditSummary {
    summarize_with(records, &SummaryOptions::default())
}

/// Single pass over `records`. Total for any input, empty included.
pub fn summarize_with(records: &[AuditRecord], options: &SummaryOptions) -> AuditSummary {
    let mut categories: BTreeMap<Category, usize> =
        Category::ALL.into_iter().map(|c| (c, 0)).collect();
    let mut actors = StableCounter::default();
    let mut resources = StableCounter::default();
    let mut range: Option<(DateTime<Utc>, DateTime<Utc>)> = None;

    for record in records {
        *categories.entry(record.category).or_insert(0) += 1;
        actors.add(&record.actor);
        if !record.resource.trim().is_empty() {
            resources.add(&record.resource);
        }
        if let Some(ts) = record.timestamp.filter(|ts| options.window.contains(ts)) {
            range = Some(match range {
                None => (ts, ts),
                Some((lo, hi)) => (lo.min(ts), hi.max(ts)),
            });
        }
    }

    AuditSummary {
        total_entries: records.len(),
        categories,
        top_actors: actors.top(options.top_actors),
        top_resources: resources.top(options.top_resources),
        time_range: range
            .map(|(earliest, latest)| TimeRange { earliest, latest })
            .unwrap_or_else(TimeRange::sentinel),
    }
}

/// Newest first; records without a timestamp go last in their original
/// relative order.
pub fn sort_records(records: &mut [AuditRecord]) {
    records.sort_by(|a, b| match (a.timestamp, b.timestamp) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
