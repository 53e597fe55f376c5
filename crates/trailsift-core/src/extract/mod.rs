//! Field extractor: turns one row into an [`AuditRecord`].
//!
//! Two modes:
//!
//! - **Positional** reads cells through a header-derived [`ColumnMap`].
//! - **Heuristic** recovers fields from free text, either with the ordered
//!   regex [`probes`] (the default) or the [`anchored`] verb-vocabulary
//!   strategy.
//!
//! Neither mode fails on odd input. Whatever cannot be recovered keeps its
//! default value and the record is still produced.

pub mod anchored;
pub mod probes;

use crate::layout::ColumnMap;
use crate::timestamp::{leading_timestamp, parse_timestamp_in, YearWindow};
use crate::tokenizer::strip_wrapping_quotes;
use crate::types::{AuditRecord, Fields, DETAIL_SEPARATOR};
use serde::Deserialize;

/// Which free-text strategy heuristic mode uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicStrategy {
    /// Ordered regex probes over the text after a leading timestamp.
    #[default]
    Probes,
    /// Date-time anchor plus a fixed action vocabulary; rows without a
    /// vocabulary verb fall back to the probes.
    Anchored,
}

impl std::str::FromStr for HeuristicStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "probes" => Ok(HeuristicStrategy::Probes),
            "anchored" => Ok(HeuristicStrategy::Anchored),
            other => Err(format!("unknown heuristic strategy: {other}")),
        }
    }
}

/// Row-to-record extraction with a fixed year window and strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    pub window: YearWindow,
    pub strategy: HeuristicStrategy,
}

impl Extractor {
    pub fn new(window: YearWindow, strategy: HeuristicStrategy) -> Self {
        Self { window, strategy }
    }

    /// Heuristic mode. `None` only for a blank row.
    pub fn heuristic(&self, raw_row: &str, ordinal: usize) -> Option<AuditRecord> {
        let trimmed = raw_row.trim();
        if trimmed.is_empty() {
            return None;
        }
        let row = strip_wrapping_quotes(trimmed).unwrap_or(trimmed);

        let fields = match self.strategy {
            HeuristicStrategy::Probes => self.probe_fields(row),
            HeuristicStrategy::Anchored => {
                anchored::extract(row, self.window).unwrap_or_else(|| self.probe_fields(row))
            }
        };
        Some(fields.into_record(ordinal, raw_row))
    }

    fn probe_fields(&self, row: &str) -> Fields {
        let (timestamp, remaining) = match leading_timestamp(row, self.window) {
            Some(found) => (Some(found.timestamp), found.rest),
            None => (None, row),
        };

        let hits = probes::run_probes(remaining);
        let mut fields = Fields {
            timestamp,
            detail: remaining.trim().to_string(),
            resource: hits.resource.unwrap_or_default(),
            container: hits.container.unwrap_or_default(),
            application: hits.application,
            ..Fields::default()
        };
        if let Some(action) = hits.action {
            fields.action = action;
        }
        if let Some(actor) = hits.actor {
            fields.actor = actor;
        }

        if fields.actor_and_action_defaulted() {
            self.comma_fallback(row, &mut fields);
        }
        fields
    }

    /// Near-CSV rows: a valid timestamp followed by at least two more comma
    /// parts are read as action, actor, resource, container, detail.
    fn comma_fallback(&self, row: &str, fields: &mut Fields) {
        let parts: Vec<&str> = row.split(',').map(str::trim).collect();
        if parts.len() < 3 {
            return;
        }
        let Some(timestamp) = parse_timestamp_in(parts[0], self.window) else {
            return;
        };
        fields.timestamp = Some(timestamp);

        let targets = [
            &mut fields.action,
            &mut fields.actor,
            &mut fields.resource,
            &mut fields.container,
        ];
        for (target, part) in targets.into_iter().zip(&parts[1..]) {
            if !part.is_empty() {
                *target = part.to_string();
            }
        }
        if parts.len() > 5 {
            let detail = parts[5..].join(", ");
            if !detail.trim().is_empty() {
                fields.detail = detail;
            }
        }
    }

    /// Positional mode. `None` only when the row is empty after trimming.
    pub fn positional(
        &self,
        map: &ColumnMap,
        values: &[String],
        raw_row: &str,
        ordinal: usize,
    ) -> Option<AuditRecord> {
        if raw_row.trim().is_empty() {
            return None;
        }
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| values.get(i))
                .map(|v| v.trim())
                .unwrap_or("")
        };
        let present = |value: &str| (!value.is_empty()).then(|| value.to_string());

        let mut fields = Fields {
            timestamp: parse_timestamp_in(cell(map.timestamp), self.window),
            resource: cell(map.resource).to_string(),
            container: cell(map.container).to_string(),
            detail: map
                .detail
                .iter()
                .map(|i| cell(Some(*i)))
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
                .join(DETAIL_SEPARATOR),
            application: present(cell(map.application)),
            ..Fields::default()
        };
        if let Some(actor) = present(cell(map.actor)) {
            fields.actor = actor;
        }
        if let Some(action) = present(cell(map.action)) {
            fields.action = action;
        }
        Some(fields.into_record(ordinal, raw_row))
    }
}

/// Heuristic extraction with the default window and probe strategy.
pub fn extract_fields(raw_row: &str, ordinal: usize) -> Option<AuditRecord> {
    Extractor::default().heuristic(raw_row, ordinal)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
