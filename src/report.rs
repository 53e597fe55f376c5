//! Plain-text rendering of summaries and record tables for the terminal.

use trailsift_core::export::MISSING_TIMESTAMP;
use trailsift_core::summary::{AuditSummary, Frequency};
use trailsift_core::types::{AuditRecord, Category};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `(heading, width)` of each record table column. The last column is not
/// padded.
const COLUMNS: &[(&str, usize)] = &[
    ("Timestamp", 19),
    ("Category", 16),
    ("Action", 22),
    ("User", 20),
    ("Document", 28),
    ("Folder", 0),
];

fn timestamp_cell(record: &AuditRecord) -> String {
    record
        .timestamp
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| MISSING_TIMESTAMP.to_string())
}

/// Cut `value` to `width` characters, marking the cut with `…`.
fn fit(value: &str, width: usize) -> String {
    let value = value.replace(['\n', '\r'], " ");
    if width == 0 || value.chars().count() <= width {
        return value;
    }
    let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn table_row(cells: &[String]) -> String {
    let line = cells
        .iter()
        .zip(COLUMNS)
        .map(|(cell, (_, width))| {
            let cell = fit(cell, *width);
            format!("{cell:<width$}", width = *width)
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

/// One line per record under a heading row.
pub fn render_records<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a AuditRecord>,
{
    let heading: Vec<String> = COLUMNS.iter().map(|(name, _)| name.to_string()).collect();
    let mut lines = vec![table_row(&heading)];
    for record in records {
        lines.push(table_row(&[
            timestamp_cell(record),
            record.category.label().to_string(),
            record.action.clone(),
            record.actor.clone(),
            record.resource.clone(),
            record.container.clone(),
        ]));
    }
    lines.join("\n")
}

fn ranked(title: &str, table: &[Frequency]) -> Vec<String> {
    let mut lines = vec![format!("{title}:")];
    if table.is_empty() {
        lines.push("  (none)".to_string());
    }
    lines.extend(
        table
            .iter()
            .enumerate()
            .map(|(i, f)| format!("  {:>2}. {} ({})", i + 1, f.value, f.count)),
    );
    lines
}

/// Human-readable summary. `key_events` is the size of the priority-review
/// subset.
pub fn render_summary(summary: &AuditSummary, key_events: usize) -> String {
    let mut lines = vec![
        format!("Entries:    {}", summary.total_entries),
        format!("Key events: {key_events}"),
    ];

    let range = &summary.time_range;
    if range.is_sentinel() {
        lines.push("Time range: (no dated entries)".to_string());
    } else {
        lines.push(format!(
            "Time range: {} .. {}",
            range.earliest.format(TIMESTAMP_FORMAT),
            range.latest.format(TIMESTAMP_FORMAT)
        ));
    }

    lines.push(String::new());
    lines.push("Categories:".to_string());
    for category in Category::ALL {
        lines.push(format!("  {:<18}{}", category.label(), summary.count(category)));
    }

    lines.push(String::new());
    lines.extend(ranked("Top users", &summary.top_actors));
    lines.push(String::new());
    lines.extend(ranked("Top documents", &summary.top_resources));
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
