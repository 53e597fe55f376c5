//! CSV export of normalised records.
//!
//! Written with `csv::Writer` using minimal quoting: fields containing a
//! comma, quote, or line break are wrapped in double quotes with embedded
//! quotes doubled, so the output re-imports through the tokenizer's comma
//! mode unchanged.

use crate::types::{AuditRecord, Category};

/// Column header of every export.
pub const CSV_HEADER: &str = "Timestamp,Category,Action,User,Document,Folder,Details";

/// Rendering of an absent timestamp.
pub const MISSING_TIMESTAMP: &str = "N/A";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn write_csv<F>(records: &[AuditRecord], label: F) -> csv::Result<Vec<u8>>
where
    F: Fn(Category) -> String,
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER.split(','))?;
    for record in records {
        let timestamp = record
            .timestamp
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| MISSING_TIMESTAMP.to_string());
        writer.write_record([
            timestamp.as_str(),
            label(record.category).as_str(),
            record.action.as_str(),
            record.actor.as_str(),
            record.resource.as_str(),
            record.container.as_str(),
            record.detail.as_str(),
        ])?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Render `records` in the given order, labelling categories with `label`.
/// Rows are separated by `\n` with no trailing line break.
pub fn export_csv<F>(records: &[AuditRecord], label: F) -> String
where
    F: Fn(Category) -> String,
{
    let bytes = write_csv(records, label).expect("writing CSV into memory cannot fail");
    let mut out = String::from_utf8(bytes).expect("CSV built from UTF-8 fields is UTF-8");
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

/// Export with [`Category::label`] as the category column.
pub fn export_csv_labelled(records: &[AuditRecord]) -> String {
    export_csv(records, |c| c.label().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
