//! Static audit-trail corpora used across harnesses.
//!
//! Each corpus is a complete file body as a document-management system would
//! export it. `corpus_high_volume` builds a larger CSV export for throughput
//! paths.

use std::path::{Path, PathBuf};

/// Standard comma-separated export with a full header.
pub const CSV_STANDARD: &str = "\
Date,Action,User,Document,Folder,Details
2025-01-15 10:30:00,File Deleted,john.doe,report.pdf,/proj/docs,Permanently removed
2025-01-16 09:00:00,Checked Out,amy.lee,plan.dwg,/proj/cad,
2025-01-16 17:45:00,Checked In,amy.lee,plan.dwg,/proj/cad,Revision B
2025-01-17 08:15:00,Checked Out,bo.chan,site.dwg,/proj/cad,
2025-01-17 11:00:00,Login,john.doe,,,Signed in from VPN
2025-01-18 12:00:00,Document Not Found,svc.sync,old.xlsx,/proj/archive,Sync job could not find file
";

/// Single-column free text, one event per line, behind a title line.
pub const SINGLE_COLUMN: &str = "\
ProjectWise Audit Trail
6/3/2025 3:54:15 PM Freed by Calum.Kay in /60650514/CAD
6/3/2025 4:02:00 PM Deleted by Calum.Kay from /60650514/CAD file: bridge.dgn
6/4/2025 9:10:30 AM user: mia.r Exported document: survey.pdf to /exports
";

/// Tab-separated export with comments and a source application column.
pub const TAB_EXPORT: &str = "\
Event Time\tOperation\tUser Name\tFile\tLocation\tComments\tApplication
2024-11-02T08:00:00Z\tModified\tkay.w\tspec.docx\t/eng/specs\tminor edits\tWord
2024-11-02T09:30:00Z\tMoved\tkay.w\tspec.docx\t/eng/archive\t\t
2024-11-03T10:00:00Z\tRestart\tsystem\t\t\tnightly\tScheduler
";

/// Messy comma export: BOM, CRLF, blank lines, quoted commas and quotes,
/// an undated row and a row that lost its delimiters.
pub const CSV_MESSY: &str = "\u{feff}Date,Action,User,Document,Folder,Details\r\n\
\r\n\
2025-02-01 14:00:00,Moved,\"Lee, Sam\",\"Q1, final.xlsx\",/fin,\"said \"\"ok\"\"\"\r\n\
notadate,Unknown,bob,,,\r\n\
   \r\n\
2/3/2025 8:05 AM Deleted by ops.bot\r\n";

/// Comma-delimited file with no header row.
pub const HEADERLESS: &str = "\
2025-03-01 10:00:00,Deleted by amy in /a
2025-03-01 11:00:00,Copied by bo to /b
";

/// Count non-blank lines after the first non-blank (header) line.
pub fn data_rows(content: &str) -> usize {
    content
        .lines()
        .filter(|l| !l.trim().trim_start_matches('\u{feff}').is_empty())
        .count()
        .saturating_sub(1)
}

/// A CSV export of `rows` events spread over actors, resources and actions.
pub fn corpus_high_volume(rows: usize) -> String {
    const ACTIONS: &[&str] = &[
        "Checked Out",
        "Checked In",
        "Modified",
        "Viewed",
        "Deleted",
        "Moved",
        "Login",
        "Exported",
    ];
    let mut out = String::from("Date,Action,User,Document,Folder,Details\n");
    for i in 0..rows {
        out.push_str(&format!(
            "2024-{:02}-{:02} {:02}:{:02}:{:02},{},user{},doc{}.pdf,/proj/{},row {}\n",
            i % 12 + 1,
            i % 28 + 1,
            i / 3600 % 24,
            i / 60 % 60,
            i % 60,
            ACTIONS[i % ACTIONS.len()],
            i % 17,
            i % 101,
            i % 7,
            i,
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// Fixture file helpers
// ---------------------------------------------------------------------------

/// Write `content` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
