//! Tokenizer: splits raw text into logical rows and rows into field values.
//!
//! Delimiter selection, in priority order:
//!
//! | Row contains | Strategy |
//! |--------------|----------|
//! | a tab | split on tabs, trim each segment |
//! | a comma | quote-aware comma split |
//! | neither | runs of 2+ whitespace, or single runs if that yields < 5 fields |

use regex::Regex;
use std::sync::LazyLock;

static WIDE_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

/// Fewest fields a wide-gap split must produce before it is trusted over a
/// plain whitespace split.
const MIN_WIDE_GAP_FIELDS: usize = 5;

/// How a row is split into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Tab,
    Comma,
    Whitespace,
}

impl Delimiter {
    /// Pick the delimiter for `row` by priority: tab, comma, whitespace.
    pub fn detect(row: &str) -> Self {
        if row.contains('\t') {
            Delimiter::Tab
        } else if row.contains(',') {
            Delimiter::Comma
        } else {
            Delimiter::Whitespace
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delimiter::Tab => write!(f, "tab"),
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Whitespace => write!(f, "whitespace"),
        }
    }
}

/// Split a row using the delimiter detected from the row itself.
pub fn tokenize_row(row: &str) -> Vec<String> {
    tokenize_with(row, Delimiter::detect(row))
}

/// Split a row with a fixed delimiter.
pub fn tokenize_with(row: &str, delimiter: Delimiter) -> Vec<String> {
    match delimiter {
        Delimiter::Tab => row.split('\t').map(|s| s.trim().to_string()).collect(),
        Delimiter::Comma => split_quoted(row),
        Delimiter::Whitespace => split_whitespace(row),
    }
}

fn split_whitespace(row: &str) -> Vec<String> {
    let trimmed = row.trim();
    if trimmed.is_empty() {
        return vec![String::new()];
    }
    let wide: Vec<String> = WIDE_GAP.split(trimmed).map(str::to_string).collect();
    if wide.len() >= MIN_WIDE_GAP_FIELDS {
        wide
    } else {
        trimmed.split_whitespace().map(str::to_string).collect()
    }
}

/// Whether `row` splits into enough fields on runs of 2+ whitespace to be
/// read as an aligned table row.
pub fn is_wide_gap_row(row: &str) -> bool {
    WIDE_GAP.split(row.trim()).count() >= MIN_WIDE_GAP_FIELDS
}

/// Comma split where `"` toggles an in-quotes state. Commas inside quotes are
/// kept; a field wrapped in quotes loses them and `""` inside it collapses to
/// a single quote.
fn split_quoted(row: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in row.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(unquote(&row[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(unquote(&row[start..]));
    fields
}

fn unquote(field: &str) -> String {
    let trimmed = field.trim();
    match strip_wrapping_quotes(trimmed) {
        Some(inner) => inner.replace("\"\"", "\""),
        None => field.to_string(),
    }
}

/// Remove one layer of wrapping double quotes, if `text` has them.
pub fn strip_wrapping_quotes(text: &str) -> Option<&str> {
    (text.len() >= 2 && text.starts_with('"') && text.ends_with('"'))
        .then(|| &text[1..text.len() - 1])
}

// ---------------------------------------------------------------------------
// Logical rows
// ---------------------------------------------------------------------------

/// Split `content` into logical rows on `\n` / `\r\n`.
///
/// With `quoted` set, a line break inside an open quoted field continues the
/// current row. Only a `"` that is the first non-blank character of a field
/// opens one, and inside it only a `"` followed by a comma, a line break or
/// the end of input closes it, so a quote in the middle of a value (`12"
/// pipe`) never joins rows. If the content ends while a field is still open,
/// the unterminated tail is split on plain line breaks instead.
pub fn split_rows(content: &str, quoted: bool) -> Vec<&str> {
    if !quoted {
        return content.lines().collect();
    }

    let bytes = content.as_bytes();
    let mut rows = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' if in_quotes => {
                if bytes.get(i + 1) == Some(&b'"') {
                    i += 1;
                } else if closes_field(&bytes[i + 1..]) {
                    in_quotes = false;
                    at_field_start = false;
                }
            }
            _ if in_quotes => {}
            b'"' if at_field_start => in_quotes = true,
            b',' => at_field_start = true,
            b'\n' => {
                rows.push(content[start..i].trim_end_matches('\r'));
                start = i + 1;
                at_field_start = true;
            }
            b' ' | b'\t' | b'\r' => {}
            _ => at_field_start = false,
        }
        i += 1;
    }
    let tail = &content[start..];
    if in_quotes {
        rows.extend(tail.lines());
    } else if !tail.is_empty() {
        rows.push(tail.trim_end_matches('\r'));
    }
    rows
}

/// Whether a closing quote sits here: only blanks before a comma, a line
/// break or the end of input.
fn closes_field(rest: &[u8]) -> bool {
    match rest.iter().find(|b| !matches!(b, b' ' | b'\t')) {
        None => true,
        Some(b) => matches!(b, b',' | b'\n' | b'\r'),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
