//! Header layout detection and header-to-field mapping.
//!
//! The header row decides two things for the whole file: the delimiter, and
//! whether rows can be read positionally at all. A file whose header yields a
//! single meaningful field is *single-column* and every data row goes through
//! heuristic extraction instead.

use crate::tokenizer::{is_wide_gap_row, tokenize_with, Delimiter};

/// Record field a header column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSlot {
    Timestamp,
    Action,
    Actor,
    Resource,
    Container,
    Detail,
    Application,
}

/// Keyword sets, checked in order. A header maps to the first slot with a
/// keyword contained in its lower-cased text.
const SLOT_KEYWORDS: &[(FieldSlot, &[&str])] = &[
    (FieldSlot::Timestamp, &["date", "time", "timestamp"]),
    (FieldSlot::Action, &["action", "event", "operation"]),
    (FieldSlot::Actor, &["user", "person", "who"]),
    (FieldSlot::Resource, &["document", "file", "name"]),
    (FieldSlot::Container, &["folder", "path", "location"]),
    (FieldSlot::Detail, &["detail", "comment", "description", "additional"]),
    (FieldSlot::Application, &["application", "app", "program"]),
];

/// Map one header token to a field slot.
pub fn slot_for_header(header: &str) -> Option<FieldSlot> {
    let lower = header.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    SLOT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(slot, _)| *slot)
}

/// Column index for each field slot, derived from a header row.
///
/// Single-valued slots keep the first column that claims them. The detail
/// slot collects every column that maps to it, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub timestamp: Option<usize>,
    pub action: Option<usize>,
    pub actor: Option<usize>,
    pub resource: Option<usize>,
    pub container: Option<usize>,
    pub detail: Vec<usize>,
    pub application: Option<usize>,
}

impl ColumnMap {
    /// Build the map from already-tokenized header fields.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut map = ColumnMap::default();
        for (index, header) in headers.iter().enumerate() {
            let Some(slot) = slot_for_header(header.as_ref()) else {
                continue;
            };
            let target = match slot {
                FieldSlot::Detail => {
                    map.detail.push(index);
                    continue;
                }
                FieldSlot::Timestamp => &mut map.timestamp,
                FieldSlot::Action => &mut map.action,
                FieldSlot::Actor => &mut map.actor,
                FieldSlot::Resource => &mut map.resource,
                FieldSlot::Container => &mut map.container,
                FieldSlot::Application => &mut map.application,
            };
            target.get_or_insert(index);
        }
        map
    }

    /// True when no header matched any slot.
    pub fn is_empty(&self) -> bool {
        self.mapped_slots() == 0
    }

    /// Number of slots with at least one column.
    pub fn mapped_slots(&self) -> usize {
        [
            self.timestamp,
            self.action,
            self.actor,
            self.resource,
            self.container,
            self.application,
        ]
        .iter()
        .filter(|slot| slot.is_some())
        .count()
            + usize::from(!self.detail.is_empty())
    }
}

/// The shape of a file, decided once from its header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// One meaningful column: rows are free text.
    SingleColumn,
    /// Delimited columns with a usable header mapping.
    Columns {
        delimiter: Delimiter,
        map: ColumnMap,
        width: usize,
    },
    /// Delimited, but no header keyword matched. The first row is data and
    /// every row is read heuristically.
    Headerless { delimiter: Delimiter },
}

impl Layout {
    /// Inspect the header row. A header with neither tabs nor commas only
    /// counts as delimited when it is a wide-gap aligned row.
    pub fn detect(header: &str) -> Self {
        let delimiter = Delimiter::detect(header);
        if delimiter == Delimiter::Whitespace && !is_wide_gap_row(header) {
            return Layout::SingleColumn;
        }
        let fields = tokenize_with(header, delimiter);
        let single = fields.len() <= 1 || fields[1..].iter().all(|f| f.trim().is_empty());
        if single {
            return Layout::SingleColumn;
        }
        let map = ColumnMap::from_headers(&fields);
        if map.is_empty() {
            return Layout::Headerless { delimiter };
        }
        Layout::Columns {
            delimiter,
            map,
            width: fields.len(),
        }
    }

    /// Delimiter rows are split with, if rows are split at all.
    pub fn delimiter(&self) -> Option<Delimiter> {
        match self {
            Layout::SingleColumn => None,
            Layout::Columns { delimiter, .. } | Layout::Headerless { delimiter } => {
                Some(*delimiter)
            }
        }
    }

    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Layout::SingleColumn => "single-column",
            Layout::Columns { .. } => "columns",
            Layout::Headerless { .. } => "headerless",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
