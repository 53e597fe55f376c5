//! Timestamp normaliser: turns a candidate string into a validated instant.
//!
//! Parsing runs in two phases:
//!
//! 1. **Direct**: RFC 3339, RFC 2822 and the `T`-separated ISO family,
//!    plus bare dates.
//! 2. **Grammars**: an ordered list of explicit shapes. Each grammar first
//!    confirms the candidate's shape with an anchored regex, then builds the
//!    instant from the captures.
//!
//! Either phase only succeeds when the resulting calendar year falls inside
//! the configured [`YearWindow`]. Values without a zone are read as UTC so
//! the result never depends on the host's local zone.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Inclusive range of calendar years a parsed timestamp must fall inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for YearWindow {
    fn default() -> Self {
        Self {
            min_year: 2000,
            max_year: 2099,
        }
    }
}

impl YearWindow {
    pub fn new(min_year: i32, max_year: i32) -> Self {
        Self { min_year, max_year }
    }

    /// True when `ts` falls inside the window.
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        (self.min_year..=self.max_year).contains(&ts.year())
    }

    fn accept(&self, ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.contains(&ts).then_some(ts)
    }
}

// ---------------------------------------------------------------------------
// Grammars
// ---------------------------------------------------------------------------

/// One explicit date-time shape.
struct Grammar {
    name: &'static str,
    /// Shape anchored at both ends, used to validate a whole candidate.
    full: Regex,
    /// Shape anchored at the start only, used to consume a row prefix.
    prefix: Regex,
    build: fn(&Captures<'_>) -> Option<NaiveDateTime>,
}

impl Grammar {
    fn new(
        name: &'static str,
        body: &str,
        build: fn(&Captures<'_>) -> Option<NaiveDateTime>,
    ) -> Self {
        Self {
            name,
            full: Regex::new(&format!(r"^(?:{body})$")).expect("valid timestamp grammar"),
            prefix: Regex::new(&format!(r"^(?:{body})")).expect("valid timestamp grammar"),
            build,
        }
    }
}

const SPACE_SEPARATED: &str =
    r"(\d{4})-(\d{2})-(\d{2}) (\d{2}):(\d{2}):(\d{2})(?:\.(\d{1,9}))?";
const MONTH_FIRST: &str =
    r"(\d{1,2})/(\d{1,2})/(\d{4})\s+(\d{1,2}):(\d{2})(?::(\d{2}))?(?:\s*([AaPp][Mm])\b)?";
const DAY_FIRST: &str = r"(\d{1,2})/(\d{1,2})/(\d{4})\s+(\d{1,2}):(\d{2}):(\d{2})";
const ISO_8601: &str =
    r"(\d{4})-(\d{2})-(\d{2})T(\d{2}):(\d{2}):(\d{2})(?:\.(\d{1,9}))?(Z|[+-]\d{2}:?\d{2})?";

static GRAMMARS: LazyLock<Vec<Grammar>> = LazyLock::new(|| {
    vec![
        Grammar::new("space-separated", SPACE_SEPARATED, build_ymd),
        Grammar::new("month-first", MONTH_FIRST, build_month_first),
        Grammar::new("day-first", DAY_FIRST, build_day_first),
        Grammar::new("iso-8601", ISO_8601, build_iso),
    ]
});

fn num<T: std::str::FromStr>(caps: &Captures<'_>, i: usize) -> Option<T> {
    caps.get(i)?.as_str().parse().ok()
}

/// Fractional seconds of arbitrary precision, as nanoseconds.
fn nanos(caps: &Captures<'_>, i: usize) -> u32 {
    caps.get(i)
        .map(|m| {
            let digits = m.as_str();
            let padded = format!("{digits:0<9}");
            padded[..9].parse().unwrap_or(0)
        })
        .unwrap_or(0)
}

fn build_ymd(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(num(caps, 1)?, num(caps, 2)?, num(caps, 3)?)?.and_hms_nano_opt(
        num(caps, 4)?,
        num(caps, 5)?,
        num(caps, 6)?,
        nanos(caps, 7),
    )
}

fn build_month_first(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    let mut hour: u32 = num(caps, 4)?;
    if let Some(meridiem) = caps.get(7) {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }
    let seconds = caps.get(6).map_or(Some(0), |m| m.as_str().parse().ok())?;
    NaiveDate::from_ymd_opt(num(caps, 3)?, num(caps, 1)?, num(caps, 2)?)?
        .and_hms_opt(hour, num(caps, 5)?, seconds)
}

fn build_day_first(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(num(caps, 3)?, num(caps, 2)?, num(caps, 1)?)?.and_hms_opt(
        num(caps, 4)?,
        num(caps, 5)?,
        num(caps, 6)?,
    )
}

fn build_iso(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    let local = build_ymd(caps)?;
    match caps.get(8).map(|m| m.as_str()) {
        None | Some("Z") => Some(local),
        Some(offset) => {
            let sign = if offset.starts_with('-') { -1 } else { 1 };
            let digits: String = offset[1..].chars().filter(char::is_ascii_digit).collect();
            let hours: i64 = digits.get(..2)?.parse().ok()?;
            let minutes: i64 = digits.get(2..4)?.parse().ok()?;
            let shift = chrono::Duration::minutes(sign * (hours * 60 + minutes));
            local.checked_sub_signed(shift)
        }
    }
}

// ---------------------------------------------------------------------------
// Direct parsing
// ---------------------------------------------------------------------------

fn parse_direct(candidate: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(candidate) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(candidate) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(candidate, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(candidate, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse `candidate` against the default year window.
pub fn parse_timestamp(candidate: &str) -> Option<DateTime<Utc>> {
    parse_timestamp_in(candidate, YearWindow::default())
}

/// Parse `candidate`, accepting only instants inside `window`.
pub fn parse_timestamp_in(candidate: &str, window: YearWindow) -> Option<DateTime<Utc>> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }

    if let Some(ts) = parse_direct(candidate).and_then(|ts| window.accept(ts)) {
        return Some(ts);
    }

    GRAMMARS.iter().find_map(|grammar| {
        let caps = grammar.full.captures(candidate)?;
        let ts = (grammar.build)(&caps)?.and_utc();
        window.accept(ts)
    })
}

/// A timestamp consumed from the start of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadingTimestamp<'a> {
    pub timestamp: DateTime<Utc>,
    /// Name of the grammar that matched.
    pub grammar: &'static str,
    /// The row with the timestamp prefix and any separators after it removed.
    pub rest: &'a str,
}

/// Consume a timestamp anchored at position 0 of `row`, trying each grammar
/// in order. A prefix whose shape matches but whose instant falls outside
/// `window` does not count as consumed.
pub fn leading_timestamp(row: &str, window: YearWindow) -> Option<LeadingTimestamp<'_>> {
    GRAMMARS.iter().find_map(|grammar| {
        let m = grammar.prefix.find(row)?;
        let timestamp = parse_timestamp_in(m.as_str(), window)?;
        let rest = row[m.end()..].trim_start_matches(is_separator);
        Some(LeadingTimestamp {
            timestamp,
            grammar: grammar.name,
            rest,
        })
    })
}

/// Find the first timestamp anywhere in `text`, returning it with the byte
/// range it occupied.
pub fn find_timestamp(
    text: &str,
    window: YearWindow,
) -> Option<(DateTime<Utc>, std::ops::Range<usize>)> {
    text.char_indices()
        .filter(|(i, c)| c.is_ascii_digit() && (*i == 0 || !text[..*i].ends_with(|p: char| p.is_ascii_digit())))
        .find_map(|(i, _)| {
            let found = leading_timestamp(&text[i..], window)?;
            let consumed = text.len() - i - found.rest.len();
            let matched = text[i..i + consumed].trim_end_matches(is_separator);
            Some((found.timestamp, i..i + matched.len()))
        })
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ';' | '|')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
