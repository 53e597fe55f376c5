//! Engine: one synchronous pass from raw text to sorted records.
//!
//! ```text
//! content ──► header Layout ──► rows ──► Extractor ──► records ──► sort
//!                                 │ positional / heuristic
//! ```
//!
//! The engine holds no mutable state. A parse never fails: rows that yield
//! nothing useful become defaulted records, so the record count always equals
//! the number of non-blank data rows.

use crate::classify;
use crate::config::EngineConfig;
use crate::extract::Extractor;
use crate::layout::Layout;
use crate::observe::{ParseEvent, ParseObserver, RowMode};
use crate::summary::{sort_records, summarize_with, AuditSummary};
use crate::timestamp::leading_timestamp;
use crate::tokenizer::{split_rows, strip_wrapping_quotes, tokenize_with, Delimiter};
use crate::types::AuditRecord;
use std::sync::Arc;

/// Parse pipeline with a fixed configuration and an optional observer.
#[derive(Clone, Default)]
pub struct Engine {
    config: EngineConfig,
    observer: Option<Arc<dyn ParseObserver>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    /// Attach an observer that receives every [`ParseEvent`].
    pub fn with_observer(mut self, observer: Arc<dyn ParseObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn emit(&self, event: ParseEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
    }

    /// Parse and sort: newest first, undated records last.
    pub fn parse(&self, content: &str) -> Vec<AuditRecord> {
        let mut records = self.parse_rows(content);
        sort_records(&mut records);
        records
    }

    /// Parse, keeping records in the order their rows appeared.
    pub fn parse_rows(&self, content: &str) -> Vec<AuditRecord> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let Some((header, body)) = split_header(content) else {
            self.emit(ParseEvent::Finished {
                records: 0,
                undated: 0,
            });
            return Vec::new();
        };

        let layout = Layout::detect(header);
        self.emit(ParseEvent::LayoutDetected {
            layout: layout.name(),
            delimiter: layout.delimiter(),
            mapped_slots: match &layout {
                Layout::Columns { map, .. } => map.mapped_slots(),
                _ => 0,
            },
        });

        let extractor = Extractor::new(self.config.window, self.config.strategy);
        let quoted = layout.delimiter() == Some(Delimiter::Comma);
        let mut rows: Vec<&str> = Vec::new();
        if self.header_is_data(&layout, header) {
            rows.push(header);
        }
        rows.extend(split_rows(body, quoted));

        let mut records = Vec::with_capacity(rows.len());
        for row in rows.into_iter().filter(|r| !r.trim().is_empty()) {
            let id = records.len();
            let (record, mode) = match &layout {
                Layout::Columns {
                    delimiter,
                    map,
                    width,
                } => {
                    let values = tokenize_with(row, *delimiter);
                    if *width > 1 && values.len() == 1 {
                        self.emit(ParseEvent::RowFellBack { id });
                        (extractor.heuristic(row, id), RowMode::Heuristic)
                    } else {
                        (extractor.positional(map, &values, row, id), RowMode::Positional)
                    }
                }
                Layout::SingleColumn | Layout::Headerless { .. } => {
                    (extractor.heuristic(row, id), RowMode::Heuristic)
                }
            };
            let Some(record) = record else { continue };

            self.emit(ParseEvent::RowParsed { id, mode });
            if record.timestamp.is_none() {
                self.emit(ParseEvent::TimestampMissing { id });
            }
            if record.is_defaulted() {
                self.emit(ParseEvent::RowDefaulted { id });
            }
            records.push(record);
        }

        self.emit(ParseEvent::Finished {
            records: records.len(),
            undated: records.iter().filter(|r| r.timestamp.is_none()).count(),
        });
        records
    }

    /// Headerless files start with data. A single-column file does too when
    /// its first line opens with a timestamp.
    fn header_is_data(&self, layout: &Layout, header: &str) -> bool {
        match layout {
            Layout::Headerless { .. } => true,
            Layout::SingleColumn => {
                let trimmed = header.trim();
                let line = strip_wrapping_quotes(trimmed).unwrap_or(trimmed);
                leading_timestamp(line, self.config.window).is_some()
            }
            Layout::Columns { .. } => false,
        }
    }

    /// Summary with this engine's ranking caps and year window.
    pub fn summarize(&self, records: &[AuditRecord]) -> AuditSummary {
        summarize_with(records, &self.config.summary)
    }

    /// Priority-review subset under this engine's cap.
    pub fn key_events<'a>(&self, records: &'a [AuditRecord]) -> Vec<&'a AuditRecord> {
        classify::key_events(records, self.config.key_event_limit)
    }
}

/// First non-blank line, and everything after it.
fn split_header(content: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let next = offset + line.len();
        if !line.trim().is_empty() {
            let header = line.trim_end_matches(['\r', '\n']);
            return Some((header, &content[next..]));
        }
        offset = next;
    }
    None
}

/// Parse with the default configuration. Records come back sorted.
pub fn parse(content: &str) -> Vec<AuditRecord> {
    Engine::default().parse(content)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
