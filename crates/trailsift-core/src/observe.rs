//! Optional observation hook for the parse pipeline.
//!
//! The engine is silent unless a [`ParseObserver`] is attached. The CLI
//! attaches [`TracingObserver`], which forwards every event to `tracing`.

use crate::tokenizer::Delimiter;

/// How a row was turned into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode {
    Positional,
    Heuristic,
}

/// A structured event emitted while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    /// The header row was inspected.
    LayoutDetected {
        layout: &'static str,
        delimiter: Option<Delimiter>,
        mapped_slots: usize,
    },
    /// A data row produced a record.
    RowParsed { id: usize, mode: RowMode },
    /// A multi-column file had a row that split into a single field.
    RowFellBack { id: usize },
    /// A record carries no validated timestamp.
    TimestampMissing { id: usize },
    /// Neither actor nor action could be recovered.
    RowDefaulted { id: usize },
    /// The parse pass finished.
    Finished { records: usize, undated: usize },
}

/// Receives [`ParseEvent`]s. Implementations must be cheap; they run inline
/// with the parse.
pub trait ParseObserver: Send + Sync {
    fn on_event(&self, event: &ParseEvent);
}

impl<F> ParseObserver for F
where
    F: Fn(&ParseEvent) + Send + Sync,
{
    fn on_event(&self, event: &ParseEvent) {
        self(event)
    }
}

/// Forwards parse events to `tracing` at debug level (trace for per-row
/// events).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn on_event(&self, event: &ParseEvent) {
        match event {
            ParseEvent::LayoutDetected {
                layout,
                delimiter,
                mapped_slots,
            } => {
                tracing::debug!(layout, delimiter = ?delimiter, mapped_slots, "layout detected");
            }
            ParseEvent::RowParsed { id, mode } => {
                tracing::trace!(id, mode = ?mode, "row parsed");
            }
            ParseEvent::RowFellBack { id } => {
                tracing::debug!(id, "single-field row read heuristically");
            }
            ParseEvent::TimestampMissing { id } => {
                tracing::trace!(id, "no valid timestamp");
            }
            ParseEvent::RowDefaulted { id } => {
                tracing::debug!(id, "actor and action unrecovered");
            }
            ParseEvent::Finished { records, undated } => {
                tracing::debug!(records, undated, "parse finished");
            }
        }
    }
}
