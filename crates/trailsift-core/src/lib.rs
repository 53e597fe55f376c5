//! trailsift-core: audit-trail parsing, classification and summary engine.
//!
//! This crate exposes each pipeline stage as a public module, plus the shared
//! record types used across all of them.
//!
//! # Architecture
//!
//! ```text
//! Tokenizer ──► Extractor ──► Classifier ──► Aggregator
//!     │             │                            │
//!  Layout      Timestamp                       Export
//! ```
//!
//! Everything is synchronous and free of shared mutable state. [`Engine`]
//! wires the stages together; [`parse`], [`summarize`] and [`export_csv`]
//! are the default-configured entry points.

pub mod classify;
pub mod config;
pub mod engine;
pub mod export;
pub mod extract;
pub mod layout;
pub mod observe;
pub mod summary;
pub mod timestamp;
pub mod tokenizer;
pub mod types;

pub use classify::{classify, is_key_event, key_events};
pub use config::{Config, ConfigError, EngineConfig};
pub use engine::{parse, Engine};
pub use export::{export_csv, export_csv_labelled};
pub use extract::{extract_fields, HeuristicStrategy};
pub use observe::{ParseEvent, ParseObserver, TracingObserver};
pub use summary::{sort_records, summarize, AuditSummary, Frequency, TimeRange};
pub use timestamp::{parse_timestamp, YearWindow};
pub use tokenizer::tokenize_row;
pub use types::{AuditRecord, Category};
