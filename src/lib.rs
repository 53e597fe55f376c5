//! trailsift: normalise and triage document-management audit trails.
//!
//! The engine lives in `trailsift-core` and the optional remote completion
//! path in `trailsift-remote`; both are re-exported here so integration tests
//! and the binary import a single crate. This crate adds the plain-text
//! [`report`] rendering used by the CLI.
//!
//! # Architecture
//!
//! ```text
//! Tokenizer ──► Extractor ──► Classifier ──► Aggregator ──► report / CSV
//!                                                ▲
//!                    remote completion ──► repair┘
//! ```

pub mod report;

pub use trailsift_core as core;
pub use trailsift_remote as remote;

pub use trailsift_core::{
    export_csv, export_csv_labelled, parse, summarize, AuditRecord, AuditSummary, Category,
    Config, Engine,
};
