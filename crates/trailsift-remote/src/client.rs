//! Remote parser: prompt, complete, repair, summarise.

use crate::error::RemoteError;
use crate::prompt::build_prompt;
use crate::repair::repair;
use crate::transport::CompletionTransport;
use serde_json::Value;
use trailsift_core::config::EngineConfig;
use trailsift_core::summary::{sort_records, summarize_with, AuditSummary, SummaryOptions};
use trailsift_core::timestamp::YearWindow;
use trailsift_core::types::AuditRecord;

/// Outcome of a remote parse. `summary` is always computed locally from
/// `records`; whatever the service claimed is kept in `reported_statistics`
/// for comparison only.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteParse {
    pub records: Vec<AuditRecord>,
    pub summary: AuditSummary,
    pub reported_statistics: Option<Value>,
}

/// Parses audit trails through a [`CompletionTransport`].
#[derive(Debug, Clone)]
pub struct RemoteParser<T> {
    transport: T,
    window: YearWindow,
    summary: SummaryOptions,
}

impl<T: CompletionTransport> RemoteParser<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            window: YearWindow::default(),
            summary: SummaryOptions::default(),
        }
    }

    /// Use the engine's year window and ranking caps.
    pub fn with_engine_config(mut self, config: &EngineConfig) -> Self {
        self.window = config.window;
        self.summary = config.summary;
        self
    }

    /// Blank content is answered locally without a request. Records come
    /// back in the same order `trailsift_core::parse` uses.
    pub async fn parse(&self, content: &str) -> Result<RemoteParse, RemoteError> {
        if content.trim().is_empty() {
            return Ok(RemoteParse {
                records: Vec::new(),
                summary: summarize_with(&[], &self.summary),
                reported_statistics: None,
            });
        }

        let completion = self.transport.complete(&build_prompt(content)).await?;
        let repaired = repair(&completion, self.window)?;
        tracing::debug!(records = repaired.records.len(), "completion repaired");

        let mut records = repaired.records;
        sort_records(&mut records);
        let summary = summarize_with(&records, &self.summary);
        Ok(RemoteParse {
            records,
            summary,
            reported_statistics: repaired.reported_statistics,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
