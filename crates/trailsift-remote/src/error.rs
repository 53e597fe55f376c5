//! Failures of the remote completion path.
//!
//! Every variant carries its cause. A failed exchange never degrades into an
//! empty or invented record set.

use std::time::Duration;

/// Boxed transport-level cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("invalid completion endpoint {endpoint:?}: {reason}")]
    Endpoint { endpoint: String, reason: String },

    #[error("completion request failed: {0}")]
    Transport(#[source] BoxError),

    #[error("completion request timed out after {0:?}")]
    Timeout(Duration),

    #[error("completion service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion contained no JSON object")]
    NoJson,

    #[error("completion JSON is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("completion JSON has no `entries` array")]
    MissingEntries,
}

impl RemoteError {
    pub(crate) fn transport(cause: impl Into<BoxError>) -> Self {
        RemoteError::Transport(cause.into())
    }
}
