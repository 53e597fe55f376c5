//! trailsift-remote: best-effort parsing through a remote text-completion
//! service.
//!
//! The service is handed the raw export and asked for a fixed JSON shape
//! (`entries` plus `statistics`). Nothing it returns is trusted as-is: the
//! JSON is cut out of whatever wrapper text surrounds it, every field is
//! defaulted and re-validated through `trailsift-core`, and the summary is
//! recomputed locally.
//!
//! ```text
//! content ──► prompt ──► CompletionTransport ──► repair ──► records + summary
//! ```

pub mod client;
pub mod error;
pub mod prompt;
pub mod repair;
pub mod transport;

pub use client::{RemoteParse, RemoteParser};
pub use error::RemoteError;
pub use transport::{CompletionTransport, HttpTransport};
