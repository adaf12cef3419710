//! Shared error types for the services crate.

use thiserror::Error;

use quiz_source::SourceError;
use tokio::runtime::TryCurrentError;

/// Errors emitted by quiz sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session already started")]
    AlreadyStarted,
    #[error("request failed with status 429 after {retries} retries")]
    RetriesExhausted { retries: u32 },
    #[error("no async runtime available: {0}")]
    NoRuntime(#[from] TryCurrentError),
    #[error(transparent)]
    Source(#[from] SourceError),
}
