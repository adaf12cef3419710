mod fetch;
mod service;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use fetch::fetch_with_backoff;
pub use service::QuizSession;
