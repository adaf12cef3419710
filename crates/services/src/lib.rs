#![forbid(unsafe_code)]

pub mod backoff;
pub mod config;
pub mod error;
pub mod session;

pub use backoff::BackoffPolicy;
pub use config::SessionConfig;
pub use error::SessionError;
pub use session::{QuizSession, fetch_with_backoff};

pub use quiz_core::{AnswerOutcome, DisplayedQuestion, Quiz, QuizProgress, SessionState};
