use async_trait::async_trait;
use quiz_core::Question;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by question sources.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceError {
    #[error("too many requests")]
    RateLimited,

    #[error("request failed with status {0}")]
    HttpStatus(u16),

    #[error("{0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Rate limiting is the only condition worth retrying.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SourceError::RateLimited)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a single batch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriviaQuery {
    pub amount: u8,
    pub category: u32,
    pub difficulty: Difficulty,
}

impl TriviaQuery {
    pub const DEFAULT_AMOUNT: u8 = 10;
    pub const DEFAULT_CATEGORY: u32 = 17;

    /// Query-string pairs in the order the API documents them.
    #[must_use]
    pub fn to_params(&self) -> [(&'static str, String); 3] {
        [
            ("amount", self.amount.to_string()),
            ("category", self.category.to_string()),
            ("difficulty", self.difficulty.as_str().to_owned()),
        ]
    }
}

/// Ten easy questions from category 17 (Science & Nature).
impl Default for TriviaQuery {
    fn default() -> Self {
        Self {
            amount: Self::DEFAULT_AMOUNT,
            category: Self::DEFAULT_CATEGORY,
            difficulty: Difficulty::Easy,
        }
    }
}

/// Source contract for trivia batches.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch one batch of questions.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::RateLimited` on HTTP 429, `SourceError::HttpStatus`
    /// for other non-success statuses, and `SourceError::Network` or
    /// `SourceError::Malformed` when no usable body was received.
    async fn fetch(&self, query: &TriviaQuery) -> Result<Vec<Question>, SourceError>;
}

type Scripted = Result<Vec<Question>, SourceError>;

/// In-memory source replaying a scripted sequence of responses.
///
/// Once the script runs out every further call fails with a network error.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    queries: Arc<Mutex<Vec<TriviaQuery>>>,
}

impl ScriptedSource {
    #[must_use]
    pub fn new(responses: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().collect())),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of fetches served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.queries.lock().map(|guard| guard.len()).unwrap_or_default()
    }

    /// Queries received so far, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<TriviaQuery> {
        self.queries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuestionSource for ScriptedSource {
    async fn fetch(&self, query: &TriviaQuery) -> Result<Vec<Question>, SourceError> {
        self.queries
            .lock()
            .map_err(|e| SourceError::Network(e.to_string()))?
            .push(*query);
        let mut guard = self
            .responses
            .lock()
            .map_err(|e| SourceError::Network(e.to_string()))?;
        guard
            .pop_front()
            .unwrap_or_else(|| Err(SourceError::Network("no scripted response left".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_matches_fixed_batch() {
        let query = TriviaQuery::default();
        assert_eq!(
            query.to_params(),
            [
                ("amount", "10".to_string()),
                ("category", "17".to_string()),
                ("difficulty", "easy".to_string()),
            ]
        );
    }

    #[test]
    fn only_rate_limit_is_retryable() {
        assert!(SourceError::RateLimited.is_rate_limited());
        assert!(!SourceError::HttpStatus(500).is_rate_limited());
        assert!(!SourceError::Network("reset".into()).is_rate_limited());
    }

    #[tokio::test]
    async fn scripted_source_replays_in_order() {
        let question = Question::new("Q", "A", ["B"]).unwrap();
        let source = ScriptedSource::new([
            Err(SourceError::RateLimited),
            Ok(vec![question.clone()]),
        ]);
        let query = TriviaQuery::default();

        assert_eq!(source.fetch(&query).await, Err(SourceError::RateLimited));
        assert_eq!(source.fetch(&query).await, Ok(vec![question]));
        assert!(matches!(
            source.fetch(&query).await,
            Err(SourceError::Network(_))
        ));
        assert_eq!(source.calls(), 3);
        assert_eq!(source.queries(), vec![query; 3]);
    }
}
