use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Reasons a selection is refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    #[error("session is not ready for answers")]
    NotReady,
    #[error("question index {index} is out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("question {index} already has a selection")]
    AlreadyAnswered { index: usize },
    #[error("selected answer must not be empty")]
    EmptyAnswer,
}

/// Result of recording a selection for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub index: usize,
    pub selected: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Write-once map from question index to the selected answer text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionRecord(BTreeMap<usize, String>);

impl SelectionRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    #[must_use]
    pub fn is_answered(&self, index: usize) -> bool {
        self.0.contains_key(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(index, answer)| (*index, answer.as_str()))
    }

    /// Record the first selection for `index`.
    ///
    /// Range checking is the caller's job; this only enforces write-once.
    pub(crate) fn insert_once(
        &mut self,
        index: usize,
        answer: String,
    ) -> Result<(), SelectionError> {
        if self.is_answered(index) {
            return Err(SelectionError::AlreadyAnswered { index });
        }
        self.0.insert(index, answer);
        Ok(())
    }
}
