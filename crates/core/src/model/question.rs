use serde::Serialize;
use thiserror::Error;

use crate::text::is_blank;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt must not be empty")]
    EmptyPrompt,
    #[error("correct answer must not be empty")]
    EmptyCorrectAnswer,
}

/// A trivia question as received from the upstream source.
///
/// Text is kept exactly as delivered (it may still contain HTML entities);
/// decoding happens when the question is turned into a `DisplayedQuestion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    prompt: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
    category: Option<String>,
    difficulty: Option<String>,
}

impl Question {
    /// Build a question from its prompt and answers.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` or `QuestionError::EmptyCorrectAnswer`
    /// when either text is blank.
    pub fn new(
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        incorrect_answers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let correct_answer = correct_answer.into();
        if is_blank(&prompt) {
            return Err(QuestionError::EmptyPrompt);
        }
        if is_blank(&correct_answer) {
            return Err(QuestionError::EmptyCorrectAnswer);
        }

        Ok(Self {
            prompt,
            correct_answer,
            incorrect_answers: incorrect_answers.into_iter().map(Into::into).collect(),
            category: None,
            difficulty: None,
        })
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> &[String] {
        &self.incorrect_answers
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<&str> {
        self.difficulty.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_prompt_and_answer() {
        let err = Question::new("  ", "Paris", ["London"]).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);

        let err = Question::new("Capital?", "", ["London"]).unwrap_err();
        assert_eq!(err, QuestionError::EmptyCorrectAnswer);
    }

    #[test]
    fn allows_no_incorrect_answers() {
        let question = Question::new("Is water wet?", "True", Vec::<String>::new()).unwrap();
        assert!(question.incorrect_answers().is_empty());
        assert_eq!(question.category(), None);
    }

    #[test]
    fn keeps_raw_upstream_text() {
        let question = Question::new("Who said &quot;hi&quot;?", "Me", ["You"])
            .unwrap()
            .with_category("Science &amp; Nature")
            .with_difficulty("easy");
        assert_eq!(question.prompt(), "Who said &quot;hi&quot;?");
        assert_eq!(question.category(), Some("Science &amp; Nature"));
        assert_eq!(question.difficulty(), Some("easy"));
    }
}
