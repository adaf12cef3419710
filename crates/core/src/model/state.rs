use rand::Rng;
use serde::Serialize;

use crate::model::{AnswerOutcome, DisplayedQuestion, Question, SelectionError, SelectionRecord};
use crate::text::is_blank;

/// Aggregated score of a quiz, useful for hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

/// The questions of a ready session together with the selections made so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Quiz {
    questions: Vec<DisplayedQuestion>,
    selections: SelectionRecord,
}

impl Quiz {
    /// Decode and shuffle every question independently.
    #[must_use]
    pub fn from_questions<R: Rng + ?Sized>(questions: &[Question], rng: &mut R) -> Self {
        Self {
            questions: questions
                .iter()
                .map(|question| DisplayedQuestion::shuffled(question, rng))
                .collect(),
            selections: SelectionRecord::new(),
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[DisplayedQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&DisplayedQuestion> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn selections(&self) -> &SelectionRecord {
        &self.selections
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Record the selection for question `index`.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::EmptyAnswer` for blank text,
    /// `SelectionError::OutOfRange` for an unknown index and
    /// `SelectionError::AlreadyAnswered` when the question is locked.
    pub fn record(&mut self, index: usize, answer: &str) -> Result<AnswerOutcome, SelectionError> {
        if is_blank(answer) {
            return Err(SelectionError::EmptyAnswer);
        }
        let question = self.question(index).ok_or(SelectionError::OutOfRange {
            index,
            len: self.questions.len(),
        })?;
        let outcome = AnswerOutcome {
            index,
            selected: answer.to_owned(),
            correct_answer: question.correct_answer().to_owned(),
            is_correct: question.is_correct(answer),
        };

        self.selections.insert_once(index, answer.to_owned())?;
        Ok(outcome)
    }

    /// Returns whether the recorded selection for `index` was correct.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> Option<bool> {
        let selected = self.selections.get(index)?;
        self.question(index).map(|q| q.is_correct(selected))
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.questions.len();
        let answered = self.selections.len();
        let correct = self
            .selections
            .iter()
            .filter(|(index, selected)| {
                self.questions
                    .get(*index)
                    .is_some_and(|q| q.is_correct(selected))
            })
            .count();

        QuizProgress {
            total,
            answered,
            correct,
            remaining: total.saturating_sub(answered),
            is_complete: answered >= total,
        }
    }
}

/// Observable state of a quiz session. Exactly one variant holds at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Loading,
    Error(String),
    Ready(Quiz),
}

impl SessionState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready(_))
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&Quiz> {
        match self {
            SessionState::Ready(quiz) => Some(quiz),
            _ => None,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Record a selection if the state is `Ready`.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::NotReady` outside `Ready`, otherwise whatever
    /// `Quiz::record` rejects.
    pub fn select(&mut self, index: usize, answer: &str) -> Result<AnswerOutcome, SelectionError> {
        match self {
            SessionState::Ready(quiz) => quiz.record(index, answer),
            _ => Err(SelectionError::NotReady),
        }
    }
}
