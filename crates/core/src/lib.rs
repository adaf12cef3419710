#![forbid(unsafe_code)]

pub mod model;
pub mod text;

pub use model::{
    AnswerOutcome, DisplayedQuestion, Question, QuestionError, Quiz, QuizProgress,
    SelectionError, SelectionRecord, SessionState,
};
