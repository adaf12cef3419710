mod displayed;
mod question;
mod selection;
mod state;

pub use displayed::DisplayedQuestion;
pub use question::{Question, QuestionError};
pub use selection::{AnswerOutcome, SelectionError, SelectionRecord};
pub use state::{Quiz, QuizProgress, SessionState};
