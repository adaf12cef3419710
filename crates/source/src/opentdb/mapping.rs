use quiz_core::{Question, QuestionError};
use serde::Deserialize;

/// Body returned by `api.php`.
///
/// `results` may be missing or null; both mean "no questions".
/// `response_code` is informational only, so any integer is accepted.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    pub response_code: Option<i64>,
    #[serde(default)]
    pub results: Option<Vec<ApiQuestion>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiQuestion {
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl ApiQuestion {
    fn into_question(self) -> Result<Question, QuestionError> {
        let mut question =
            Question::new(self.question, self.correct_answer, self.incorrect_answers)?;
        if let Some(category) = self.category {
            question = question.with_category(category);
        }
        if let Some(difficulty) = self.difficulty {
            question = question.with_difficulty(difficulty);
        }
        Ok(question)
    }
}

impl ApiResponse {
    /// Convert the usable items, skipping any without a prompt or correct answer.
    pub(crate) fn into_questions(self) -> Vec<Question> {
        self.results
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(position, item)| match item.into_question() {
                Ok(question) => Some(question),
                Err(err) => {
                    tracing::warn!(position, error = %err, "skipping unusable trivia item");
                    None
                }
            })
            .collect()
    }
}
