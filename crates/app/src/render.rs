//! Text rendering of session state for the terminal host.

use services::{AnswerOutcome, DisplayedQuestion, QuizProgress, SessionState};

pub const LOADING: &str = "Loading...";
pub const NO_QUESTIONS: &str = "No quiz data available";

/// Heading, optional metadata line and numbered options of one question.
#[must_use]
pub fn question_lines(index: usize, question: &DisplayedQuestion) -> Vec<String> {
    let mut lines = vec![format!("Question {}: {}", index + 1, question.prompt())];

    let meta = match (question.category(), question.difficulty()) {
        (Some(category), Some(difficulty)) => Some(format!("{category} ({difficulty})")),
        (Some(category), None) => Some(category.to_string()),
        (None, Some(difficulty)) => Some(format!("({difficulty})")),
        (None, None) => None,
    };
    if let Some(meta) = meta {
        lines.push(format!("  {meta}"));
    }

    lines.extend(
        question
            .options()
            .iter()
            .enumerate()
            .map(|(i, option)| format!("  {}. {option}", i + 1)),
    );
    lines
}

#[must_use]
pub fn feedback(outcome: &AnswerOutcome) -> String {
    if outcome.is_correct {
        "Correct!".to_string()
    } else {
        format!("Wrong! The correct answer is {}", outcome.correct_answer)
    }
}

#[must_use]
pub fn score_line(progress: &QuizProgress) -> String {
    let mut line = format!("Score: {}/{}", progress.correct, progress.total);
    if progress.remaining > 0 {
        line.push_str(&format!(" ({} unanswered)", progress.remaining));
    }
    line
}

/// One-line status for a state; `None` when the quiz is ready to be asked.
#[must_use]
pub fn status_line(state: &SessionState) -> Option<&str> {
    match state {
        SessionState::Loading => Some(LOADING),
        SessionState::Error(message) => Some(message.as_str()),
        SessionState::Ready(quiz) if quiz.is_empty() => Some(NO_QUESTIONS),
        SessionState::Ready(_) => None,
    }
}

/// Parse a 1-based option number typed by the user.
#[must_use]
pub fn parse_choice(input: &str, option_count: usize) -> Option<usize> {
    let choice: usize = input.trim().parse().ok()?;
    (1..=option_count).contains(&choice).then(|| choice - 1)
}
