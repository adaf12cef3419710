use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::model::Question;
use crate::text::decode_entities;

/// A question prepared for presentation.
///
/// All text is entity-decoded. `options` holds the correct answer and every
/// distinct incorrect answer exactly once, in shuffled order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedQuestion {
    prompt: String,
    options: Vec<String>,
    #[serde(skip)]
    correct_answer: String,
    category: Option<String>,
    difficulty: Option<String>,
}

impl DisplayedQuestion {
    /// Decode and shuffle a question using the provided RNG.
    #[must_use]
    pub fn shuffled<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Self {
        let correct_answer = decode_entities(question.correct_answer());

        let mut seen = HashSet::new();
        let mut options: Vec<String> = question
            .incorrect_answers()
            .iter()
            .map(|answer| decode_entities(answer))
            .chain(std::iter::once(correct_answer.clone()))
            .filter(|option| seen.insert(option.clone()))
            .collect();
        options.shuffle(rng);

        Self {
            prompt: decode_entities(question.prompt()),
            options,
            correct_answer,
            category: question.category().map(decode_entities),
            difficulty: question.difficulty().map(str::to_owned),
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<&str> {
        self.difficulty.as_deref()
    }

    /// Whether the given text matches the decoded correct answer.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}
