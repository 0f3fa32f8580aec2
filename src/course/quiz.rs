//! Quiz scoring.

use serde::{Deserialize, Serialize};

use super::content::{Material, Question};
use crate::errors::{KopiError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
    /// Percentage in `[0, 100]`.
    pub score: f64,
}

impl QuizScore {
    pub fn passed(&self, passing_score: f64) -> bool {
        self.score >= passing_score
    }

    /// Score as displayed to learners.
    pub fn rounded(&self) -> u32 {
        self.score.round() as u32
    }
}

/// Question as shown to a learner, without the answer.
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestionView {
    pub index: usize,
    pub question: String,
    pub options: Vec<String>,
}

pub fn questions_for_learner(material: &Material) -> Vec<QuizQuestionView> {
    material
        .quiz
        .iter()
        .enumerate()
        .map(|(index, q)| QuizQuestionView {
            index,
            question: q.question.clone(),
            options: q.options.clone(),
        })
        .collect()
}

/// Scores one attempt. `answers[i]` answers `quiz[i]`; `None` is wrong.
pub fn score(quiz: &[Question], answers: &[Option<String>]) -> Result<QuizScore> {
    if quiz.is_empty() {
        return Err(KopiError::invalid_content("quiz has no questions"));
    }
    if answers.len() != quiz.len() {
        return Err(KopiError::validation(format!(
            "expected {} answers, got {}",
            quiz.len(),
            answers.len()
        )));
    }

    let correct = quiz
        .iter()
        .zip(answers)
        .filter(|(q, a)| a.as_deref() == Some(q.answer.as_str()))
        .count();
    let total = quiz.len();

    Ok(QuizScore {
        correct,
        total,
        score: correct as f64 / total as f64 * 100.0,
    })
}
