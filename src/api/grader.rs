// Answer grading surface
// The placeholder grader awards a pseudo-random share of the marks

use rand::Rng;
use serde::Serialize;

use super::questions::Question;
use crate::utils::config::{GRADE_CEILING, GRADE_FLOOR};
use crate::utils::points::round1;

/// Outcome of grading one answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grade {
    pub awarded: f64,
    pub total: f64,
    pub feedback: String,
}

/// Turns a submitted answer into awarded marks
pub trait Grader: Send + Sync {
    fn grade(&self, question: &Question, answer: &str) -> Grade;
}

/// No real marking: 60-95% of the marks for any non-empty answer
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderGrader;

impl PlaceholderGrader {
    pub fn grade_with<R: Rng + ?Sized>(&self, question: &Question, answer: &str, rng: &mut R) -> Grade {
        let total = question.marks as f64;

        if answer.trim().is_empty() {
            return Grade {
                awarded: 0.0,
                total,
                feedback: "No answer submitted.".to_string(),
            };
        }

        let fraction = rng.random_range(GRADE_FLOOR..=GRADE_CEILING);
        let awarded = round1(total * fraction).min(total);
        let feedback = if fraction >= 0.85 {
            "Strong working. Check your final answer is in the requested form."
        } else if fraction >= 0.7 {
            "Good method. Show intermediate steps to secure the remaining marks."
        } else {
            "Partially correct. Review the method marks for this type of question."
        };

        Grade {
            awarded,
            total,
            feedback: feedback.to_string(),
        }
    }
}

impl Grader for PlaceholderGrader {
    fn grade(&self, question: &Question, answer: &str) -> Grade {
        self.grade_with(question, answer, &mut rand::rng())
    }
}
