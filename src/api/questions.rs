// Question source
// Static IB question bank embedded at build time, with template fallbacks

use once_cell::sync::Lazy;
use rand::prelude::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::models::curriculum::{Difficulty, Paper, Topic};

/// A single question as handed to the rendering surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub paper: Paper,
    pub marks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
}

/// Anything that can hand out practice questions
pub trait QuestionSource: Send + Sync {
    /// A random question for the selection, `None` if the source has none
    fn random_question(&self, topic: Topic, difficulty: Difficulty, paper: Paper) -> Option<Question>;
}

static BANK: Lazy<Vec<Question>> = Lazy::new(|| {
    match serde_json::from_str::<Vec<Question>>(include_str!("../../assets/questions.json")) {
        Ok(questions) => questions,
        Err(e) => {
            error!("Embedded question bank is malformed: {}", e);
            Vec::new()
        }
    }
});

/// Built-in question bank
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionBank;

impl QuestionBank {
    pub fn all(&self) -> &'static [Question] {
        &BANK
    }

    pub fn matching(&self, topic: Topic, difficulty: Difficulty, paper: Paper) -> Vec<&'static Question> {
        BANK.iter()
            .filter(|q| q.topic == topic && q.difficulty == difficulty && q.paper == paper)
            .collect()
    }
}

impl QuestionSource for QuestionBank {
    fn random_question(&self, topic: Topic, difficulty: Difficulty, paper: Paper) -> Option<Question> {
        let candidates = self.matching(topic, difficulty, paper);
        let picked = candidates.choose(&mut rand::rng()).map(|q| (*q).clone());
        if picked.is_none() {
            warn!("No bank question for {} / {} / {}", topic, difficulty, paper);
        }
        picked
    }
}

/// Generic prompt used when the source has nothing for a selection
pub fn template_question(topic: Topic, difficulty: Difficulty, paper: Paper, marks: u32) -> Question {
    let focus = match topic {
        Topic::NumberAndAlgebra => "sequences, series, logarithms or the binomial theorem",
        Topic::Functions => "the properties, transformations and inverses of functions",
        Topic::GeometryAndTrig => "trigonometric identities, triangles or 3D geometry",
        Topic::StatsAndProbability => "probability distributions and statistical measures",
        Topic::Calculus => "differentiation, integration and their applications",
    };
    let depth = match difficulty {
        Difficulty::Foundation => "Show each step of a standard method",
        Difficulty::Standard => "Combine at least two techniques and justify each step",
        Difficulty::Distinction => "Construct a full argument and generalise your result",
    };

    Question {
        topic,
        difficulty,
        paper,
        marks,
        title: None,
        text: format!(
            "Write and solve an exam-style {} question on {}. {}.",
            paper, focus, depth
        ),
    }
}

/// A question for the selection, falling back to a template carrying the
/// difficulty's default marks
pub fn question_or_template(
    source: &dyn QuestionSource,
    topic: Topic,
    difficulty: Difficulty,
    paper: Paper,
) -> Question {
    source
        .random_question(topic, difficulty, paper)
        .unwrap_or_else(|| template_question(topic, difficulty, paper, difficulty.template_marks()))
}
