// Mock exams
// Ten-question papers in two sections, scored with an answer-length estimate

use chrono::{DateTime, Duration, Utc};
use rand::prelude::IndexedRandom;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::api::questions::{template_question, Question, QuestionSource};
use crate::error::{MasteryError, Result};
use crate::models::attempt::MockExamRecord;
use crate::models::curriculum::{Difficulty, Paper, Topic};
use crate::utils::config::EXAM_FULL_ANSWER_CHARS;
use crate::utils::points::{percentage, round1};

const SECTION_A_QUESTIONS: usize = 6;
const SECTION_B_QUESTIONS: usize = 4;

/// Estimated share of the marks a full-length answer earns
const ESTIMATE_FLOOR: f64 = 0.6;
const ESTIMATE_CEILING: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
    A,
    B,
}

/// Difficulty and fallback marks for the `i`-th question of a section
fn slot(section: Section, i: usize) -> (Difficulty, u32) {
    match (section, i < 2) {
        (Section::A, true) => (Difficulty::Foundation, 4),
        (Section::A, false) => (Difficulty::Standard, 6),
        (Section::B, true) => (Difficulty::Standard, 7),
        (Section::B, false) => (Difficulty::Distinction, 9),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamQuestion {
    /// 1-based across both sections
    pub number: usize,
    pub section: Section,
    pub question: Question,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamScore {
    pub total_marks: f64,
    pub earned_marks: f64,
    pub percentage: f64,
    pub grade: u8,
}

/// IB grade 1-7 for a percentage
pub fn ib_grade(percentage: f64) -> u8 {
    match percentage {
        p if p >= 85.0 => 7,
        p if p >= 75.0 => 6,
        p if p >= 65.0 => 5,
        p if p >= 55.0 => 4,
        p if p >= 45.0 => 3,
        p if p >= 35.0 => 2,
        _ => 1,
    }
}

/// Marks estimated from answer length: a 200-character answer earns 60-90%
pub fn estimate_marks<R: Rng + ?Sized>(marks: u32, answer: &str, rng: &mut R) -> f64 {
    let marks = marks as f64;
    let length = answer.trim().chars().count() as f64;
    let factor = rng.random_range(ESTIMATE_FLOOR..ESTIMATE_CEILING);
    (length / EXAM_FULL_ANSWER_CHARS * marks * factor).floor().min(marks)
}

#[derive(Debug, Clone, Serialize)]
pub struct MockExam {
    pub course: String,
    pub paper: Paper,
    pub duration_minutes: u32,
    pub questions: Vec<ExamQuestion>,
    pub answers: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl MockExam {
    /// Build a paper from the source; slots it cannot fill get a template question
    pub fn create<R: Rng + ?Sized>(
        source: &dyn QuestionSource,
        course: &str,
        paper: Paper,
        duration_minutes: u32,
        rng: &mut R,
    ) -> Self {
        let sections = [(Section::A, SECTION_A_QUESTIONS), (Section::B, SECTION_B_QUESTIONS)];
        let mut questions = Vec::with_capacity(SECTION_A_QUESTIONS + SECTION_B_QUESTIONS);

        for (section, count) in sections {
            for i in 0..count {
                let topic = *Topic::ALL.choose(rng).unwrap_or(&Topic::Functions);
                let (difficulty, marks) = slot(section, i);
                let question = source
                    .random_question(topic, difficulty, paper)
                    .unwrap_or_else(|| template_question(topic, difficulty, paper, marks));
                questions.push(ExamQuestion {
                    number: questions.len() + 1,
                    section,
                    question,
                });
            }
        }

        Self {
            course: course.to_string(),
            paper,
            duration_minutes,
            answers: vec![String::new(); questions.len()],
            questions,
            started_at: None,
            ended_at: None,
        }
    }

    pub fn total_marks(&self) -> u32 {
        self.questions.iter().map(|q| q.question.marks).sum()
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
        self.ended_at = None;
        self.answers = vec![String::new(); self.questions.len()];
        info!("Mock exam started: {} {}", self.course, self.paper);
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.ended_at.is_none()
    }

    /// 1-based question lookup
    pub fn question(&self, number: usize) -> Option<&ExamQuestion> {
        number.checked_sub(1).and_then(|i| self.questions.get(i))
    }

    /// Store the answer to question `number` (1-based), replacing any earlier one
    pub fn save_answer(&mut self, number: usize, answer: &str) -> Result<()> {
        if !self.is_running() {
            return Err(MasteryError::Validation("the exam is not running".to_string()));
        }
        let slot = number
            .checked_sub(1)
            .and_then(|i| self.answers.get_mut(i))
            .ok_or_else(|| MasteryError::Validation(format!("no question {}", number)))?;
        *slot = answer.to_string();
        Ok(())
    }

    pub fn answered(&self) -> usize {
        self.answers.iter().filter(|a| !a.trim().is_empty()).count()
    }

    /// Time left on the clock; zero once it has run out
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        match self.started_at {
            Some(start) => {
                let deadline = start + Duration::minutes(self.duration_minutes as i64);
                (deadline - now).max(Duration::zero())
            }
            None => Duration::minutes(self.duration_minutes as i64),
        }
    }

    pub fn end(&mut self, now: DateTime<Utc>) {
        if self.ended_at.is_none() {
            self.ended_at = Some(now);
            info!("Mock exam ended with {} answers", self.answered());
        }
    }

    pub fn score_with<R: Rng + ?Sized>(&self, rng: &mut R) -> ExamScore {
        let total_marks = self.total_marks() as f64;
        let earned_marks: f64 = self
            .questions
            .iter()
            .zip(&self.answers)
            .map(|(q, answer)| estimate_marks(q.question.marks, answer, rng))
            .sum();
        let pct = round1(percentage(earned_marks, total_marks));

        ExamScore {
            total_marks,
            earned_marks: round1(earned_marks),
            percentage: pct,
            grade: ib_grade(pct),
        }
    }

    pub fn score(&self) -> ExamScore {
        self.score_with(&mut rand::rng())
    }

    pub fn to_record(&self, score: &ExamScore, now: DateTime<Utc>) -> MockExamRecord {
        MockExamRecord {
            course: self.course.clone(),
            paper: self.paper,
            duration_minutes: self.duration_minutes,
            question_count: self.questions.len(),
            total_marks: score.total_marks,
            earned_marks: score.earned_marks,
            percentage: score.percentage,
            grade: score.grade,
            date: self.ended_at.unwrap_or(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Source with nothing in it, so every slot uses a template
    struct EmptySource;

    impl QuestionSource for EmptySource {
        fn random_question(&self, _: Topic, _: Difficulty, _: Paper) -> Option<Question> {
            None
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 6, 8, 0, 0).unwrap()
    }

    fn exam() -> MockExam {
        let mut rng = StdRng::seed_from_u64(42);
        MockExam::create(&EmptySource, "AA HL", Paper::Paper2, 90, &mut rng)
    }

    #[test]
    fn test_structure() {
        let exam = exam();
        assert_eq!(exam.questions.len(), 10);
        let sections: Vec<Section> = exam.questions.iter().map(|q| q.section).collect();
        assert_eq!(&sections[..6], &[Section::A; 6]);
        assert_eq!(&sections[6..], &[Section::B; 4]);

        let marks: Vec<u32> = exam.questions.iter().map(|q| q.question.marks).collect();
        assert_eq!(marks, vec![4, 4, 6, 6, 6, 6, 7, 7, 9, 9]);
        assert_eq!(exam.total_marks(), 64);
        assert_eq!(exam.questions[9].number, 10);
        assert_eq!(exam.questions[9].question.difficulty, Difficulty::Distinction);
    }

    #[test]
    fn test_bank_questions_used_when_available() {
        let mut rng = StdRng::seed_from_u64(1);
        let exam = MockExam::create(&crate::api::questions::QuestionBank, "AA SL", Paper::Paper1, 90, &mut rng);
        assert_eq!(exam.questions.len(), 10);
        assert!(exam.questions.iter().all(|q| q.question.paper == Paper::Paper1));
    }

    #[test]
    fn test_answers_require_running_exam() {
        let mut exam = exam();
        assert!(exam.save_answer(1, "x").is_err());

        exam.start(now());
        exam.save_answer(1, "x = 2").unwrap();
        exam.save_answer(1, "x = 3").unwrap();
        assert!(exam.save_answer(0, "x").is_err());
        assert!(exam.save_answer(11, "x").is_err());
        assert_eq!(exam.answers[0], "x = 3");
        assert_eq!(exam.answered(), 1);

        exam.end(now());
        assert!(exam.save_answer(2, "late").is_err());
    }

    #[test]
    fn test_blank_exam_scores_grade_one() {
        let mut exam = exam();
        exam.start(now());
        exam.end(now());
        let score = exam.score();
        assert_eq!(score.earned_marks, 0.0);
        assert_eq!(score.percentage, 0.0);
        assert_eq!(score.grade, 1);
    }

    #[test]
    fn test_estimate_caps_at_marks() {
        let mut rng = StdRng::seed_from_u64(3);
        let essay = "a".repeat(2000);
        assert_eq!(estimate_marks(6, &essay, &mut rng), 6.0);
        let full = "a".repeat(200);
        let est = estimate_marks(10, &full, &mut rng);
        assert!((6.0..=9.0).contains(&est));
    }

    #[test]
    fn test_grades() {
        assert_eq!(ib_grade(85.0), 7);
        assert_eq!(ib_grade(84.9), 6);
        assert_eq!(ib_grade(65.0), 5);
        assert_eq!(ib_grade(55.0), 4);
        assert_eq!(ib_grade(45.0), 3);
        assert_eq!(ib_grade(35.0), 2);
        assert_eq!(ib_grade(34.9), 1);
    }

    #[test]
    fn test_timer_and_record() {
        let mut exam = exam();
        assert_eq!(exam.time_remaining(now()), Duration::minutes(90));
        exam.start(now());
        assert_eq!(exam.time_remaining(now() + Duration::minutes(30)), Duration::minutes(60));
        assert_eq!(exam.time_remaining(now() + Duration::minutes(120)), Duration::zero());

        exam.end(now() + Duration::minutes(45));
        let score = exam.score();
        let record = exam.to_record(&score, now() + Duration::hours(5));
        assert_eq!(record.date, now() + Duration::minutes(45));
        assert_eq!(record.question_count, 10);
        assert_eq!(record.course, "AA HL");
    }
}
