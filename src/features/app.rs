// Application facade
// Wires the stores to the question source, grader and clock, and runs the
// submit-answer flow: grade, record topic stats, update the user, refresh groups

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use super::analytics::{self, Insights};
use super::attempts::{AttemptRecorder, TopicSummary};
use super::auth::UserStore;
use super::chat::TutorChat;
use super::exam::{ExamScore, MockExam};
use super::groups::GroupStore;
use super::ranking;
use crate::api::grader::{Grade, Grader, PlaceholderGrader};
use crate::api::questions::{question_or_template, Question, QuestionBank, QuestionSource};
use crate::api::tutor::{ChatMessage, RuleTutor};
use crate::error::{MasteryError, Result};
use crate::models::attempt::MockExamRecord;
use crate::models::curriculum::{Difficulty, Paper, Topic};
use crate::models::group::{Competition, Group, GroupStanding};
use crate::models::stats::{Comparison, DailyEntry, LeaderboardEntry, RankingCategory};
use crate::models::user::{Achievement, User};
use crate::storage::KeyValueStore;
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::config::{local_date, Config};

/// Outcome of one submitted practice answer
#[derive(Debug, Clone)]
pub struct Submission {
    pub question: Question,
    pub grade: Grade,
    /// Achievements unlocked by this attempt; empty when nobody is signed in
    pub unlocked: Vec<Achievement>,
}

pub struct App {
    users: UserStore,
    groups: GroupStore,
    attempts: AttemptRecorder,
    chat: TutorChat,
    questions: Box<dyn QuestionSource>,
    grader: Box<dyn Grader>,
    clock: Arc<dyn Clock>,
    config: Config,
    current_question: Option<Question>,
    exam: Option<MockExam>,
}

impl App {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        questions: Box<dyn QuestionSource>,
        grader: Box<dyn Grader>,
        clock: Arc<dyn Clock>,
        config: Config,
    ) -> Self {
        let users = UserStore::load(store.clone());
        let groups = GroupStore::load(store.clone());
        let attempts = AttemptRecorder::load(store.clone());
        let chat = TutorChat::load(store, Box::new(RuleTutor));
        info!(
            "Loaded {} users and {} groups",
            users.len(),
            groups.len()
        );
        Self {
            users,
            groups,
            attempts,
            chat,
            questions,
            grader,
            clock,
            config,
            current_question: None,
            exam: None,
        }
    }

    /// Built-in question bank, placeholder grader and wall clock
    pub fn with_defaults(store: Arc<dyn KeyValueStore>, config: Config) -> Self {
        Self::new(
            store,
            Box::new(QuestionBank),
            Box::new(PlaceholderGrader),
            Arc::new(SystemClock),
            config,
        )
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn groups(&self) -> &GroupStore {
        &self.groups
    }

    pub fn attempts(&self) -> &AttemptRecorder {
        &self.attempts
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.users.current_user()
    }

    /// Look up any registered user by username
    pub fn find_user(&self, username: &str) -> Result<&User> {
        self.users
            .find_by_username(username)
            .ok_or_else(|| MasteryError::user_not_found(username))
    }

    fn current_user_id(&self) -> Result<String> {
        self.users
            .session()
            .user_id()
            .map(str::to_string)
            .ok_or(MasteryError::NotSignedIn)
    }

    // ============ Accounts ============

    /// Register and sign in; an empty course falls back to the configured default
    pub fn sign_up(&mut self, username: &str, email: &str, password: &str, course: Option<&str>) -> Result<User> {
        let course = course
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(&self.config.default_course)
            .to_string();
        let now = self.clock.now();
        self.users.sign_up(username, email, password, &course, now)
    }

    pub fn sign_in(&mut self, identifier: &str, password: &str) -> Result<User> {
        let now = self.clock.now();
        let user = self.users.sign_in(identifier, password, now)?;
        // Sign-in may move the streak, so group boards go stale
        self.groups.refresh_user_groups(&user.id, &self.users);
        Ok(user)
    }

    pub fn sign_out(&mut self) {
        self.users.sign_out();
        self.current_question = None;
    }

    // ============ Practice ============

    /// Draw a question and hold it until an answer is submitted
    pub fn practice(&mut self, topic: Topic, difficulty: Difficulty, paper: Paper) -> &Question {
        let question = question_or_template(self.questions.as_ref(), topic, difficulty, paper);
        debug!("Practice question: {} / {} / {}", topic, difficulty, paper);
        self.current_question.insert(question)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    /// Grade the answer to the held question and record the attempt
    pub fn submit_answer(&mut self, answer: &str) -> Result<Submission> {
        let question = self
            .current_question
            .take()
            .ok_or_else(|| MasteryError::Validation("no question in progress".to_string()))?;
        let grade = self.grader.grade(&question, answer);
        let unlocked = self.record_attempt(
            question.topic,
            question.difficulty,
            question.paper,
            grade.total,
            grade.awarded,
        )?;
        Ok(Submission {
            question,
            grade,
            unlocked,
        })
    }

    /// Feed one attempt into both statistics views. Per-user stats are only
    /// touched when someone is signed in.
    pub fn record_attempt(
        &mut self,
        topic: Topic,
        difficulty: Difficulty,
        paper: Paper,
        total_marks: f64,
        earned_marks: f64,
    ) -> Result<Vec<Achievement>> {
        let now = self.clock.now();
        self.attempts
            .record_attempt(topic, difficulty, paper, total_marks, earned_marks, now);

        let Ok(user_id) = self.current_user_id() else {
            return Ok(Vec::new());
        };
        let unlocked = self.users.record_attempt(&user_id, total_marks, earned_marks, now)?;
        self.groups.refresh_user_groups(&user_id, &self.users);
        Ok(unlocked)
    }

    pub fn topic_summary(&self) -> TopicSummary {
        self.attempts.best_worst_topics()
    }

    pub fn reset_statistics(&mut self) {
        self.attempts.reset_statistics();
    }

    // ============ Tutor ============

    pub fn ask_tutor(&mut self, message: &str) -> Result<String> {
        let now = self.clock.now();
        self.chat.ask(message, now)
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        self.chat.history()
    }

    pub fn clear_chat(&mut self) {
        self.chat.clear();
    }

    // ============ Rankings ============

    pub fn leaderboard(&self, category: RankingCategory) -> Vec<LeaderboardEntry> {
        ranking::category_leaderboard(self.users.all(), category, self.config.leaderboard_limit)
    }

    pub fn daily_leaderboard(&self) -> Vec<DailyEntry> {
        ranking::daily_leaderboard(self.users.all(), local_date(self.clock.now()))
    }

    pub fn my_ranking(&self) -> Result<Option<LeaderboardEntry>> {
        let id = self.current_user_id()?;
        Ok(ranking::user_ranking(self.users.all(), &id))
    }

    pub fn my_comparison(&self) -> Result<Option<Comparison>> {
        let id = self.current_user_id()?;
        Ok(ranking::comparison(self.users.all(), &id))
    }

    pub fn insights(&self) -> Result<Insights> {
        let id = self.current_user_id()?;
        analytics::insights(&self.users, &id).ok_or_else(|| MasteryError::user_not_found(&id))
    }

    // ============ Groups ============

    pub fn create_group(&mut self, name: &str, description: &str, is_public: bool) -> Result<Group> {
        let id = self.current_user_id()?;
        let now = self.clock.now();
        self.groups
            .create_group(name, description, &id, is_public, &mut self.users, now)
    }

    pub fn join_group(&mut self, group_id: &str) -> Result<Group> {
        let id = self.current_user_id()?;
        self.groups.join_group(group_id, &id, &mut self.users)
    }

    pub fn leave_group(&mut self, group_id: &str) -> Result<()> {
        let id = self.current_user_id()?;
        self.groups.leave_group(group_id, &id, &mut self.users)
    }

    pub fn public_groups(&self) -> Vec<&Group> {
        self.groups.public_groups()
    }

    pub fn my_groups(&self) -> Result<Vec<&Group>> {
        let id = self.current_user_id()?;
        Ok(self.groups.user_groups(&id, &self.users))
    }

    pub fn group_leaderboard(&mut self, group_id: &str) -> Result<Vec<(String, GroupStanding)>> {
        if self.groups.get_group(group_id).is_none() {
            return Err(MasteryError::group_not_found(group_id));
        }
        Ok(self.groups.group_leaderboard(group_id, &self.users))
    }

    /// Only group admins may schedule competitions
    pub fn create_competition(&mut self, group_id: &str, name: &str, description: &str, days: i64) -> Result<Competition> {
        let id = self.current_user_id()?;
        let group = self
            .groups
            .get_group(group_id)
            .ok_or_else(|| MasteryError::group_not_found(group_id))?;
        if !group.is_admin(&id) {
            return Err(MasteryError::Validation(
                "only group admins can create competitions".to_string(),
            ));
        }
        let start = self.clock.now();
        let end = chrono::Duration::try_days(days)
            .and_then(|length| start.checked_add_signed(length))
            .ok_or_else(|| MasteryError::Validation("competition window out of range".to_string()))?;
        self.groups
            .create_competition(group_id, name, description, start, end)
    }

    // ============ Mock exams ============

    /// Build and start a new exam, replacing any unfinished one
    pub fn start_exam(&mut self, paper: Paper, duration_minutes: u32) -> &MockExam {
        let course = self
            .current_user()
            .map(|u| u.course.clone())
            .unwrap_or_else(|| self.config.default_course.clone());
        let mut exam = MockExam::create(
            self.questions.as_ref(),
            &course,
            paper,
            duration_minutes,
            &mut rand::rng(),
        );
        exam.start(self.clock.now());
        self.exam.insert(exam)
    }

    pub fn exam(&self) -> Option<&MockExam> {
        self.exam.as_ref()
    }

    pub fn answer_exam_question(&mut self, number: usize, answer: &str) -> Result<()> {
        self.exam
            .as_mut()
            .ok_or_else(|| MasteryError::Validation("no exam in progress".to_string()))?
            .save_answer(number, answer)
    }

    /// End the running exam, score it and keep the result in the history
    pub fn finish_exam(&mut self) -> Result<ExamScore> {
        let mut exam = self
            .exam
            .take()
            .ok_or_else(|| MasteryError::Validation("no exam in progress".to_string()))?;
        let now = self.clock.now();
        exam.end(now);
        let score = exam.score();
        self.attempts.save_mock_exam_result(exam.to_record(&score, now));
        Ok(score)
    }

    pub fn mock_exam_history(&self) -> Vec<MockExamRecord> {
        self.attempts.mock_exam_history()
    }
}
