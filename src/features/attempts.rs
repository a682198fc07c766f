// Per-topic attempt statistics
// Independent of per-user stats; fed from the same attempt event by the app

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::models::attempt::{ActivityRecord, MockExamRecord, RunningAverage, Statistics, TopicStats};
use crate::models::curriculum::{Difficulty, Paper, Topic};
use crate::storage::{self, KeyValueStore, STATISTICS_KEY};
use crate::utils::config::{CORRECT_THRESHOLD, RECENT_ACTIVITY_CAP};
use crate::utils::formatters::format_marks;
use crate::utils::points::{percentage, round1};

/// Attempted topics ordered by average score
#[derive(Debug, Clone, PartialEq)]
pub struct TopicSummary {
    pub best: Option<(Topic, TopicStats)>,
    pub worst: Option<(Topic, TopicStats)>,
    /// Highest average first
    pub all: Vec<(Topic, TopicStats)>,
}

/// Incremental mean, rounded to one decimal at each step
fn push_score(running: &mut RunningAverage, score: f64) {
    running.attempts += 1;
    let n = running.attempts as f64;
    running.average_score = round1((running.average_score * (n - 1.0) + score) / n);
}

pub struct AttemptRecorder {
    store: Arc<dyn KeyValueStore>,
    stats: Statistics,
}

impl AttemptRecorder {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let stats: Statistics = storage::load_json(store.as_ref(), STATISTICS_KEY);
        debug!(
            "Loaded attempt statistics ({} recent activities)",
            stats.recent_activity.len()
        );
        Self { store, stats }
    }

    fn persist(&self) {
        storage::save_json(self.store.as_ref(), STATISTICS_KEY, &self.stats);
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Fold one attempt into the topic, difficulty and paper aggregates and
    /// prepend it to the activity log
    pub fn record_attempt(
        &mut self,
        topic: Topic,
        difficulty: Difficulty,
        paper: Paper,
        total_marks: f64,
        earned_marks: f64,
        now: DateTime<Utc>,
    ) -> &Statistics {
        let score = percentage(earned_marks, total_marks);

        let topic_stats = self.stats.topics.entry(topic).or_default();
        topic_stats.attempts += 1;
        topic_stats.total_marks += total_marks;
        topic_stats.earned_marks += earned_marks;
        topic_stats.average_score = round1(percentage(topic_stats.earned_marks, topic_stats.total_marks));
        if total_marks > 0.0 && earned_marks >= total_marks * CORRECT_THRESHOLD {
            topic_stats.correct += 1;
        }

        push_score(self.stats.difficulties.entry(difficulty).or_default(), score);
        push_score(self.stats.papers.entry(paper).or_default(), score);

        self.stats.recent_activity.push_front(ActivityRecord {
            date: now,
            topic,
            difficulty,
            paper,
            score: round1(score),
            marks: format_marks(earned_marks, total_marks),
        });
        self.stats.recent_activity.truncate(RECENT_ACTIVITY_CAP);

        debug!("Recorded {} attempt: {}/{}", topic, earned_marks, total_marks);
        self.persist();
        &self.stats
    }

    /// Best and worst attempted topics
    pub fn best_worst_topics(&self) -> TopicSummary {
        let mut all: Vec<(Topic, TopicStats)> = self
            .stats
            .topics
            .iter()
            .filter(|(_, s)| s.attempts > 0)
            .map(|(t, s)| (*t, s.clone()))
            .collect();
        all.sort_by(|(_, a), (_, b)| {
            b.average_score
                .partial_cmp(&a.average_score)
                .unwrap_or(Ordering::Equal)
        });

        TopicSummary {
            best: all.first().cloned(),
            worst: all.last().cloned(),
            all,
        }
    }

    pub fn save_mock_exam_result(&mut self, record: MockExamRecord) {
        info!(
            "Mock exam saved: {} {} grade {}",
            record.course, record.paper, record.grade
        );
        self.stats.mock_exams.push(record);
        self.persist();
    }

    /// Finished mock exams, newest first
    pub fn mock_exam_history(&self) -> Vec<MockExamRecord> {
        let mut history = self.stats.mock_exams.clone();
        history.sort_by(|a, b| b.date.cmp(&a.date));
        history
    }

    /// Drop every aggregate and the stored document
    pub fn reset_statistics(&mut self) {
        self.stats = Statistics::default();
        if let Err(e) = self.store.remove(STATISTICS_KEY) {
            error!("Failed to clear statistics: {:?}", e);
        }
        info!("Attempt statistics reset");
    }
}
