// Attempt statistics data model
// Per-topic/difficulty/paper aggregates plus a capped activity log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use super::curriculum::{Difficulty, Paper, Topic};

/// Running totals for one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TopicStats {
    pub attempts: u32,
    /// Attempts scoring at least 80%
    pub correct: u32,
    pub total_marks: f64,
    pub earned_marks: f64,
    pub average_score: f64,
}

/// Incrementally maintained mean score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RunningAverage {
    pub attempts: u32,
    pub average_score: f64,
}

/// One entry of the recent-activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub date: DateTime<Utc>,
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub paper: Paper,
    /// Percentage, one decimal place
    pub score: f64,
    /// "earned/total"
    pub marks: String,
}

/// Persisted outcome of a finished mock exam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockExamRecord {
    pub course: String,
    pub paper: Paper,
    pub duration_minutes: u32,
    pub question_count: usize,
    pub total_marks: f64,
    pub earned_marks: f64,
    pub percentage: f64,
    pub grade: u8,
    pub date: DateTime<Utc>,
}

/// Whole statistics document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub topics: BTreeMap<Topic, TopicStats>,
    pub difficulties: BTreeMap<Difficulty, RunningAverage>,
    pub papers: BTreeMap<Paper, RunningAverage>,
    /// Newest first
    pub recent_activity: VecDeque<ActivityRecord>,
    pub mock_exams: Vec<MockExamRecord>,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            topics: Topic::ALL.iter().map(|t| (*t, TopicStats::default())).collect(),
            difficulties: Difficulty::ALL
                .iter()
                .map(|d| (*d, RunningAverage::default()))
                .collect(),
            papers: Paper::ALL
                .iter()
                .map(|p| (*p, RunningAverage::default()))
                .collect(),
            recent_activity: VecDeque::new(),
            mock_exams: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_seeded() {
        let stats = Statistics::default();
        assert_eq!(stats.topics.len(), 5);
        assert_eq!(stats.difficulties.len(), 3);
        assert_eq!(stats.papers.len(), 3);
        assert!(stats.recent_activity.is_empty());
    }

    #[test]
    fn test_enum_keys_serialize_as_labels() {
        let json = serde_json::to_value(Statistics::default()).unwrap();
        assert!(json["topics"].get("Stats & Probability").is_some());
        assert!(json["papers"].get("Paper3").is_some());
    }
}
