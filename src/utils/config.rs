// Centralized configuration for Math Mastery

use chrono::{DateTime, Local, NaiveDate, Utc};
use std::path::PathBuf;

/// Maximum entries kept in the recent-activity log
pub const RECENT_ACTIVITY_CAP: usize = 50;

/// Fraction of marks at which an attempt counts as correct
pub const CORRECT_THRESHOLD: f64 = 0.8;

/// Default size of the global leaderboard
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 100;

/// Depth of the board scanned when looking up a single user's position
pub const USER_RANKING_DEPTH: usize = 1000;

/// Position at or above which a user counts as a top performer
pub const TOP_PERFORMER_POSITION: usize = 10;

/// Course assigned when signup does not name one
pub const DEFAULT_COURSE: &str = "AA SL";

/// Placeholder grading band, as a fraction of the question's marks
pub const GRADE_FLOOR: f64 = 0.60;
pub const GRADE_CEILING: f64 = 0.95;

/// Answer length treated as a complete written response when estimating exam marks
pub const EXAM_FULL_ANSWER_CHARS: f64 = 200.0;

/// Default mock exam duration in minutes
pub const DEFAULT_EXAM_MINUTES: u32 = 90;

/// Longest competition a group admin can schedule, in days
pub const MAX_COMPETITION_DAYS: i64 = 365;

/// Experience weights
pub mod experience {
    pub const PER_QUESTION: u64 = 10;
    pub const PER_STREAK_DAY: u64 = 5;
    pub const PER_SCORE_POINT: f64 = 2.0;
}

/// Ranking score weights
pub mod ranking {
    pub const SCORE_WEIGHT: f64 = 100.0;
    pub const STREAK_WEIGHT: f64 = 50.0;
    pub const QUESTION_WEIGHT: f64 = 5.0;
}

/// Calendar date of a timestamp in the local timezone
pub fn local_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Runtime settings loaded from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub leaderboard_limit: usize,
    pub default_course: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
            default_course: DEFAULT_COURSE.to_string(),
        }
    }
}

impl Config {
    /// Load from environment variables, reading `.env` outside of tests
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let data_dir = lookup("MASTERY_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let leaderboard_limit = match lookup("MASTERY_LEADERBOARD_LIMIT") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "MASTERY_LEADERBOARD_LIMIT".to_string(),
                        raw,
                    ))
                }
            },
            None => defaults.leaderboard_limit,
        };

        let default_course = lookup("MASTERY_DEFAULT_COURSE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.default_course);

        Ok(Self {
            data_dir,
            leaderboard_limit,
            default_course,
        })
    }
}
