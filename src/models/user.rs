// User data model
// Matches the persisted users collection (keyed by user id)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse bucketing of numeric levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum LevelTier {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl LevelTier {
    /// Tier for a numeric level: 1-10, 11-25, 26-50, 51+
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=10 => LevelTier::Beginner,
            11..=25 => LevelTier::Intermediate,
            26..=50 => LevelTier::Advanced,
            _ => LevelTier::Expert,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LevelTier::Beginner => "Beginner",
            LevelTier::Intermediate => "Intermediate",
            LevelTier::Advanced => "Advanced",
            LevelTier::Expert => "Expert",
        }
    }
}

impl fmt::Display for LevelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cumulative per-user statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_questions: u32,
    pub total_marks: f64,
    pub earned_marks: f64,
    pub average_score: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<DateTime<Utc>>,
    pub total_days_active: u32,
}

impl UserStats {
    /// Re-derive the fields that are functions of the raw counters
    pub fn normalize(&mut self) {
        self.average_score = if self.total_marks > 0.0 {
            self.earned_marks / self.total_marks * 100.0
        } else {
            0.0
        };
        if self.current_streak > self.longest_streak {
            self.longest_streak = self.current_streak;
        }
    }
}

/// Partial stats update; `None` fields are left untouched.
/// `average_score` is not settable, it is always derived from the marks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsUpdate {
    pub total_questions: Option<u32>,
    pub total_marks: Option<f64>,
    pub earned_marks: Option<f64>,
    pub current_streak: Option<u32>,
    pub longest_streak: Option<u32>,
    pub last_activity_date: Option<DateTime<Utc>>,
    pub total_days_active: Option<u32>,
}

impl StatsUpdate {
    /// Merge into `stats` and re-derive dependent fields
    pub fn apply(&self, stats: &mut UserStats) {
        if let Some(v) = self.total_questions {
            stats.total_questions = v;
        }
        if let Some(v) = self.total_marks {
            stats.total_marks = v;
        }
        if let Some(v) = self.earned_marks {
            stats.earned_marks = v;
        }
        if let Some(v) = self.current_streak {
            stats.current_streak = v;
        }
        if let Some(v) = self.longest_streak {
            stats.longest_streak = v;
        }
        if let Some(v) = self.last_activity_date {
            stats.last_activity_date = Some(v);
        }
        if let Some(v) = self.total_days_active {
            stats.total_days_active = v;
        }
        stats.normalize();
    }
}

/// Unlocked badge; immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub unlocked_at: DateTime<Utc>,
}

impl Achievement {
    pub fn new(id: &str, name: &str, description: &str, icon: &str, unlocked_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            unlocked_at,
        }
    }
}

/// Full user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string, never the plaintext
    pub password_hash: String,
    pub course: String,
    pub joined_date: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub stats: UserStats,
    pub achievements: Vec<Achievement>,
    /// Ids of groups this user belongs to (back-references)
    pub groups: Vec<String>,
    pub level: u32,
    pub level_name: LevelTier,
    pub experience: u64,
}

impl User {
    /// Create a user with zeroed stats
    pub fn new(
        id: &str,
        username: &str,
        email: &str,
        password_hash: &str,
        course: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            course: course.to_string(),
            joined_date: now,
            last_login: now,
            stats: UserStats::default(),
            achievements: Vec::new(),
            groups: Vec::new(),
            level: 1,
            level_name: LevelTier::Beginner,
            experience: 0,
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }

    /// Append an achievement unless one with the same id is already held
    pub fn award(&mut self, achievement: Achievement) -> Option<Achievement> {
        if self.has_achievement(&achievement.id) {
            return None;
        }
        self.achievements.push(achievement.clone());
        Some(achievement)
    }

    pub fn is_in_group(&self, group_id: &str) -> bool {
        self.groups.iter().any(|g| g == group_id)
    }
}
