// Statistics models for leaderboard and rankings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::{LevelTier, User};

/// Row of a global or category leaderboard. Recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: String,
    pub username: String,
    pub level: u32,
    pub level_name: LevelTier,
    pub experience: u64,
    pub total_questions: u32,
    pub average_score: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_days_active: u32,
    pub achievements: usize,
    /// Composite used by the overall board
    pub ranking_score: f64,
    /// Value the board was sorted by (equals `ranking_score` for overall)
    pub score: f64,
    pub position: usize,
}

impl LeaderboardEntry {
    pub fn from_user(user: &User, ranking_score: f64, score: f64) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            level: user.level,
            level_name: user.level_name,
            experience: user.experience,
            total_questions: user.stats.total_questions,
            average_score: user.stats.average_score,
            current_streak: user.stats.current_streak,
            longest_streak: user.stats.longest_streak,
            total_days_active: user.stats.total_days_active,
            achievements: user.achievements.len(),
            ranking_score,
            score,
            position: 0,
        }
    }
}

/// Leaderboard category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankingCategory {
    #[default]
    Overall,
    Questions,
    Streak,
    Score,
    Level,
}

impl RankingCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RankingCategory::Overall => "Overall",
            RankingCategory::Questions => "Questions Answered",
            RankingCategory::Streak => "Current Streak",
            RankingCategory::Score => "Average Score",
            RankingCategory::Level => "Level",
        }
    }
}

impl std::str::FromStr for RankingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overall" | "all" => Ok(RankingCategory::Overall),
            "questions" => Ok(RankingCategory::Questions),
            "streak" => Ok(RankingCategory::Streak),
            "score" => Ok(RankingCategory::Score),
            "level" => Ok(RankingCategory::Level),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Row of the "active today" board
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    pub id: String,
    pub username: String,
    pub level: u32,
    pub total_questions: u32,
    pub last_activity: Option<DateTime<Utc>>,
    pub position: usize,
}

/// Neighbour on the global board and the ranking-score gap to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbour {
    pub username: String,
    pub score: f64,
    pub difference: f64,
}

/// Where a user sits relative to the users directly above and below
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub position: usize,
    pub above: Option<Neighbour>,
    pub below: Option<Neighbour>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("streak".parse::<RankingCategory>().unwrap(), RankingCategory::Streak);
        assert_eq!("Overall".parse::<RankingCategory>().unwrap(), RankingCategory::Overall);
        assert!("weekly".parse::<RankingCategory>().is_err());
    }
}
