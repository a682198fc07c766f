// Experience, level and ranking score calculation

use super::config::{experience, ranking};
use crate::models::user::{User, UserStats};

/// Experience earned from cumulative stats
pub fn calculate_experience(stats: &UserStats) -> u64 {
    let score_xp = (stats.average_score * experience::PER_SCORE_POINT).floor();

    stats.total_questions as u64 * experience::PER_QUESTION
        + stats.current_streak as u64 * experience::PER_STREAK_DAY
        + if score_xp > 0.0 { score_xp as u64 } else { 0 }
}

/// Numeric level: floor(sqrt(experience / 100)) + 1
pub fn level_for_experience(experience: u64) -> u32 {
    (experience as f64 / 100.0).sqrt().floor() as u32 + 1
}

/// Composite score used to order the overall leaderboard
pub fn ranking_score(user: &User) -> f64 {
    user.experience as f64
        + user.stats.average_score * ranking::SCORE_WEIGHT
        + user.stats.current_streak as f64 * ranking::STREAK_WEIGHT
        + user.stats.total_questions as f64 * ranking::QUESTION_WEIGHT
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Share of `total` that `earned` represents, in percent; 0 when nothing was at stake
pub fn percentage(earned: f64, total: f64) -> f64 {
    if total > 0.0 {
        earned / total * 100.0
    } else {
        0.0
    }
}
