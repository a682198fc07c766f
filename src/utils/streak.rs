// Streak calculation system
// Daily streaks compare local calendar dates; time of day is ignored

use chrono::{DateTime, Utc};

use super::config::local_date;
use crate::models::user::UserStats;

/// What a streak update did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// Activity was already counted today
    AlreadyCounted,
    /// Last activity was yesterday, streak grew by one
    Extended,
    /// First activity ever, or a gap of two days or more
    Restarted,
}

/// Apply activity at `now` to the streak counters in `stats`
pub fn update_streak(stats: &mut UserStats, now: DateTime<Utc>) -> StreakChange {
    let today = local_date(now);
    let last = stats.last_activity_date.map(local_date);

    if last == Some(today) {
        return StreakChange::AlreadyCounted;
    }

    let change = match (last, today.pred_opt()) {
        (Some(last), Some(yesterday)) if last == yesterday => {
            stats.current_streak += 1;
            StreakChange::Extended
        }
        _ => {
            stats.current_streak = 1;
            StreakChange::Restarted
        }
    };

    // Current can never be longer than longest
    if stats.current_streak > stats.longest_streak {
        stats.longest_streak = stats.current_streak;
    }
    stats.total_days_active += 1;
    stats.last_activity_date = Some(now);

    change
}
