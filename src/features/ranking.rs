// Rankings over users and group members
// Stateless: every board is recomputed from the records it is given.
// Ties keep the iteration order of the input (users are iterated by id, which
// is creation order), so tie-breaking is arbitrary but stable.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::auth::UserStore;
use crate::models::group::{GroupStanding, GroupStats};
use crate::models::stats::{Comparison, DailyEntry, LeaderboardEntry, Neighbour, RankingCategory};
use crate::models::user::User;
use crate::utils::config::{local_date, DEFAULT_LEADERBOARD_LIMIT, USER_RANKING_DEPTH};
use crate::utils::points::{ranking_score, round1};

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Sort, assign 1-based positions, truncate
fn rank(mut entries: Vec<LeaderboardEntry>, limit: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| descending(a.score, b.score));
    entries.truncate(limit);
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.position = i + 1;
    }
    entries
}

/// Overall board ordered by composite ranking score
pub fn global_leaderboard<'a, I>(users: I, limit: usize) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = &'a User>,
{
    let entries = users
        .into_iter()
        .map(|user| {
            let score = ranking_score(user);
            LeaderboardEntry::from_user(user, score, score)
        })
        .collect();
    rank(entries, limit)
}

/// Single-key board; `Overall` is the global board
pub fn category_leaderboard<'a, I>(users: I, category: RankingCategory, limit: usize) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = &'a User>,
{
    let key: fn(&User) -> f64 = match category {
        RankingCategory::Overall => return global_leaderboard(users, limit),
        RankingCategory::Questions => |u| u.stats.total_questions as f64,
        RankingCategory::Streak => |u| u.stats.current_streak as f64,
        RankingCategory::Score => |u| u.stats.average_score,
        RankingCategory::Level => |u| u.level as f64,
    };

    let entries = users
        .into_iter()
        .map(|user| LeaderboardEntry::from_user(user, ranking_score(user), key(user)))
        .collect();
    rank(entries, limit)
}

/// The user's row on the global board, if they rank within the scan depth
pub fn user_ranking<'a, I>(users: I, user_id: &str) -> Option<LeaderboardEntry>
where
    I: IntoIterator<Item = &'a User>,
{
    global_leaderboard(users, USER_RANKING_DEPTH)
        .into_iter()
        .find(|entry| entry.id == user_id)
}

/// Users whose last activity falls on `today`, most questions first
pub fn daily_leaderboard<'a, I>(users: I, today: NaiveDate) -> Vec<DailyEntry>
where
    I: IntoIterator<Item = &'a User>,
{
    let mut active: Vec<DailyEntry> = users
        .into_iter()
        .filter(|u| u.stats.last_activity_date.map(local_date) == Some(today))
        .map(|u| DailyEntry {
            id: u.id.clone(),
            username: u.username.clone(),
            level: u.level,
            total_questions: u.stats.total_questions,
            last_activity: u.stats.last_activity_date,
            position: 0,
        })
        .collect();

    active.sort_by(|a, b| b.total_questions.cmp(&a.total_questions));
    for (i, entry) in active.iter_mut().enumerate() {
        entry.position = i + 1;
    }
    active
}

/// Neighbours directly above and below the user on the default-size global board
pub fn comparison<'a, I>(users: I, user_id: &str) -> Option<Comparison>
where
    I: IntoIterator<Item = &'a User>,
{
    let board = global_leaderboard(users, DEFAULT_LEADERBOARD_LIMIT);
    let index = board.iter().position(|e| e.id == user_id)?;
    let own = board[index].ranking_score;

    let above = index.checked_sub(1).map(|i| &board[i]).map(|e| Neighbour {
        username: e.username.clone(),
        score: e.ranking_score,
        difference: e.ranking_score - own,
    });
    let below = board.get(index + 1).map(|e| Neighbour {
        username: e.username.clone(),
        score: e.ranking_score,
        difference: own - e.ranking_score,
    });

    Some(Comparison {
        position: index + 1,
        above,
        below,
    })
}

/// Ranked standings and aggregate stats for a set of member ids.
/// Members unknown to the user store are skipped.
pub fn group_standings(members: &[String], users: &UserStore) -> (BTreeMap<String, GroupStanding>, GroupStats) {
    let mut rows: Vec<(&String, &User)> = members
        .iter()
        .filter_map(|id| users.get(id).map(|user| (id, user)))
        .collect();

    rows.sort_by(|(_, a), (_, b)| {
        b.experience
            .cmp(&a.experience)
            .then_with(|| descending(a.stats.average_score, b.stats.average_score))
    });

    let total_questions = rows.iter().map(|(_, u)| u.stats.total_questions).sum();
    let average_score = if rows.is_empty() {
        0.0
    } else {
        round1(rows.iter().map(|(_, u)| u.stats.average_score).sum::<f64>() / rows.len() as f64)
    };

    let leaderboard = rows
        .into_iter()
        .enumerate()
        .map(|(i, (id, user))| {
            let standing = GroupStanding {
                username: user.username.clone(),
                total_questions: user.stats.total_questions,
                average_score: user.stats.average_score,
                current_streak: user.stats.current_streak,
                level: user.level,
                level_name: user.level_name,
                experience: user.experience,
                rank: i + 1,
            };
            (id.clone(), standing)
        })
        .collect();

    (
        leaderboard,
        GroupStats {
            total_questions,
            average_score,
        },
    )
}
