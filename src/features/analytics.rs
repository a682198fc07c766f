// Per-user performance insights derived from cumulative stats

use serde::Serialize;

use super::auth::UserStore;
use super::ranking;
use crate::models::user::{Achievement, LevelTier, User};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_questions: u32,
    pub average_score: f64,
    pub level: u32,
    pub level_name: LevelTier,
    pub experience: u64,
    /// Global position, 0 when unranked
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
    pub total_days_active: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strength {
    pub area: &'static str,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weakness {
    pub area: &'static str,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goal {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Percent complete, capped at 100
    pub progress: f64,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub overall: Overview,
    pub streaks: Streaks,
    pub strengths: Vec<Strength>,
    pub weaknesses: Vec<Weakness>,
    pub recommendations: Vec<String>,
    pub achievements: Vec<Achievement>,
    pub goals: Vec<Goal>,
}

/// Full insight report, `None` for an unknown user
pub fn insights(users: &UserStore, user_id: &str) -> Option<Insights> {
    let user = users.get(user_id)?;
    let rank = ranking::user_ranking(users.all(), user_id)
        .map(|e| e.position)
        .unwrap_or(0);

    Some(Insights {
        overall: Overview {
            total_questions: user.stats.total_questions,
            average_score: user.stats.average_score,
            level: user.level,
            level_name: user.level_name,
            experience: user.experience,
            rank,
        },
        streaks: Streaks {
            current: user.stats.current_streak,
            longest: user.stats.longest_streak,
            total_days_active: user.stats.total_days_active,
        },
        strengths: strengths(user),
        weaknesses: weaknesses(user),
        recommendations: recommendations(user),
        achievements: user.achievements.clone(),
        goals: goals(user),
    })
}

pub fn strengths(user: &User) -> Vec<Strength> {
    let mut out = Vec::new();
    if user.stats.average_score >= 85.0 {
        out.push(Strength {
            area: "Overall Performance",
            detail: format!("{:.1}%", user.stats.average_score),
        });
    }
    if user.stats.current_streak >= 7 {
        out.push(Strength {
            area: "Consistency",
            detail: format!("{} day streak", user.stats.current_streak),
        });
    }
    if user.level >= 10 {
        out.push(Strength {
            area: "Experience",
            detail: user.level_name.to_string(),
        });
    }
    out
}

pub fn weaknesses(user: &User) -> Vec<Weakness> {
    let mut out = Vec::new();
    if user.stats.average_score < 70.0 {
        out.push(Weakness {
            area: "Overall Performance",
            recommendation: "Focus on fundamental concepts",
        });
    }
    if user.stats.current_streak < 3 {
        out.push(Weakness {
            area: "Consistency",
            recommendation: "Try to practice daily",
        });
    }
    if user.stats.total_questions < 50 {
        out.push(Weakness {
            area: "Practice Volume",
            recommendation: "Complete more questions",
        });
    }
    out
}

pub fn recommendations(user: &User) -> Vec<String> {
    let stats = &user.stats;
    let mut out = Vec::new();

    match stats.current_streak {
        0 => out.push("Start a daily practice streak to build consistency!".to_string()),
        n if n < 7 => out.push(format!(
            "Keep going! You're {} day{} away from a weekly streak!",
            7 - n,
            if 7 - n == 1 { "" } else { "s" }
        )),
        _ => {}
    }

    let difficulty = if stats.average_score < 70.0 {
        "Focus on Foundation level questions to build confidence."
    } else if stats.average_score < 85.0 {
        "Try Standard difficulty questions to challenge yourself."
    } else {
        "Excellent! Try Distinction level questions to reach Grade 7!"
    };
    out.push(difficulty.to_string());

    if stats.total_questions < 20 {
        out.push("Complete more questions to unlock achievements and level up!".to_string());
    }
    out
}

fn goal(id: &'static str, name: &'static str, description: &'static str, value: f64, target: f64) -> Goal {
    Goal {
        id,
        name,
        description,
        progress: (value / target * 100.0).min(100.0),
        completed: value >= target,
    }
}

pub fn goals(user: &User) -> Vec<Goal> {
    let stats = &user.stats;
    vec![
        goal("streak_7", "Weekly Warrior", "Maintain a 7-day streak", stats.current_streak as f64, 7.0),
        goal("questions_100", "Century Club", "Complete 100 questions", stats.total_questions as f64, 100.0),
        goal("score_90", "Grade 7 Goal", "Achieve 90% average score", stats.average_score, 90.0),
        goal("level_advanced", "Advanced Tier", "Reach Advanced tier (Level 26+)", user.level as f64, 26.0),
        goal("level_expert", "Expert Tier", "Reach Expert tier (Level 51+)", user.level as f64, 51.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 20, 18, 0, 0).unwrap()
    }

    fn user() -> User {
        User::new("user_1", "alice", "a@x.com", "hash", "AA SL", now())
    }

    #[test]
    fn test_newcomer() {
        let u = user();
        assert!(strengths(&u).is_empty());
        assert_eq!(weaknesses(&u).len(), 3);
        let recs = recommendations(&u);
        assert_eq!(recs.len(), 3);
        assert!(recs[0].starts_with("Start a daily"));
        let goals = goals(&u);
        assert!(goals.iter().all(|g| !g.completed));
        assert!(goals[..3].iter().all(|g| g.progress == 0.0));
    }

    #[test]
    fn test_strong_user() {
        let mut u = user();
        u.stats.average_score = 92.0;
        u.stats.current_streak = 8;
        u.stats.total_questions = 150;
        u.level = 12;
        u.level_name = LevelTier::Intermediate;

        let areas: Vec<&str> = strengths(&u).iter().map(|s| s.area).collect();
        assert_eq!(areas, vec!["Overall Performance", "Consistency", "Experience"]);
        assert!(weaknesses(&u).is_empty());
        assert_eq!(recommendations(&u), vec!["Excellent! Try Distinction level questions to reach Grade 7!"]);

        let goals = goals(&u);
        assert_eq!(goals.len(), 5);
        assert!(goals[0].completed && goals[1].completed && goals[2].completed);
        assert_eq!(goals[0].progress, 100.0);
        assert!(!goals[3].completed);
    }

    #[test]
    fn test_streak_countdown() {
        let mut u = user();
        u.stats.current_streak = 6;
        assert_eq!(recommendations(&u)[0], "Keep going! You're 1 day away from a weekly streak!");
    }

    #[test]
    fn test_insights_include_rank() {
        let mut users = UserStore::load(Arc::new(MemoryStore::new()));
        let a = users.sign_up("alice", "a@x.com", "pw", "AA SL", now()).unwrap();
        users.record_attempt(&a.id, 10.0, 8.0, now()).unwrap();

        let report = insights(&users, &a.id).unwrap();
        assert_eq!(report.overall.rank, 1);
        assert_eq!(report.overall.total_questions, 1);
        assert_eq!(report.streaks.current, 1);
        assert!(insights(&users, "user_ghost").is_none());
    }
}
