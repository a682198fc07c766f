// Progression: experience, levels, tiers and achievements
// All functions operate on one user record; "now" only stamps unlocks
// Level always tracks current experience, so losing streak experience can
// lower it. Earned level-up achievements are kept.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::models::user::{Achievement, LevelTier, User};
use crate::utils::config::TOP_PERFORMER_POSITION;
use crate::utils::points::{calculate_experience, level_for_experience};

/// Threshold achievement evaluated after every stat change
struct AchievementRule {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    /// Receives the user and their global leaderboard position, if ranked
    unlocked: fn(&User, Option<usize>) -> bool,
}

static ACHIEVEMENT_RULES: &[AchievementRule] = &[
    AchievementRule {
        id: "first_question",
        name: "Getting Started",
        description: "Complete your first question",
        icon: "🎓",
        unlocked: |u, _| u.stats.total_questions >= 1,
    },
    AchievementRule {
        id: "ten_questions",
        name: "Practice Makes Perfect",
        description: "Complete 10 questions",
        icon: "📚",
        unlocked: |u, _| u.stats.total_questions >= 10,
    },
    AchievementRule {
        id: "hundred_questions",
        name: "Dedicated Learner",
        description: "Complete 100 questions",
        icon: "🏆",
        unlocked: |u, _| u.stats.total_questions >= 100,
    },
    AchievementRule {
        id: "streak_7",
        name: "Weekly Warrior",
        description: "Maintain a 7-day streak",
        icon: "🔥",
        unlocked: |u, _| u.stats.current_streak >= 7,
    },
    AchievementRule {
        id: "streak_30",
        name: "Monthly Master",
        description: "Maintain a 30-day streak",
        icon: "⭐",
        unlocked: |u, _| u.stats.current_streak >= 30,
    },
    AchievementRule {
        id: "score_90",
        name: "Near Perfect",
        description: "Achieve 90% average score",
        icon: "💯",
        unlocked: |u, _| u.stats.total_marks > 0.0 && u.stats.average_score >= 90.0,
    },
    AchievementRule {
        id: "top_performer",
        name: "Top Performer",
        description: "Rank in top 10",
        icon: "👑",
        // Only users with at least one answered question count as ranked
        unlocked: |u, position| {
            u.stats.total_questions > 0
                && position.is_some_and(|p| p <= TOP_PERFORMER_POSITION)
        },
    },
];

/// Ids of every threshold achievement, in evaluation order
pub fn achievement_ids() -> Vec<&'static str> {
    ACHIEVEMENT_RULES.iter().map(|r| r.id).collect()
}

/// Achievement id awarded when a level-up crosses into `tier`
pub fn tier_achievement_id(tier: LevelTier) -> String {
    format!("tier_{}", tier.label().to_lowercase().replace(' ', "_"))
}

/// Achievement id for reaching a numeric level within the same tier.
/// Scoped by level so every level-up is recorded.
pub fn level_up_achievement_id(level: u32) -> String {
    format!("level_up_{}", level)
}

/// Recompute experience, level and tier from the user's stats and award a
/// tier or level-up achievement when the level rose. Returns new unlocks.
pub fn recalculate_level(user: &mut User, now: DateTime<Utc>) -> Vec<Achievement> {
    let old_level = user.level;
    let old_tier = LevelTier::for_level(old_level);

    user.experience = calculate_experience(&user.stats);
    user.level = level_for_experience(user.experience);
    user.level_name = LevelTier::for_level(user.level);

    if user.level <= old_level {
        return Vec::new();
    }

    info!(
        "User {} reached level {} ({})",
        user.username, user.level, user.level_name
    );

    let achievement = if user.level_name != old_tier {
        Achievement::new(
            &tier_achievement_id(user.level_name),
            &format!("{}!", user.level_name),
            &format!("You've reached {} tier!", user.level_name),
            if user.level_name == LevelTier::Expert { "🔥" } else { "🎯" },
            now,
        )
    } else {
        Achievement::new(
            &level_up_achievement_id(user.level),
            &format!("Level {}!", user.level),
            &format!("You've reached level {}!", user.level),
            "⭐",
            now,
        )
    };

    user.award(achievement).into_iter().collect()
}

/// Award every threshold achievement that is newly satisfied.
/// `global_position` is the user's 1-based place on the overall board.
pub fn check_achievements(
    user: &mut User,
    global_position: Option<usize>,
    now: DateTime<Utc>,
) -> Vec<Achievement> {
    let mut unlocked = Vec::new();

    for rule in ACHIEVEMENT_RULES {
        if user.has_achievement(rule.id) || !(rule.unlocked)(user, global_position) {
            continue;
        }
        let achievement = Achievement::new(rule.id, rule.name, rule.description, rule.icon, now);
        if let Some(a) = user.award(achievement) {
            info!("User {} unlocked achievement {}", user.username, a.id);
            unlocked.push(a);
        }
    }

    unlocked
}
