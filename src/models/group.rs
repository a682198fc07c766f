// Study group data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::user::LevelTier;

/// Cached leaderboard row for one group member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStanding {
    pub username: String,
    pub total_questions: u32,
    pub average_score: f64,
    pub current_streak: u32,
    pub level: u32,
    pub level_name: LevelTier,
    pub experience: u64,
    pub rank: usize,
}

/// Aggregate over current members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub total_questions: u32,
    /// Mean of member averages, one decimal place
    pub average_score: f64,
}

/// Time-boxed event inside a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub group_id: String,
    /// User id -> score
    pub participants: BTreeMap<String, f64>,
}

impl Competition {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && now <= self.end_date
    }
}

/// Full group record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    pub creator_id: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    /// Join order; the creator is always first
    pub members: Vec<String>,
    pub admins: Vec<String>,
    /// Derived cache, rebuilt on membership or stat changes
    pub leaderboard: BTreeMap<String, GroupStanding>,
    pub stats: GroupStats,
    pub competitions: Vec<Competition>,
}

impl Group {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        creator_id: &str,
        is_public: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            creator_id: creator_id.to_string(),
            is_public,
            created_at: now,
            members: vec![creator_id.to_string()],
            admins: vec![creator_id.to_string()],
            leaderboard: BTreeMap::new(),
            stats: GroupStats::default(),
            competitions: Vec::new(),
        }
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admins.iter().any(|a| a == user_id)
    }

    /// Cached standings ordered by rank
    pub fn standings(&self) -> Vec<(&str, &GroupStanding)> {
        let mut rows: Vec<(&str, &GroupStanding)> = self
            .leaderboard
            .iter()
            .map(|(id, standing)| (id.as_str(), standing))
            .collect();
        rows.sort_by_key(|(_, standing)| standing.rank);
        rows
    }
}
