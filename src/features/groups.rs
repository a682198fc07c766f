// Study groups: lifecycle, membership and cached leaderboards

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::auth::UserStore;
use super::ranking;
use crate::error::{MasteryError, Result};
use crate::models::group::{Competition, Group, GroupStanding};
use crate::storage::{self, KeyValueStore, GROUPS_KEY};
use crate::utils::ids::generate_id;

/// Groups collection
pub struct GroupStore {
    store: Arc<dyn KeyValueStore>,
    groups: BTreeMap<String, Group>,
}

impl GroupStore {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let groups: BTreeMap<String, Group> = storage::load_json(store.as_ref(), GROUPS_KEY);
        debug!("Loaded {} groups", groups.len());
        Self { store, groups }
    }

    fn persist(&self) {
        storage::save_json(self.store.as_ref(), GROUPS_KEY, &self.groups);
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get_group(&self, group_id: &str) -> Option<&Group> {
        self.groups.get(group_id)
    }

    /// Public groups, newest first
    pub fn public_groups(&self) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self.groups.values().filter(|g| g.is_public).collect();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        groups
    }

    /// Groups the user lists that still exist
    pub fn user_groups(&self, user_id: &str, users: &UserStore) -> Vec<&Group> {
        users
            .get(user_id)
            .map(|user| {
                user.groups
                    .iter()
                    .filter_map(|id| self.groups.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    // ============ Membership ============

    /// Create a group with the creator as its sole member and admin
    pub fn create_group(
        &mut self,
        name: &str,
        description: &str,
        creator_id: &str,
        is_public: bool,
        users: &mut UserStore,
        now: DateTime<Utc>,
    ) -> Result<Group> {
        if name.trim().is_empty() {
            return Err(MasteryError::missing("name"));
        }
        if creator_id.trim().is_empty() {
            return Err(MasteryError::missing("creator"));
        }
        if users.get(creator_id).is_none() {
            return Err(MasteryError::user_not_found(creator_id));
        }

        let id = generate_id("group", now);
        let group = Group::new(&id, name.trim(), description.trim(), creator_id, is_public, now);
        self.groups.insert(id.clone(), group);
        users.link_group(creator_id, &id);
        info!("Group {} ({}) created by {}", name, id, creator_id);

        self.rebuild_leaderboard(&id, users);
        self.persist();
        self.groups
            .get(&id)
            .cloned()
            .ok_or_else(|| MasteryError::group_not_found(&id))
    }

    /// Add a user to a group. A repeat join leaves membership unchanged.
    pub fn join_group(&mut self, group_id: &str, user_id: &str, users: &mut UserStore) -> Result<Group> {
        if users.get(user_id).is_none() {
            return Err(MasteryError::user_not_found(user_id));
        }
        let group = self
            .groups
            .get_mut(group_id)
            .ok_or_else(|| MasteryError::group_not_found(group_id))?;
        if group.is_member(user_id) {
            return Err(MasteryError::AlreadyMember {
                group_id: group_id.to_string(),
            });
        }

        group.members.push(user_id.to_string());
        users.link_group(user_id, group_id);
        info!("User {} joined group {}", user_id, group_id);

        self.rebuild_leaderboard(group_id, users);
        self.persist();
        self.groups
            .get(group_id)
            .cloned()
            .ok_or_else(|| MasteryError::group_not_found(group_id))
    }

    /// Remove a user from a group; no-op if they are not a member
    pub fn leave_group(&mut self, group_id: &str, user_id: &str, users: &mut UserStore) -> Result<()> {
        let group = self
            .groups
            .get_mut(group_id)
            .ok_or_else(|| MasteryError::group_not_found(group_id))?;
        if !group.is_member(user_id) {
            return Ok(());
        }
        if group.creator_id == user_id {
            return Err(MasteryError::Validation(
                "the group creator cannot leave the group".to_string(),
            ));
        }

        group.members.retain(|m| m != user_id);
        group.admins.retain(|a| a != user_id);
        users.unlink_group(user_id, group_id);
        info!("User {} left group {}", user_id, group_id);

        self.rebuild_leaderboard(group_id, users);
        self.persist();
        Ok(())
    }

    // ============ Leaderboards ============

    fn rebuild_leaderboard(&mut self, group_id: &str, users: &UserStore) -> bool {
        match self.groups.get_mut(group_id) {
            Some(group) => {
                let (leaderboard, stats) = ranking::group_standings(&group.members, users);
                group.leaderboard = leaderboard;
                group.stats = stats;
                true
            }
            None => false,
        }
    }

    /// Recompute and persist one group's cached leaderboard
    pub fn refresh_leaderboard(&mut self, group_id: &str, users: &UserStore) {
        if self.rebuild_leaderboard(group_id, users) {
            self.persist();
        }
    }

    /// Fresh standings in rank order; empty for an unknown group
    pub fn group_leaderboard(&mut self, group_id: &str, users: &UserStore) -> Vec<(String, GroupStanding)> {
        self.refresh_leaderboard(group_id, users);
        self.groups
            .get(group_id)
            .map(|g| {
                g.standings()
                    .into_iter()
                    .map(|(id, standing)| (id.to_string(), standing.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Rebuild every group the user belongs to, after their stats changed
    pub fn refresh_user_groups(&mut self, user_id: &str, users: &UserStore) {
        let ids: Vec<String> = self
            .groups
            .values()
            .filter(|g| g.is_member(user_id))
            .map(|g| g.id.clone())
            .collect();
        if ids.is_empty() {
            return;
        }
        for id in &ids {
            self.rebuild_leaderboard(id, users);
        }
        debug!("Refreshed {} group leaderboards for {}", ids.len(), user_id);
        self.persist();
    }

    // ============ Competitions ============

    pub fn create_competition(
        &mut self,
        group_id: &str,
        name: &str,
        description: &str,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Competition> {
        if name.trim().is_empty() {
            return Err(MasteryError::missing("name"));
        }
        if end_date <= start_date {
            return Err(MasteryError::Validation(
                "competition must end after it starts".to_string(),
            ));
        }
        let group = self
            .groups
            .get_mut(group_id)
            .ok_or_else(|| MasteryError::group_not_found(group_id))?;

        let competition = Competition {
            id: generate_id("comp", start_date),
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            start_date,
            end_date,
            group_id: group_id.to_string(),
            participants: BTreeMap::new(),
        };
        group.competitions.push(competition.clone());
        info!("Competition {} added to group {}", competition.id, group_id);

        self.persist();
        Ok(competition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 7, 9, 30, 0).unwrap()
    }

    struct Fixture {
        backend: Arc<dyn KeyValueStore>,
        users: UserStore,
        groups: GroupStore,
        alice: String,
        bob: String,
    }

    fn fixture() -> Fixture {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut users = UserStore::load(backend.clone());
        let alice = users.sign_up("alice", "a@x.com", "pw1", "AA SL", now()).unwrap().id;
        let bob = users.sign_up("bob", "b@x.com", "pw2", "AA SL", now()).unwrap().id;
        let groups = GroupStore::load(backend.clone());
        Fixture {
            backend,
            users,
            groups,
            alice,
            bob,
        }
    }

    #[test]
    fn test_create_group() {
        let mut f = fixture();
        let group = f
            .groups
            .create_group("Calc Crew", "derivatives", &f.alice, true, &mut f.users, now())
            .unwrap();

        assert_eq!(group.members, vec![f.alice.clone()]);
        assert!(group.is_admin(&f.alice));
        assert_eq!(group.leaderboard.len(), 1);
        assert!(f.users.get(&f.alice).unwrap().is_in_group(&group.id));
    }

    #[test]
    fn test_create_group_validation() {
        let mut f = fixture();
        let err = f
            .groups
            .create_group(" ", "", &f.alice, true, &mut f.users, now())
            .unwrap_err();
        assert!(matches!(err, MasteryError::Validation(_)));
        let err = f
            .groups
            .create_group("G", "", "", true, &mut f.users, now())
            .unwrap_err();
        assert!(matches!(err, MasteryError::Validation(_)));
        assert!(f.groups.is_empty());
    }

    #[test]
    fn test_join_ranks_two_members() {
        let mut f = fixture();
        let group = f
            .groups
            .create_group("G", "", &f.alice, true, &mut f.users, now())
            .unwrap();
        f.users.record_attempt(&f.bob, 10.0, 9.0, now()).unwrap();
        f.groups.join_group(&group.id, &f.bob, &mut f.users).unwrap();

        let board = f.groups.group_leaderboard(&group.id, &f.users);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].0, f.bob);
        assert_eq!(board[0].1.rank, 1);
        assert_eq!(board[1].1.rank, 2);
    }

    #[test]
    fn test_join_twice_is_idempotent() {
        let mut f = fixture();
        let group = f
            .groups
            .create_group("G", "", &f.alice, true, &mut f.users, now())
            .unwrap();
        f.groups.join_group(&group.id, &f.bob, &mut f.users).unwrap();
        let err = f.groups.join_group(&group.id, &f.bob, &mut f.users).unwrap_err();

        assert!(matches!(err, MasteryError::AlreadyMember { .. }));
        let group = f.groups.get_group(&group.id).unwrap();
        assert_eq!(group.members.iter().filter(|m| **m == f.bob).count(), 1);
        assert_eq!(f.users.get(&f.bob).unwrap().groups.len(), 1);
    }

    #[test]
    fn test_join_unknown() {
        let mut f = fixture();
        let err = f.groups.join_group("group_nope", &f.bob, &mut f.users).unwrap_err();
        assert_eq!(err, MasteryError::group_not_found("group_nope"));

        let group = f
            .groups
            .create_group("G", "", &f.alice, true, &mut f.users, now())
            .unwrap();
        let err = f.groups.join_group(&group.id, "user_ghost", &mut f.users).unwrap_err();
        assert_eq!(err, MasteryError::user_not_found("user_ghost"));
    }

    #[test]
    fn test_leave_group() {
        let mut f = fixture();
        let group = f
            .groups
            .create_group("G", "", &f.alice, true, &mut f.users, now())
            .unwrap();
        f.groups.join_group(&group.id, &f.bob, &mut f.users).unwrap();
        f.groups.leave_group(&group.id, &f.bob, &mut f.users).unwrap();

        let stored = f.groups.get_group(&group.id).unwrap();
        assert_eq!(stored.members, vec![f.alice.clone()]);
        assert_eq!(
            stored.leaderboard.keys().cloned().collect::<Vec<_>>(),
            stored.members
        );
        assert!(f.users.get(&f.bob).unwrap().groups.is_empty());

        // Not a member any more: no-op
        assert!(f.groups.leave_group(&group.id, &f.bob, &mut f.users).is_ok());
        assert!(matches!(
            f.groups.leave_group(&group.id, &f.alice, &mut f.users),
            Err(MasteryError::Validation(_))
        ));
    }

    #[test]
    fn test_public_and_user_groups() {
        let mut f = fixture();
        let public = f
            .groups
            .create_group("Open", "", &f.alice, true, &mut f.users, now())
            .unwrap();
        f.groups
            .create_group("Closed", "", &f.alice, false, &mut f.users, now() + Duration::seconds(1))
            .unwrap();

        let listed: Vec<&str> = f.groups.public_groups().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(listed, vec![public.id.as_str()]);
        assert_eq!(f.groups.user_groups(&f.alice, &f.users).len(), 2);
        assert!(f.groups.user_groups(&f.bob, &f.users).is_empty());
    }

    #[test]
    fn test_dangling_group_reference_filtered() {
        let mut f = fixture();
        f.users.link_group(&f.bob, "group_deleted");
        assert!(f.groups.user_groups(&f.bob, &f.users).is_empty());
    }

    #[test]
    fn test_refresh_user_groups() {
        let mut f = fixture();
        let group = f
            .groups
            .create_group("G", "", &f.alice, true, &mut f.users, now())
            .unwrap();
        f.users.record_attempt(&f.alice, 8.0, 8.0, now()).unwrap();
        f.groups.refresh_user_groups(&f.alice, &f.users);

        let stored = f.groups.get_group(&group.id).unwrap();
        assert_eq!(stored.leaderboard[&f.alice].total_questions, 1);
        assert_eq!(stored.stats.total_questions, 1);
        assert_eq!(stored.stats.average_score, 100.0);
    }

    #[test]
    fn test_competitions() {
        let mut f = fixture();
        let group = f
            .groups
            .create_group("G", "", &f.alice, true, &mut f.users, now())
            .unwrap();
        let comp = f
            .groups
            .create_competition(&group.id, "Sprint", "week one", now(), now() + Duration::days(7))
            .unwrap();

        assert!(comp.is_active(now() + Duration::days(1)));
        assert_eq!(f.groups.get_group(&group.id).unwrap().competitions.len(), 1);
        assert!(f
            .groups
            .create_competition(&group.id, "Backwards", "", now(), now() - Duration::days(1))
            .is_err());
        assert!(f
            .groups
            .create_competition("group_nope", "X", "", now(), now() + Duration::days(1))
            .is_err());
    }

    #[test]
    fn test_groups_round_trip() {
        let mut f = fixture();
        let group = f
            .groups
            .create_group("G", "", &f.alice, true, &mut f.users, now())
            .unwrap();
        f.groups.join_group(&group.id, &f.bob, &mut f.users).unwrap();

        let reloaded = GroupStore::load(f.backend.clone());
        assert_eq!(reloaded.groups, f.groups.groups);
    }
}
