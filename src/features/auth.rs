// Authentication and user records
// Owns the users collection and the current-session pointer

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::{progress, ranking};
use crate::error::{MasteryError, Result};
use crate::models::user::{Achievement, StatsUpdate, User, UserStats};
use crate::storage::{self, KeyValueStore, SESSION_KEY, USERS_KEY};
use crate::utils::ids::generate_id;
use crate::utils::streak::{self, StreakChange};

// ============ Passwords ============

/// Salted argon2 hash in PHC string form
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            MasteryError::PasswordHash(e.to_string())
        })
}

/// Check a password against a stored PHC string
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

// ============ Session ============

/// Pointer to the signed-in user, persisted alongside the users collection
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    user_id: Option<String>,
}

impl Session {
    /// Restore the persisted pointer if it still names a known user
    fn load(store: Arc<dyn KeyValueStore>, users: &BTreeMap<String, User>) -> Self {
        let user_id = match store.get(SESSION_KEY) {
            Ok(Some(id)) if users.contains_key(&id) => Some(id),
            Ok(Some(id)) => {
                warn!("Session points at unknown user {}, ignoring", id);
                None
            }
            Ok(None) => None,
            Err(e) => {
                error!("Failed to read session: {:?}", e);
                None
            }
        };
        Self { store, user_id }
    }

    fn begin(&mut self, user_id: &str) {
        self.user_id = Some(user_id.to_string());
        if let Err(e) = self.store.set(SESSION_KEY, user_id) {
            error!("Failed to persist session: {:?}", e);
        }
    }

    fn end(&mut self) {
        self.user_id = None;
        if let Err(e) = self.store.remove(SESSION_KEY) {
            error!("Failed to clear session: {:?}", e);
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

// ============ User store ============

/// Users collection plus session
pub struct UserStore {
    store: Arc<dyn KeyValueStore>,
    users: BTreeMap<String, User>,
    session: Session,
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MasteryError::missing(field));
    }
    Ok(())
}

impl UserStore {
    /// Load users and the session pointer from storage
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let users: BTreeMap<String, User> = storage::load_json(store.as_ref(), USERS_KEY);
        let session = Session::load(store.clone(), &users);
        debug!("Loaded {} users", users.len());
        Self {
            store,
            users,
            session,
        }
    }

    /// Write the whole collection
    pub(crate) fn persist(&self) {
        storage::save_json(self.store.as_ref(), USERS_KEY, &self.users);
    }

    // ----- Lookups -----

    pub fn get(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    /// All users in stable (creation) order
    pub fn all(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.user_id().and_then(|id| self.users.get(id))
    }

    // ----- Account operations -----

    /// Register a new user and sign them in
    pub fn sign_up(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        course: &str,
        now: DateTime<Utc>,
    ) -> Result<User> {
        require(username, "username")?;
        require(email, "email")?;
        require(password, "password")?;
        require(course, "course")?;

        let taken = self
            .users
            .values()
            .any(|u| u.username == username || u.email == email);
        if taken {
            debug!("Signup rejected for {}: duplicate", username);
            return Err(MasteryError::Duplicate);
        }

        let password_hash = hash_password(password)?;
        let id = generate_id("user", now);
        let user = User::new(&id, username, email, &password_hash, course, now);
        self.users.insert(id.clone(), user);
        info!("New user signed up: {} ({})", username, id);

        self.begin_session(&id, now);
        self.persist();
        self.users
            .get(&id)
            .cloned()
            .ok_or_else(|| MasteryError::user_not_found(&id))
    }

    /// Sign in by username or email
    pub fn sign_in(&mut self, identifier: &str, password: &str, now: DateTime<Utc>) -> Result<User> {
        require(identifier, "username or email")?;
        require(password, "password")?;

        let id = self
            .users
            .values()
            .find(|u| {
                (u.username == identifier || u.email == identifier)
                    && verify_password(password, &u.password_hash)
            })
            .map(|u| u.id.clone())
            .ok_or(MasteryError::InvalidCredentials)?;

        self.begin_session(&id, now);
        self.persist();
        info!("User signed in: {}", id);
        self.users
            .get(&id)
            .cloned()
            .ok_or_else(|| MasteryError::user_not_found(&id))
    }

    /// Clear the session pointer; the user record is untouched
    pub fn sign_out(&mut self) {
        if let Some(id) = self.session.user_id() {
            info!("User signed out: {}", id);
        }
        self.session.end();
    }

    fn begin_session(&mut self, user_id: &str, now: DateTime<Utc>) {
        if let Some(user) = self.users.get_mut(user_id) {
            user.last_login = now;
            if streak::update_streak(&mut user.stats, now) != StreakChange::AlreadyCounted {
                debug!("Streak for {} is now {}", user.username, user.stats.current_streak);
            }
        }
        self.refresh_progress(user_id, now);
        self.session.begin(user_id);
    }

    // ----- Stat mutation -----

    /// Merge a partial update into the user's stats, then recompute level and
    /// achievements. Returns the achievements unlocked by the change.
    pub fn update_stats(
        &mut self,
        user_id: &str,
        update: &StatsUpdate,
        now: DateTime<Utc>,
    ) -> Result<Vec<Achievement>> {
        self.mutate_stats(user_id, now, |stats| update.apply(stats))
    }

    /// Count one answered question: streak, totals and derived fields
    pub fn record_attempt(
        &mut self,
        user_id: &str,
        total_marks: f64,
        earned_marks: f64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Achievement>> {
        self.mutate_stats(user_id, now, |stats| {
            streak::update_streak(stats, now);
            stats.total_questions += 1;
            stats.total_marks += total_marks;
            stats.earned_marks += earned_marks;
            stats.normalize();
        })
    }

    fn mutate_stats<F>(&mut self, user_id: &str, now: DateTime<Utc>, apply: F) -> Result<Vec<Achievement>>
    where
        F: FnOnce(&mut UserStats),
    {
        let user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| MasteryError::user_not_found(user_id))?;
        apply(&mut user.stats);

        let unlocked = self.refresh_progress(user_id, now);
        self.persist();
        Ok(unlocked)
    }

    /// Level first, then threshold achievements against the fresh global rank
    fn refresh_progress(&mut self, user_id: &str, now: DateTime<Utc>) -> Vec<Achievement> {
        let mut unlocked = match self.users.get_mut(user_id) {
            Some(user) => progress::recalculate_level(user, now),
            None => return Vec::new(),
        };

        let position = ranking::user_ranking(self.users.values(), user_id).map(|e| e.position);
        if let Some(user) = self.users.get_mut(user_id) {
            unlocked.extend(progress::check_achievements(user, position, now));
        }
        unlocked
    }

    // ----- Group back-references -----

    /// Add a group id to the user's list; false if the user is unknown
    pub(crate) fn link_group(&mut self, user_id: &str, group_id: &str) -> bool {
        match self.users.get_mut(user_id) {
            Some(user) => {
                if !user.is_in_group(group_id) {
                    user.groups.push(group_id.to_string());
                    self.persist();
                }
                true
            }
            None => false,
        }
    }

    pub(crate) fn unlink_group(&mut self, user_id: &str, group_id: &str) {
        if let Some(user) = self.users.get_mut(user_id) {
            let before = user.groups.len();
            user.groups.retain(|g| g != group_id);
            if user.groups.len() != before {
                self.persist();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap() + Duration::days(n)
    }

    fn store() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_sign_up_signs_in() {
        let mut users = UserStore::load(store());
        let user = users.sign_up("alice", "a@x.com", "pw1", "AA SL", day(0)).unwrap();

        assert_eq!(users.current_user().map(|u| u.id.as_str()), Some(user.id.as_str()));
        assert_eq!(user.stats.total_questions, 0);
        assert_eq!(user.stats.current_streak, 1);
        assert_ne!(user.password_hash, "pw1");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let mut users = UserStore::load(store());
        users.sign_up("alice", "a@x.com", "pw1", "AA SL", day(0)).unwrap();

        let err = users.sign_up("alice", "other@x.com", "pw2", "AA SL", day(0));
        assert_eq!(err.unwrap_err(), MasteryError::Duplicate);
        let err = users.sign_up("bob", "a@x.com", "pw2", "AA SL", day(0));
        assert_eq!(err.unwrap_err(), MasteryError::Duplicate);
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut users = UserStore::load(store());
        let err = users.sign_up("", "a@x.com", "pw", "AA SL", day(0)).unwrap_err();
        assert!(matches!(err, MasteryError::Validation(_)));
        let err = users.sign_in("alice", " ", day(0)).unwrap_err();
        assert!(matches!(err, MasteryError::Validation(_)));
        assert!(users.is_empty());
    }

    #[test]
    fn test_sign_in_by_username_or_email() {
        let mut users = UserStore::load(store());
        users.sign_up("alice", "a@x.com", "pw1", "AA SL", day(0)).unwrap();
        users.sign_out();
        assert!(users.current_user().is_none());

        assert!(users.sign_in("alice", "pw1", day(0)).is_ok());
        users.sign_out();
        assert!(users.sign_in("a@x.com", "pw1", day(0)).is_ok());
        assert_eq!(
            users.sign_in("alice", "wrong", day(0)).unwrap_err(),
            MasteryError::InvalidCredentials
        );
        assert_eq!(
            users.sign_in("nobody", "pw1", day(0)).unwrap_err(),
            MasteryError::InvalidCredentials
        );
    }

    #[test]
    fn test_daily_sign_in_streak() {
        let mut users = UserStore::load(store());
        users.sign_up("alice", "a@x.com", "pw1", "AA SL", day(0)).unwrap();

        let user = users.sign_in("alice", "pw1", day(1)).unwrap();
        assert_eq!(user.stats.current_streak, 2);
        assert_eq!(user.stats.total_days_active, 2);

        let user = users.sign_in("alice", "pw1", day(4)).unwrap();
        assert_eq!(user.stats.current_streak, 1);
        assert_eq!(user.stats.longest_streak, 2);
        assert_eq!(user.last_login, day(4));
    }

    #[test]
    fn test_sign_out_keeps_record() {
        let mut users = UserStore::load(store());
        let user = users.sign_up("alice", "a@x.com", "pw1", "AA SL", day(0)).unwrap();
        users.sign_out();
        assert_eq!(users.get(&user.id), Some(&user));
    }

    #[test]
    fn test_record_attempt_updates_stats() {
        let mut users = UserStore::load(store());
        let user = users.sign_up("alice", "a@x.com", "pw1", "AA SL", day(0)).unwrap();

        let unlocked = users.record_attempt(&user.id, 10.0, 8.0, day(0)).unwrap();
        let user = users.get(&user.id).unwrap();
        assert_eq!(user.stats.total_questions, 1);
        assert_eq!(user.stats.average_score, 80.0);
        assert!(user.experience > 0);
        assert!(user.has_achievement("first_question"));
        assert!(unlocked.iter().any(|a| a.id == "first_question"));
    }

    #[test]
    fn test_update_stats_is_partial() {
        let mut users = UserStore::load(store());
        let user = users.sign_up("alice", "a@x.com", "pw1", "AA SL", day(0)).unwrap();
        users.record_attempt(&user.id, 10.0, 5.0, day(0)).unwrap();

        let update = StatsUpdate {
            total_questions: Some(12),
            ..Default::default()
        };
        let unlocked = users.update_stats(&user.id, &update, day(0)).unwrap();
        let user = users.get(&user.id).unwrap();

        assert_eq!(user.stats.total_questions, 12);
        assert_eq!(user.stats.total_marks, 10.0);
        assert_eq!(user.stats.average_score, 50.0);
        assert!(unlocked.iter().any(|a| a.id == "ten_questions"));
        assert_eq!(user.level, crate::utils::points::level_for_experience(user.experience));
    }

    #[test]
    fn test_update_unknown_user() {
        let mut users = UserStore::load(store());
        let err = users.update_stats("ghost", &StatsUpdate::default(), day(0)).unwrap_err();
        assert_eq!(err, MasteryError::user_not_found("ghost"));
    }

    #[test]
    fn test_state_survives_reload() {
        let backend = store();
        let mut users = UserStore::load(backend.clone());
        let user = users.sign_up("alice", "a@x.com", "pw1", "AA SL", day(0)).unwrap();
        users.record_attempt(&user.id, 6.0, 6.0, day(0)).unwrap();

        let reloaded = UserStore::load(backend);
        assert_eq!(reloaded.current_user().map(|u| u.id.clone()), Some(user.id.clone()));
        assert_eq!(reloaded.get(&user.id), users.get(&user.id));
    }

    #[test]
    fn test_corrupt_users_reset() {
        let backend = store();
        backend.set(USERS_KEY, "[[[").unwrap();
        backend.set(SESSION_KEY, "user_missing").unwrap();

        let users = UserStore::load(backend);
        assert!(users.is_empty());
        assert!(users.current_user().is_none());
    }

    #[test]
    fn test_round_trip_collection() {
        let mut users = UserStore::load(store());
        let a = users.sign_up("alice", "a@x.com", "pw1", "AA SL", day(0)).unwrap();
        users.sign_up("bob", "b@x.com", "pw2", "AI HL", day(1)).unwrap();
        users.record_attempt(&a.id, 7.0, 5.5, day(2)).unwrap();

        let json = serde_json::to_string(&users.users).unwrap();
        let back: BTreeMap<String, User> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, users.users);
    }
}
