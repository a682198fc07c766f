// Key-value persistence
// Every collection is written as one JSON snapshot under a single key

pub mod file;
pub mod memory;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage key for the users collection
pub const USERS_KEY: &str = "users";
/// Storage key for the groups collection
pub const GROUPS_KEY: &str = "groups";
/// Storage key for the current session pointer
pub const SESSION_KEY: &str = "current_user_id";
/// Storage key for per-topic attempt statistics
pub const STATISTICS_KEY: &str = "statistics";
/// Storage key for the tutor conversation
pub const CHAT_HISTORY_KEY: &str = "chat_history";

/// String-valued key-value backend, the local-storage analogue
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Load a JSON document, falling back to `T::default()` when it is absent,
/// unreadable or corrupt.
pub fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored value for '{}', starting empty", key);
            return T::default();
        }
        Err(e) => {
            error!("Failed to read '{}' from storage: {:?}", key, e);
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse '{}', resetting: {}", key, e);
            T::default()
        }
    }
}

/// Serialize and write a whole collection. Failures are logged and reported
/// as `false`; the caller keeps its in-memory copy either way.
pub fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> bool
where
    T: Serialize + ?Sized,
{
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize '{}': {}", key, e);
            return false;
        }
    };

    match store.set(key, &json) {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to persist '{}': {:?}", key, e);
            false
        }
    }
}
