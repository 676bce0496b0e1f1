//! Persistent state store
//!
//! Durable key-value storage for the four state slices (user profile, task
//! list, history logs, chat transcript) backed by an embedded `sled`
//! database. Each slice is an independently serialized JSON blob; a missing
//! or corrupt slice never affects the others.

use crate::error::{ElevateError, Result};
use crate::model::{ChatMessage, HistoryLog, Task, UserProfile};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use std::path::{Path, PathBuf};

/// Storage key for the user profile slice
pub const KEY_USER: &str = "elevate_user";
/// Storage key for the task list slice
pub const KEY_TASKS: &str = "elevate_tasks";
/// Storage key for the history log slice (most-recent-first)
pub const KEY_HISTORY: &str = "elevate_history";
/// Storage key for the chat transcript slice (chronological)
pub const KEY_CHAT: &str = "elevate_chat";

/// All four state slices as loaded at startup
///
/// Absent or unreadable slices come back as that slice's empty/default
/// value; loading never fails as a whole.
#[derive(Debug, Default)]
pub struct StoreSnapshot {
    pub user: Option<UserProfile>,
    pub tasks: Vec<Task>,
    pub history: Vec<HistoryLog>,
    pub chat: Vec<ChatMessage>,
}

/// Durable store for the application state slices
///
/// Every save is a whole-slice overwrite followed by a flush, so a completed
/// action is never observably stale on the next start. There is no
/// transactional guarantee across slices; each one is independently
/// reloadable.
pub struct Store {
    db: Db,
}

impl Store {
    /// Open or create the store in the user's data directory
    ///
    /// The location can be overridden with the `ELEVATE_STORE` environment
    /// variable, which makes it easy to point the binary at a test database
    /// without touching the real one.
    ///
    /// # Errors
    ///
    /// Returns `ElevateError::Storage` if the data directory cannot be
    /// determined or the database cannot be opened.
    pub fn open_default() -> Result<Self> {
        if let Ok(override_path) = std::env::var("ELEVATE_STORE") {
            return Self::open(override_path);
        }

        let proj_dirs = ProjectDirs::from("app", "elevate", "elevate")
            .ok_or_else(|| ElevateError::Storage("Could not determine data directory".into()))?;
        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .map_err(|e| ElevateError::Storage(format!("Failed to create data directory: {}", e)))?;

        Self::open(data_dir.join("state.db"))
    }

    /// Open or create a store at the given path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the database directory
    ///
    /// # Errors
    ///
    /// Returns `ElevateError::Storage` if the database cannot be opened
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| ElevateError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }

    /// Load one slice, yielding `None` when the key is absent
    ///
    /// # Errors
    ///
    /// Returns `ElevateError::Storage` if the read or deserialization fails
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| ElevateError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| ElevateError::Storage(format!("Deserialization failed: {}", e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Load one slice, falling back to its default on absence or corruption
    ///
    /// A malformed persisted value is logged and discarded rather than
    /// surfaced; one bad slice must not take the others down with it.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!("Discarding unreadable slice {}: {}", key, e);
                T::default()
            }
        }
    }

    /// Save one slice as a whole-slice overwrite
    ///
    /// # Errors
    ///
    /// Returns `ElevateError::Storage` if serialization, insertion, or the
    /// flush fails
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| ElevateError::Storage(format!("Serialization failed: {}", e)))?;

        self.db
            .insert(key.as_bytes(), bytes)
            .map_err(|e| ElevateError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ElevateError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    /// Remove all four slices
    ///
    /// Used by logout; the caller discards its in-memory state afterwards so
    /// no stale value gets re-saved.
    ///
    /// # Errors
    ///
    /// Returns `ElevateError::Storage` if a removal or the flush fails
    pub fn clear(&self) -> Result<()> {
        for key in [KEY_USER, KEY_TASKS, KEY_HISTORY, KEY_CHAT] {
            self.db
                .remove(key.as_bytes())
                .map_err(|e| ElevateError::Storage(format!("Remove failed: {}", e)))?;
        }
        self.db
            .flush()
            .map_err(|e| ElevateError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }

    /// Load all four slices for process start
    ///
    /// Each slice is loaded independently; absence or corruption of one key
    /// yields that slice's default without failing the others.
    pub fn load_snapshot(&self) -> StoreSnapshot {
        let user = match self.load(KEY_USER) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Discarding unreadable slice {}: {}", KEY_USER, e);
                None
            }
        };

        StoreSnapshot {
            user,
            tasks: self.load_or_default(KEY_TASKS),
            history: self.load_or_default(KEY_HISTORY),
            chat: self.load_or_default(KEY_CHAT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Task, UserProfile};
    use chrono::Local;
    use serial_test::serial;
    use tempfile::tempdir;

    fn create_test_store() -> (Store, tempfile::TempDir) {
        let dir = tempdir().expect("failed to create tempdir");
        let store = Store::open(dir.path().join("state.db")).expect("failed to open store");
        (store, dir)
    }

    #[test]
    fn test_load_absent_key_returns_none() {
        let (store, _dir) = create_test_store();
        let user: Option<UserProfile> = store.load(KEY_USER).expect("load failed");
        assert!(user.is_none());
    }

    #[test]
    fn test_save_then_load_roundtrips_each_slice() {
        let (store, _dir) = create_test_store();
        let now = Local::now();

        let user = UserProfile::onboard("Sam");
        let tasks = vec![Task::new("Read", 20, "pages", now)];
        let history = vec![HistoryLog {
            date: "2026-01-15".to_string(),
            tasks: tasks.clone(),
            completion_rate: 40,
            summary: None,
        }];
        let chat = vec![ChatMessage::model("welcome", now)];

        store.save(KEY_USER, &user).expect("save user failed");
        store.save(KEY_TASKS, &tasks).expect("save tasks failed");
        store.save(KEY_HISTORY, &history).expect("save history failed");
        store.save(KEY_CHAT, &chat).expect("save chat failed");

        assert_eq!(store.load::<UserProfile>(KEY_USER).unwrap(), Some(user));
        assert_eq!(store.load::<Vec<Task>>(KEY_TASKS).unwrap(), Some(tasks));
        assert_eq!(
            store.load::<Vec<HistoryLog>>(KEY_HISTORY).unwrap(),
            Some(history)
        );
        assert_eq!(store.load::<Vec<ChatMessage>>(KEY_CHAT).unwrap(), Some(chat));
    }

    #[test]
    fn test_save_overwrites_whole_slice() {
        let (store, _dir) = create_test_store();
        let now = Local::now();

        let first = vec![Task::new("Read", 20, "pages", now)];
        store.save(KEY_TASKS, &first).expect("save failed");

        let second = vec![
            Task::new("Run", 5, "km", now),
            Task::new("Code", 2, "hours", now),
        ];
        store.save(KEY_TASKS, &second).expect("save failed");

        let loaded: Vec<Task> = store.load(KEY_TASKS).expect("load failed").unwrap();
        assert_eq!(loaded, second);
    }

    #[test]
    fn test_load_or_default_on_corrupt_slice() {
        let (store, _dir) = create_test_store();
        store
            .db
            .insert(KEY_TASKS.as_bytes(), &b"{not json"[..])
            .expect("raw insert failed");

        let tasks: Vec<Task> = store.load_or_default(KEY_TASKS);
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_clear_removes_all_slices() {
        let (store, _dir) = create_test_store();
        let now = Local::now();

        store
            .save(KEY_USER, &UserProfile::onboard("Sam"))
            .expect("save failed");
        store
            .save(KEY_TASKS, &vec![Task::new("Read", 20, "pages", now)])
            .expect("save failed");
        store
            .save(KEY_CHAT, &vec![ChatMessage::model("hi", now)])
            .expect("save failed");

        store.clear().expect("clear failed");

        let snapshot = store.load_snapshot();
        assert!(snapshot.user.is_none());
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.history.is_empty());
        assert!(snapshot.chat.is_empty());
    }

    #[test]
    fn test_snapshot_survives_one_corrupt_slice() {
        let (store, _dir) = create_test_store();
        let now = Local::now();

        store
            .save(KEY_TASKS, &vec![Task::new("Read", 20, "pages", now)])
            .expect("save failed");
        store
            .db
            .insert(KEY_USER.as_bytes(), &b"####"[..])
            .expect("raw insert failed");

        let snapshot = store.load_snapshot();
        assert!(snapshot.user.is_none());
        assert_eq!(snapshot.tasks.len(), 1);
    }

    #[test]
    #[serial]
    fn test_open_default_respects_env_override() {
        let dir = tempdir().expect("failed to create tempdir");
        let path = dir.path().join("nested").join("state.db");
        std::env::set_var("ELEVATE_STORE", path.to_string_lossy().to_string());

        let store = Store::open_default().expect("open failed with env override");
        store
            .save(KEY_USER, &UserProfile::onboard("Sam"))
            .expect("save failed");
        assert!(path.exists());

        std::env::remove_var("ELEVATE_STORE");
    }
}
