// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! String key-value persistence for the session record.
//!
//! This is the portal's stand-in for the browser's persistent storage. All
//! reads are synchronous and infallible; writes report backend failures.
//!
//! - [`MemoryStore`]: process-local, used by tests and the `watch` command
//! - [`FileStore`]: a JSON object on disk, survives across CLI invocations

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{SessionError, SessionResult};

// =============================================================================
// SessionStore trait
// =============================================================================

/// A string-to-string key-value store.
pub trait SessionStore: Send + Sync {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    fn set(&self, key: &str, value: &str) -> SessionResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> SessionResult<()>;

    /// Returns the name of the backend, for logging.
    fn name(&self) -> &'static str;
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// File-backed store.
///
/// The whole map is kept in memory and written through on every mutation.
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a crash never leaves a half-written record. The cached map only
/// changes once the write has succeeded.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is discarded with a warning, matching how the portal treats a
    /// corrupted browser storage.
    pub fn open(path: impl Into<PathBuf>) -> SessionResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| SessionError::io(&path, e))?;
            match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding unreadable session file");
                    BTreeMap::new()
                }
            }
        } else {
            debug!(path = %path.display(), "Session file does not exist yet");
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| SessionError::io(parent, e))?;
            }
        }

        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content).map_err(|e| SessionError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| SessionError::io(&self.path, e))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        let mut entries = self.entries.write();
        if !entries.contains_key(key) {
            return Ok(());
        }

        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token"), Some("abc".to_string()));
        assert_eq!(store.len(), 1);

        store.remove("token").unwrap();
        store.remove("token").unwrap();
        assert_eq!(store.get("token"), None);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("userRole", "teacher").unwrap();
            store.set("isAuthenticated", "true").unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("userRole"), Some("teacher".to_string()));
        assert_eq!(store.get("isAuthenticated"), Some("true".to_string()));

        store.remove("userRole").unwrap();
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("userRole"), None);
    }

    #[test]
    fn test_file_store_discards_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("token"), None);

        store.set("token", "t").unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("token"), Some("t".to_string()));
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state").join("session.json");

        let store = FileStore::open(&path).unwrap();
        store.set("token", "t").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_store_failed_set_keeps_cache() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let store = FileStore::open(blocker.join("session.json")).unwrap();
        assert!(store.set("token", "t").is_err());
        assert_eq!(store.get("token"), None);
    }

    #[test]
    fn test_file_store_failed_remove_keeps_cache() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state");
        let store = FileStore::open(state.join("session.json")).unwrap();
        store.set("token", "t").unwrap();

        fs::remove_dir_all(&state).unwrap();
        fs::write(&state, "").unwrap();

        assert!(store.remove("token").is_err());
        assert_eq!(store.get("token"), Some("t".to_string()));
    }
}
