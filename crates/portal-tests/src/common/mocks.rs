// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Stand-ins for the navigator and the session store.
//!
//! - [`RecordingNavigator`] records every push and replace in order
//! - [`FailingStore`] wraps a [`MemoryStore`] and fails writes or removals on
//!   demand

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use portal_core::{MemoryStore, Navigator, SessionError, SessionResult, SessionStore};

// =============================================================================
// Recording Navigator
// =============================================================================

/// A navigation performed through [`Navigator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationCall {
    /// `push(path)`
    Push(String),
    /// `replace(path)`
    Replace(String),
}

/// Navigator that records calls and keeps a history stack.
#[derive(Debug)]
pub struct RecordingNavigator {
    calls: Mutex<Vec<NavigationCall>>,
    history: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Creates a navigator currently at `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            history: Mutex::new(vec![initial.into()]),
        }
    }

    /// Returns all recorded calls.
    pub fn calls(&self) -> Vec<NavigationCall> {
        self.calls.lock().clone()
    }

    /// Returns the paths passed to `replace`.
    pub fn replacements(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                NavigationCall::Replace(path) => Some(path.clone()),
                NavigationCall::Push(_) => None,
            })
            .collect()
    }

    /// Returns the number of history entries.
    pub fn history_len(&self) -> usize {
        self.history.lock().len()
    }

    /// Clears the recorded calls, keeping the history.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

impl Default for RecordingNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, path: &str) {
        self.calls.lock().push(NavigationCall::Push(path.to_string()));
        self.history.lock().push(path.to_string());
    }

    fn replace(&self, path: &str) {
        self.calls
            .lock()
            .push(NavigationCall::Replace(path.to_string()));
        let mut history = self.history.lock();
        match history.last_mut() {
            Some(last) => *last = path.to_string(),
            None => history.push(path.to_string()),
        }
    }

    fn current(&self) -> String {
        self.history.lock().last().cloned().unwrap_or_default()
    }
}

// =============================================================================
// Failing Store
// =============================================================================

/// Memory store with switchable failures.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_set: AtomicBool,
    fail_remove: AtomicBool,
}

impl FailingStore {
    /// Creates a store that does not fail yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `set` fail from now on.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_set.store(fail, Ordering::SeqCst);
    }

    /// Makes every `remove` fail from now on.
    pub fn fail_removals(&self, fail: bool) {
        self.fail_remove.store(fail, Ordering::SeqCst);
    }

    fn injected(operation: &str) -> SessionError {
        SessionError::io(
            "failing-store",
            std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("injected {} failure", operation),
            ),
        )
    }
}

impl SessionStore for FailingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(Self::injected("set"));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(Self::injected("remove"));
        }
        self.inner.remove(key)
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_navigator() {
        let nav = RecordingNavigator::new("/perfil");
        nav.push("/forum");
        nav.replace("/login");

        assert_eq!(nav.current(), "/login");
        assert_eq!(nav.history_len(), 2);
        assert_eq!(
            nav.calls(),
            vec![
                NavigationCall::Push("/forum".to_string()),
                NavigationCall::Replace("/login".to_string()),
            ]
        );
        assert_eq!(nav.replacements(), vec!["/login".to_string()]);
    }

    #[test]
    fn test_failing_store() {
        let store = FailingStore::new();
        store.set("token", "abc").unwrap();
        store.fail_removals(true);
        assert!(store.remove("token").is_err());
        assert_eq!(store.get("token").as_deref(), Some("abc"));

        store.fail_writes(true);
        assert!(store.set("token", "def").is_err());
    }
}
