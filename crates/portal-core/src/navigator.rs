// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Location and history.

use parking_lot::RwLock;
use tracing::debug;

/// Something that can change the current location.
pub trait Navigator: Send + Sync {
    /// Navigates to `path`, adding a history entry.
    fn push(&self, path: &str);

    /// Navigates to `path`, replacing the current history entry.
    fn replace(&self, path: &str);

    /// Returns the current location.
    fn current(&self) -> String;
}

/// In-memory history stack.
#[derive(Debug)]
pub struct HistoryNavigator {
    entries: RwLock<Vec<String>>,
}

impl HistoryNavigator {
    /// Creates a history starting at `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: RwLock::new(vec![initial.into()]),
        }
    }

    /// Returns a copy of the history, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.read().clone()
    }

    /// Returns the number of history entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Always `false`; a history has at least its initial entry.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for HistoryNavigator {
    fn push(&self, path: &str) {
        debug!(path, "history push");
        self.entries.write().push(path.to_string());
    }

    fn replace(&self, path: &str) {
        debug!(path, "history replace");
        let mut entries = self.entries.write();
        match entries.last_mut() {
            Some(last) => *last = path.to_string(),
            None => entries.push(path.to_string()),
        }
    }

    fn current(&self) -> String {
        self.entries.read().last().cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_replace() {
        let history = HistoryNavigator::new("/login");
        history.push("/dashboard");
        assert_eq!(history.current(), "/dashboard");
        assert_eq!(history.len(), 2);

        history.replace("/login");
        assert_eq!(history.current(), "/login");
        assert_eq!(history.entries(), vec!["/login", "/login"]);
    }
}
