// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for session persistence.
//!
//! Reads from the session store never fail from the caller's point of view:
//! a missing or corrupt record is simply "no session". Errors surface only
//! from writes and from backends with real I/O (the file store).

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors raised by session stores and the session context.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Failed to read or write the backing file.
    #[error("Session store I/O error at '{path}': {source}")]
    Io {
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The persisted data could not be encoded or decoded.
    #[error("Session serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// A login was attempted with incomplete data.
    #[error("Invalid login: {message}")]
    InvalidLogin {
        /// Error message.
        message: String,
    },
}

impl SessionError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates an invalid login error.
    pub fn invalid_login(message: impl Into<String>) -> Self {
        Self::InvalidLogin {
            message: message.into(),
        }
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Serialization { .. } => "serialization",
            Self::InvalidLogin { .. } => "invalid_login",
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SessionError::invalid_login("token is empty");
        assert_eq!(err.to_string(), "Invalid login: token is empty");
        assert_eq!(err.error_type(), "invalid_login");
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = SessionError::io(
            "/tmp/session.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/session.json"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
