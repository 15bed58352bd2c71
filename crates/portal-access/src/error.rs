// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the access layer.
//!
//! Access decisions themselves never fail: every unknown or missing input
//! maps to a redirect or to a hidden menu entry. Errors only come from
//! loading menu definitions.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for access operations.
pub type AccessResult<T> = Result<T, AccessError>;

/// Errors raised while loading menu definitions.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Failed to read a menu file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a menu file.
    #[error("Failed to parse '{path}': {message}")]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// The file extension is not a supported format.
    #[error("Unsupported menu file format: {path}")]
    UnsupportedFormat {
        /// Path of the file.
        path: PathBuf,
    },

    /// A menu entry violates the leaf/group invariant.
    #[error("Invalid menu entry '{label}': {message}")]
    InvalidMenuEntry {
        /// Label of the offending entry.
        label: String,
        /// Error message.
        message: String,
    },
}

impl AccessError {
    /// Creates an I/O error.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Creates an invalid menu entry error.
    pub fn invalid_entry(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidMenuEntry {
            label: label.into(),
            message: message.into(),
        }
    }
}
