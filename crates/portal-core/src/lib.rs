// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # portal-core
//!
//! Shared session model for the Defensa Integral portal.
//!
//! This crate provides the types every access-control component consumes:
//!
//! - **Role**: `admin`, `teacher`, `student`
//! - **UserProfile**: stored user attributes, with the legacy role fields
//!   (`role` / `permission` / `type`) normalized on read
//! - **Store**: the string key-value persistence behind the session
//! - **Session**: snapshots and the [`SessionContext`] that owns mutations
//! - **Navigator**: location and history, used for forced redirects
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use portal_core::{Login, MemoryStore, Role, SessionContext, UserProfile};
//!
//! let ctx = SessionContext::new(Arc::new(MemoryStore::new()));
//! let profile = UserProfile::new("7", "Rosa", Some(Role::Student));
//! ctx.login(Login::new("a.b.c", Role::Student, profile)).unwrap();
//!
//! let session = ctx.snapshot();
//! assert!(session.is_authenticated);
//! assert_eq!(session.role, Some(Role::Student));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod navigator;
pub mod profile;
pub mod role;
pub mod session;
pub mod store;

pub use error::{SessionError, SessionResult};
pub use navigator::{HistoryNavigator, Navigator};
pub use profile::UserProfile;
pub use role::Role;
pub use session::{keys, Login, Session, SessionContext};
pub use store::{FileStore, MemoryStore, SessionStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
