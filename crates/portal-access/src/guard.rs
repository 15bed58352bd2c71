// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route guard.
//!
//! The guard is a pure function of the session snapshot and the route's
//! allowed roles. It must be evaluated on every navigation; nothing is cached
//! between evaluations.

use serde::{Deserialize, Serialize};
use tracing::debug;

use portal_core::{Role, Session};

/// Default login page.
pub const LOGIN_PATH: &str = "/login";

/// Default "access denied" page.
pub const FORBIDDEN_PATH: &str = "/403";

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "target", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Render the guarded view.
    Allow,
    /// Send the user elsewhere.
    RedirectTo(String),
}

impl GuardDecision {
    /// Returns `true` for [`GuardDecision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    /// Returns the redirect target, if any.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::RedirectTo(target) => Some(target),
        }
    }
}

/// Route guard with configurable redirect targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteGuard {
    /// Where unauthenticated users are sent.
    pub login_path: String,
    /// Where users without a permitted role are sent.
    pub forbidden_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self {
            login_path: LOGIN_PATH.to_string(),
            forbidden_path: FORBIDDEN_PATH.to_string(),
        }
    }
}

impl RouteGuard {
    /// Creates a guard with the given redirect targets.
    pub fn new(login_path: impl Into<String>, forbidden_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            forbidden_path: forbidden_path.into(),
        }
    }

    /// Evaluates the guard.
    ///
    /// An empty `allowed_roles` slice is treated like `None`. A missing role
    /// on a restricted route is denied.
    pub fn check(&self, session: &Session, allowed_roles: Option<&[Role]>) -> GuardDecision {
        if !session.is_authenticated {
            debug!(target = %self.login_path, "guard: not authenticated");
            return GuardDecision::RedirectTo(self.login_path.clone());
        }

        if let Some(allowed) = allowed_roles.filter(|roles| !roles.is_empty()) {
            let permitted = session.role.is_some_and(|role| allowed.contains(&role));
            if !permitted {
                debug!(
                    role = ?session.role,
                    allowed = ?allowed,
                    "guard: role not permitted"
                );
                return GuardDecision::RedirectTo(self.forbidden_path.clone());
            }
        }

        GuardDecision::Allow
    }
}

/// Evaluates the guard with the default redirect targets.
pub fn guard(session: &Session, allowed_roles: Option<&[Role]>) -> GuardDecision {
    RouteGuard::default().check(session, allowed_roles)
}
