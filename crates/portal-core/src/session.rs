// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session snapshots and the session context.
//!
//! The persisted record lives in a [`SessionStore`] under four string keys.
//! Consumers never hold on to a session: they take a [`Session`] snapshot by
//! synchronous read whenever they need one.
//!
//! All mutations go through [`SessionContext`], which serializes writes and
//! bumps a generation counter on each of them. Deferred work (the expiry
//! monitor) captures the generation when it is scheduled and passes it back
//! to [`SessionContext::expire`], so a stale expiry can never clobber a newer
//! login.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};
use crate::profile::UserProfile;
use crate::role::Role;
use crate::store::SessionStore;

/// Keys of the persisted session record.
pub mod keys {
    /// `"true"` when logged in, absent otherwise.
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";
    /// Bearer token.
    pub const TOKEN: &str = "token";
    /// One of `admin`, `teacher`, `student`.
    pub const USER_ROLE: &str = "userRole";
    /// JSON-encoded user profile.
    pub const CURRENT_USER: &str = "currentUser";

    /// Every key that belongs to the session record.
    pub const ALL: [&str; 4] = [IS_AUTHENTICATED, TOKEN, USER_ROLE, CURRENT_USER];
}

// =============================================================================
// Session snapshot
// =============================================================================

/// A point-in-time read of the session record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    /// Whether the user is logged in.
    pub is_authenticated: bool,
    /// Bearer token.
    pub token: Option<String>,
    /// Role from the `userRole` key.
    pub role: Option<Role>,
    /// Stored profile.
    pub current_user: Option<UserProfile>,
}

impl Session {
    /// An unauthenticated session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated session with the given role and nothing else.
    pub fn authenticated(role: Option<Role>) -> Self {
        Self {
            is_authenticated: true,
            role,
            ..Self::default()
        }
    }

    /// Reads the session from a store.
    ///
    /// Absent keys, unknown role strings and an unreadable profile all read
    /// as "not set".
    pub fn read(store: &dyn SessionStore) -> Self {
        let is_authenticated = store
            .get(keys::IS_AUTHENTICATED)
            .map(|v| v == "true")
            .unwrap_or(false);

        let token = store.get(keys::TOKEN).filter(|t| !t.is_empty());
        let role = store.get(keys::USER_ROLE).and_then(|r| Role::parse(&r));

        let current_user = store.get(keys::CURRENT_USER).and_then(|raw| {
            match serde_json::from_str::<UserProfile>(&raw) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable stored profile");
                    None
                }
            }
        });

        Self {
            is_authenticated,
            token,
            role,
            current_user,
        }
    }

    /// Sets the token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the profile.
    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.current_user = Some(profile);
        self
    }

    /// Role used for sidebar filtering.
    ///
    /// This is the profile's role, not the `userRole` key.
    pub fn menu_role(&self) -> Option<Role> {
        self.current_user.as_ref().and_then(|user| user.role)
    }
}

// =============================================================================
// Login
// =============================================================================

/// Data written at login.
#[derive(Debug, Clone)]
pub struct Login {
    /// Bearer token returned by the backend.
    pub token: String,
    /// Role of the user.
    pub role: Role,
    /// Profile of the user.
    pub profile: UserProfile,
}

impl Login {
    /// Creates a login record.
    pub fn new(token: impl Into<String>, role: Role, profile: UserProfile) -> Self {
        Self {
            token: token.into(),
            role,
            profile,
        }
    }
}

// =============================================================================
// SessionContext
// =============================================================================

/// Single owner of session mutations.
///
/// Cheap to clone; clones share the same store and generation.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn SessionStore>,
    generation: Mutex<u64>,
}

impl SessionContext {
    /// Creates a context over the given store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                generation: Mutex::new(0),
            }),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    /// Reads a snapshot of the current session.
    pub fn snapshot(&self) -> Session {
        Session::read(self.inner.store.as_ref())
    }

    /// Returns the current generation.
    pub fn generation(&self) -> u64 {
        *self.inner.generation.lock()
    }

    /// Writes a new session. Returns the new generation.
    pub fn login(&self, login: Login) -> SessionResult<u64> {
        if login.token.trim().is_empty() {
            return Err(SessionError::invalid_login("token is empty"));
        }

        let profile = serde_json::to_string(&login.profile)?;
        let mut generation = self.inner.generation.lock();
        let store = &self.inner.store;

        store.set(keys::TOKEN, &login.token)?;
        store.set(keys::USER_ROLE, login.role.as_str())?;
        store.set(keys::CURRENT_USER, &profile)?;
        store.set(keys::IS_AUTHENTICATED, "true")?;

        *generation += 1;
        info!(
            user_id = %login.profile.id,
            role = %login.role,
            generation = *generation,
            "Session started"
        );
        Ok(*generation)
    }

    /// Replaces the bearer token of the current session.
    ///
    /// Bumps the generation so monitors armed for the old token go stale.
    pub fn refresh_token(&self, token: &str) -> SessionResult<u64> {
        if token.trim().is_empty() {
            return Err(SessionError::invalid_login("token is empty"));
        }

        let mut generation = self.inner.generation.lock();
        self.inner.store.set(keys::TOKEN, token)?;
        *generation += 1;
        debug!(generation = *generation, "Session token refreshed");
        Ok(*generation)
    }

    /// Clears the session. Returns the new generation.
    pub fn logout(&self) -> SessionResult<u64> {
        let mut generation = self.inner.generation.lock();
        self.clear_locked()?;
        *generation += 1;
        info!(generation = *generation, "Session cleared by logout");
        Ok(*generation)
    }

    /// Clears the session if it is still the one armed at `armed_generation`.
    ///
    /// Returns `false` without touching the store when the session changed in
    /// the meantime.
    pub fn expire(&self, armed_generation: u64) -> SessionResult<bool> {
        let mut generation = self.inner.generation.lock();
        if *generation != armed_generation {
            debug!(
                armed = armed_generation,
                current = *generation,
                "Ignoring stale session expiry"
            );
            return Ok(false);
        }

        self.clear_locked()?;
        *generation += 1;
        warn!(generation = *generation, "Session expired, record cleared");
        Ok(true)
    }

    fn clear_locked(&self) -> SessionResult<()> {
        for key in keys::ALL {
            self.inner.store.remove(key)?;
        }
        Ok(())
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("store", &self.inner.store.name())
            .field("generation", &self.generation())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn context() -> SessionContext {
        SessionContext::new(Arc::new(MemoryStore::new()))
    }

    fn teacher_login() -> Login {
        Login::new(
            "header.payload.sig",
            Role::Teacher,
            UserProfile::new("10", "Marta", Some(Role::Teacher)).with_semester("3"),
        )
    }

    #[test]
    fn test_empty_store_is_anonymous() {
        let ctx = context();
        assert_eq!(ctx.snapshot(), Session::anonymous());
    }

    #[test]
    fn test_login_writes_all_keys() {
        let ctx = context();
        let generation = ctx.login(teacher_login()).unwrap();
        assert_eq!(generation, 1);

        let session = ctx.snapshot();
        assert!(session.is_authenticated);
        assert_eq!(session.token.as_deref(), Some("header.payload.sig"));
        assert_eq!(session.role, Some(Role::Teacher));
        assert_eq!(session.menu_role(), Some(Role::Teacher));
        assert_eq!(
            session.current_user.unwrap().assigned_semester(),
            Some("3")
        );
    }

    #[test]
    fn test_login_rejects_empty_token() {
        let ctx = context();
        let login = Login::new("  ", Role::Admin, UserProfile::new("1", "Root", Some(Role::Admin)));
        assert!(matches!(ctx.login(login), Err(SessionError::InvalidLogin { .. })));
        assert_eq!(ctx.generation(), 0);
    }

    #[test]
    fn test_logout_clears_everything() {
        let ctx = context();
        ctx.login(teacher_login()).unwrap();
        ctx.logout().unwrap();

        for key in keys::ALL {
            assert_eq!(ctx.store().get(key), None);
        }
        assert!(!ctx.snapshot().is_authenticated);
    }

    #[test]
    fn test_expire_with_current_generation() {
        let ctx = context();
        let generation = ctx.login(teacher_login()).unwrap();

        assert!(ctx.expire(generation).unwrap());
        assert_eq!(ctx.snapshot(), Session::anonymous());
    }

    #[test]
    fn test_stale_expire_does_not_clobber_new_login() {
        let ctx = context();
        let first = ctx.login(teacher_login()).unwrap();
        ctx.logout().unwrap();
        ctx.login(teacher_login()).unwrap();

        assert!(!ctx.expire(first).unwrap());
        assert!(ctx.snapshot().is_authenticated);
    }

    #[test]
    fn test_refresh_token_bumps_generation() {
        let ctx = context();
        let generation = ctx.login(teacher_login()).unwrap();
        let refreshed = ctx.refresh_token("new.token.value").unwrap();

        assert!(refreshed > generation);
        assert!(!ctx.expire(generation).unwrap());
        assert_eq!(ctx.snapshot().token.as_deref(), Some("new.token.value"));
    }

    #[test]
    fn test_read_tolerates_bad_values() {
        let store = MemoryStore::new();
        store.set(keys::IS_AUTHENTICATED, "yes").unwrap();
        store.set(keys::USER_ROLE, "janitor").unwrap();
        store.set(keys::CURRENT_USER, "{broken").unwrap();
        store.set(keys::TOKEN, "").unwrap();

        let session = Session::read(&store);
        assert!(!session.is_authenticated);
        assert_eq!(session.role, None);
        assert_eq!(session.current_user, None);
        assert_eq!(session.token, None);
    }

    #[test]
    fn test_menu_role_comes_from_profile() {
        let store = MemoryStore::new();
        store.set(keys::IS_AUTHENTICATED, "true").unwrap();
        store.set(keys::USER_ROLE, "admin").unwrap();
        store
            .set(keys::CURRENT_USER, r#"{"id": 5, "name": "Leo", "type": "student"}"#)
            .unwrap();

        let session = Session::read(&store);
        assert_eq!(session.role, Some(Role::Admin));
        assert_eq!(session.menu_role(), Some(Role::Student));
    }
}
