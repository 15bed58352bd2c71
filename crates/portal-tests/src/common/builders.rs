// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! Fluent builders for sessions and expiry monitor setups.

use std::sync::Arc;

use portal_core::{MemoryStore, Role, SessionContext, SessionStore, UserProfile};
use portal_expiry::{ExpiryMonitor, ManualClock, MonitorConfig};

use super::fixtures::{ProfileFixtures, TokenFixtures, NOW};
use super::mocks::RecordingNavigator;

// =============================================================================
// Session Builder
// =============================================================================

/// Builder for a [`SessionContext`] with a stored login.
#[derive(Default)]
pub struct SessionBuilder {
    role: Option<Role>,
    token: Option<String>,
    profile: Option<UserProfile>,
    store: Option<Arc<dyn SessionStore>>,
}

impl SessionBuilder {
    /// Creates a builder for an anonymous session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs in as `role`.
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Uses `token` as the bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Uses a token expiring `secs` after [`NOW`].
    pub fn expires_in(self, secs: i64) -> Self {
        self.token(TokenFixtures::expiring_in(secs))
    }

    /// Stores `profile` instead of the role's fixture profile.
    pub fn profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Backs the session with `store`.
    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the context. Without a role nothing is written.
    pub fn build(self) -> SessionContext {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn SessionStore>);
        let ctx = SessionContext::new(store);

        if let Some(role) = self.role {
            let token = self
                .token
                .unwrap_or_else(|| TokenFixtures::expiring_in(3600));
            let profile = self
                .profile
                .unwrap_or_else(|| ProfileFixtures::for_role(role));
            ctx.login(portal_core::Login::new(token, role, profile))
                .expect("Failed to write fixture session");
        }

        ctx
    }
}

// =============================================================================
// Monitor Harness
// =============================================================================

/// An expiry monitor wired to a recording navigator and a frozen clock.
pub struct MonitorHarness {
    /// Session shared with the monitor.
    pub ctx: SessionContext,
    /// Navigator the monitor redirects through.
    pub navigator: Arc<RecordingNavigator>,
    /// Clock the monitor reads at mount.
    pub clock: Arc<ManualClock>,
    /// The monitor.
    pub monitor: ExpiryMonitor,
}

/// Builder for [`MonitorHarness`].
pub struct MonitorHarnessBuilder {
    session: SessionBuilder,
    config: MonitorConfig,
    location: String,
}

impl MonitorHarnessBuilder {
    /// A student session with a token expiring in an hour, at `/perfil`.
    pub fn new() -> Self {
        Self {
            session: SessionBuilder::new().role(Role::Student),
            config: MonitorConfig::default(),
            location: "/perfil".to_string(),
        }
    }

    /// Replaces the session builder.
    pub fn session(mut self, session: SessionBuilder) -> Self {
        self.session = session;
        self
    }

    /// Uses a token expiring `secs` after [`NOW`].
    pub fn expires_in(mut self, secs: i64) -> Self {
        self.session = self.session.expires_in(secs);
        self
    }

    /// Uses `token` as the bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.session = self.session.token(token);
        self
    }

    /// Sets the monitor configuration.
    pub fn config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the navigator's starting location.
    pub fn location(mut self, path: impl Into<String>) -> Self {
        self.location = path.into();
        self
    }

    /// Builds the harness.
    pub fn build(self) -> MonitorHarness {
        let ctx = self.session.build();
        let navigator = Arc::new(RecordingNavigator::new(self.location));
        let clock = Arc::new(ManualClock::new(NOW));
        let monitor = ExpiryMonitor::new(ctx.clone(), navigator.clone())
            .with_clock(clock.clone())
            .with_config(self.config);

        MonitorHarness {
            ctx,
            navigator,
            clock,
            monitor,
        }
    }
}

impl Default for MonitorHarnessBuilder {
    fn default() -> Self {
        Self::new()
    }
}
