// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session expiry monitor.
//!
//! The monitor is scoped to a single mount of a route. [`ExpiryMonitor::mount`]
//! inspects the stored session and either stays idle or schedules one Tokio
//! task that drives the whole timeline:
//!
//! ```text
//!            public path / no token / unreadable token
//!   mount ─────────────────────────────────────────────▶ Idle
//!     │
//!     │ exp in the future               exp already past
//!     ▼                                        │
//!   Armed ── warning deadline ──▶ Warning ─────┼──▶ Expired
//!     │                          (1 s ticks)   │
//!     └──────────── expiry deadline ───────────┘
//! ```
//!
//! The task is owned by the returned [`MonitorHandle`] and aborted when the
//! handle is dropped, so leaving the route cancels every pending timer no
//! matter how the mount ends. [`RouteMonitor`] keeps exactly one handle alive
//! and swaps it on each path change.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use portal_access::route::normalize_path;
use portal_access::LOGIN_PATH;
use portal_core::{Navigator, SessionContext};

use crate::claims;
use crate::clock::{Clock, SystemClock};

// =============================================================================
// MonitorConfig
// =============================================================================

/// Monitor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// How long before expiry the warning starts, in seconds.
    pub warning_lead_secs: u64,
    /// First value shown by the warning countdown.
    pub countdown_start_secs: u64,
    /// Start the countdown at the real remaining time when that is shorter.
    pub clamp_countdown: bool,
    /// Paths on which the monitor stays idle.
    pub public_paths: Vec<String>,
    /// Where an expired session is sent.
    pub login_path: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            warning_lead_secs: 60,
            countdown_start_secs: 60,
            clamp_countdown: false,
            public_paths: ["/login", "/register", "/home", "/", "/403", "/404"]
                .into_iter()
                .map(String::from)
                .collect(),
            login_path: LOGIN_PATH.to_string(),
        }
    }
}

impl MonitorConfig {
    /// Returns `true` if the monitor stays idle on `path`.
    pub fn is_public(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.public_paths
            .iter()
            .any(|public| normalize_path(public) == path)
    }
}

// =============================================================================
// MonitorState
// =============================================================================

/// Observable state of a mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MonitorState {
    /// Nothing scheduled.
    Idle,
    /// Timers scheduled for a token expiring at `expires_at` (Unix seconds).
    Armed {
        /// Expiry timestamp.
        expires_at: i64,
    },
    /// Countdown running.
    Warning {
        /// Seconds shown to the user.
        remaining_secs: u64,
    },
    /// Session cleared and user sent to the login page.
    Expired,
}

impl MonitorState {
    /// Returns `true` once the session has been expired.
    pub fn is_expired(&self) -> bool {
        matches!(self, MonitorState::Expired)
    }
}

// =============================================================================
// ExpiryMonitor
// =============================================================================

/// Arms expiry timers against the stored session.
#[derive(Clone)]
pub struct ExpiryMonitor {
    ctx: SessionContext,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    config: Arc<MonitorConfig>,
}

impl ExpiryMonitor {
    /// Creates a monitor using the system clock and default settings.
    pub fn new(ctx: SessionContext, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            ctx,
            navigator,
            clock: Arc::new(SystemClock),
            config: Arc::new(MonitorConfig::default()),
        }
    }

    /// Sets the wall clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Mounts the monitor on `path`.
    ///
    /// Must be called from within a Tokio runtime when the session holds a
    /// live token; outside one the mount stays idle and logs a warning.
    pub fn mount(&self, path: &str) -> MonitorHandle {
        let path = normalize_path(path);
        let (tx, rx) = watch::channel(MonitorState::Idle);

        if self.config.is_public(&path) {
            debug!(path = %path, "expiry monitor idle on public path");
            return MonitorHandle::idle(path, rx);
        }

        let generation = self.ctx.generation();
        let Some(token) = self.ctx.snapshot().token else {
            debug!(path = %path, "expiry monitor idle: no token");
            return MonitorHandle::idle(path, rx);
        };

        let exp = match claims::expires_at(&token) {
            Ok(exp) => exp,
            Err(e) => {
                // Fail open: an unreadable token disables client-side expiry.
                warn!(path = %path, error = %e, "expiry monitor idle: token expiry unknown");
                return MonitorHandle::idle(path, rx);
            }
        };

        let now = self.clock.now_unix();
        let remaining = exp.saturating_sub(now);
        if remaining <= 0 {
            info!(path = %path, exp, now, "token already expired at mount");
            expire(&self.ctx, self.navigator.as_ref(), &self.config.login_path, generation);
            tx.send_replace(MonitorState::Expired);
            return MonitorHandle::idle(path, rx);
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(path = %path, error = %e, "expiry monitor needs a Tokio runtime");
                return MonitorHandle::idle(path, rx);
            }
        };

        let remaining = remaining as u64;
        let schedule = Schedule::new(&self.config, remaining);
        tx.send_replace(MonitorState::Armed { expires_at: exp });
        debug!(
            path = %path,
            exp,
            remaining_secs = remaining,
            warning_in_secs = schedule.warning_delay.as_secs(),
            "expiry monitor armed"
        );

        let task = runtime.spawn(run_timeline(
            schedule,
            tx,
            self.ctx.clone(),
            self.navigator.clone(),
            self.config.login_path.clone(),
            generation,
        ));

        MonitorHandle {
            path,
            state: rx,
            task: Some(task),
        }
    }
}

impl std::fmt::Debug for ExpiryMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiryMonitor")
            .field("ctx", &self.ctx)
            .field("config", &self.config)
            .finish()
    }
}

/// Delays derived from the token at arm time.
#[derive(Debug, Clone, Copy)]
struct Schedule {
    warning_delay: Duration,
    expiry_delay: Duration,
    countdown_start: u64,
}

/// Longest delay ever scheduled. Later expiries are pushed back to this
/// horizon, which keeps deadlines inside the timer wheel's range and
/// `Instant` arithmetic from overflowing.
const MAX_SCHEDULE_SECS: u64 = 365 * 24 * 60 * 60;

impl Schedule {
    fn new(config: &MonitorConfig, remaining: u64) -> Self {
        let remaining = remaining.min(MAX_SCHEDULE_SECS);
        let warning_delay = remaining.saturating_sub(config.warning_lead_secs);
        let countdown_start = if config.clamp_countdown {
            config.countdown_start_secs.min(remaining - warning_delay)
        } else {
            config.countdown_start_secs
        };

        Self {
            warning_delay: Duration::from_secs(warning_delay),
            expiry_delay: Duration::from_secs(remaining),
            countdown_start,
        }
    }
}

async fn run_timeline(
    schedule: Schedule,
    tx: watch::Sender<MonitorState>,
    ctx: SessionContext,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    generation: u64,
) {
    let start = Instant::now();
    let warning_at = start + schedule.warning_delay;
    let expiry = sleep_until(start + schedule.expiry_delay);
    tokio::pin!(expiry);

    let finish = |tx: &watch::Sender<MonitorState>| {
        let state = if expire(&ctx, navigator.as_ref(), &login_path, generation) {
            MonitorState::Expired
        } else {
            MonitorState::Idle
        };
        tx.send_replace(state);
    };

    tokio::select! {
        biased;
        _ = &mut expiry => {
            finish(&tx);
            return;
        }
        _ = sleep_until(warning_at) => {}
    }

    let mut countdown = schedule.countdown_start;
    tx.send_replace(MonitorState::Warning {
        remaining_secs: countdown,
    });
    info!(remaining_secs = countdown, "session about to expire");

    let tick = Duration::from_secs(1);
    let mut ticker = interval_at(warning_at + tick, tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = &mut expiry => {
                finish(&tx);
                return;
            }
            _ = ticker.tick() => {
                countdown = countdown.saturating_sub(1);
                tx.send_replace(MonitorState::Warning {
                    remaining_secs: countdown,
                });
            }
        }
    }
}

/// Clears the session armed at `generation` and sends the user to login.
///
/// Returns `false` when the session changed since arming; nothing is touched
/// in that case.
fn expire(
    ctx: &SessionContext,
    navigator: &dyn Navigator,
    login_path: &str,
    generation: u64,
) -> bool {
    match ctx.expire(generation) {
        Ok(true) => {
            navigator.replace(login_path);
            true
        }
        Ok(false) => false,
        Err(e) => {
            error!(error = %e, "failed to clear expired session");
            navigator.replace(login_path);
            true
        }
    }
}

// =============================================================================
// MonitorHandle
// =============================================================================

/// A mount of the monitor. Dropping it cancels all pending timers.
#[derive(Debug)]
pub struct MonitorHandle {
    path: String,
    state: watch::Receiver<MonitorState>,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    fn idle(path: String, state: watch::Receiver<MonitorState>) -> Self {
        Self {
            path,
            state,
            task: None,
        }
    }

    /// Path this mount belongs to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current state.
    pub fn state(&self) -> MonitorState {
        *self.state.borrow()
    }

    /// Returns a receiver for state changes.
    pub fn subscribe(&self) -> watch::Receiver<MonitorState> {
        self.state.clone()
    }

    /// Returns `true` while timers are pending.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancels pending timers.
    pub fn cancel(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                debug!(path = %self.path, "expiry monitor cancelled");
            }
            task.abort();
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.abort();
    }
}

// =============================================================================
// RouteMonitor
// =============================================================================

/// Keeps one mount alive for the current route.
#[derive(Debug)]
pub struct RouteMonitor {
    monitor: ExpiryMonitor,
    current: Option<MonitorHandle>,
}

impl RouteMonitor {
    /// Creates a route monitor with nothing mounted.
    pub fn new(monitor: ExpiryMonitor) -> Self {
        Self {
            monitor,
            current: None,
        }
    }

    /// Handles a path change: cancels the previous mount and mounts `path`.
    pub fn navigate(&mut self, path: &str) -> MonitorState {
        // Cancel before re-arming so two timelines never overlap.
        self.current = None;
        let handle = self.monitor.mount(path);
        let state = handle.state();
        self.current = Some(handle);
        state
    }

    /// Returns the current mount.
    pub fn current(&self) -> Option<&MonitorHandle> {
        self.current.as_ref()
    }

    /// Unmounts without mounting anything else.
    pub fn unmount(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use portal_core::{keys, HistoryNavigator, Login, MemoryStore, Role, UserProfile};
    use tokio::time::sleep;

    const NOW: i64 = 1_800_000_000;

    fn token(exp: i64) -> String {
        format!(
            "h.{}.s",
            URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"1","exp":{}}}"#, exp))
        )
    }

    struct Fixture {
        ctx: SessionContext,
        history: Arc<HistoryNavigator>,
        monitor: ExpiryMonitor,
    }

    fn fixture(token: &str) -> Fixture {
        let ctx = SessionContext::new(Arc::new(MemoryStore::new()));
        ctx.login(Login::new(
            token,
            Role::Student,
            UserProfile::new("1", "Rosa", Some(Role::Student)),
        ))
        .unwrap();

        let history = Arc::new(HistoryNavigator::new("/perfil"));
        let monitor = ExpiryMonitor::new(ctx.clone(), history.clone())
            .with_clock(Arc::new(ManualClock::new(NOW)));

        Fixture {
            ctx,
            history,
            monitor,
        }
    }

    fn assert_cleared(ctx: &SessionContext) {
        for key in keys::ALL {
            assert_eq!(ctx.store().get(key), None, "key {} still present", key);
        }
    }

    #[test]
    fn test_schedule_literal_countdown() {
        let schedule = Schedule::new(&MonitorConfig::default(), 30);
        assert_eq!(schedule.warning_delay, Duration::ZERO);
        assert_eq!(schedule.expiry_delay, Duration::from_secs(30));
        assert_eq!(schedule.countdown_start, 60);

        let schedule = Schedule::new(&MonitorConfig::default(), 600);
        assert_eq!(schedule.warning_delay, Duration::from_secs(540));
        assert_eq!(schedule.countdown_start, 60);
    }

    #[test]
    fn test_schedule_clamped_countdown() {
        let config = MonitorConfig {
            clamp_countdown: true,
            ..MonitorConfig::default()
        };
        assert_eq!(Schedule::new(&config, 30).countdown_start, 30);
        assert_eq!(Schedule::new(&config, 600).countdown_start, 60);
    }

    #[test]
    fn test_schedule_caps_far_expiries() {
        let schedule = Schedule::new(&MonitorConfig::default(), u64::MAX);
        assert_eq!(schedule.expiry_delay, Duration::from_secs(MAX_SCHEDULE_SECS));
        assert_eq!(
            schedule.warning_delay,
            Duration::from_secs(MAX_SCHEDULE_SECS - 60)
        );
    }

    #[test]
    fn test_public_paths() {
        let config = MonitorConfig::default();
        assert!(config.is_public("/login"));
        assert!(config.is_public("/register/"));
        assert!(config.is_public("/"));
        assert!(!config.is_public("/perfil"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_on_public_path() {
        let f = fixture(&token(NOW + 30));
        let handle = f.monitor.mount("/login");

        assert_eq!(handle.state(), MonitorState::Idle);
        assert!(!handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_without_token() {
        let f = fixture(&token(NOW + 30));
        f.ctx.logout().unwrap();

        let handle = f.monitor.mount("/perfil");
        assert_eq!(handle.state(), MonitorState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_on_undecodable_token() {
        let f = fixture("not-a-jwt");
        let handle = f.monitor.mount("/perfil");

        assert_eq!(handle.state(), MonitorState::Idle);
        sleep(Duration::from_secs(3600)).await;
        assert!(f.ctx.snapshot().is_authenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_warning_then_expired() {
        let f = fixture(&token(NOW + 30));
        let handle = f.monitor.mount("/perfil");
        assert_eq!(handle.state(), MonitorState::Armed { expires_at: NOW + 30 });

        sleep(Duration::from_millis(500)).await;
        assert_eq!(handle.state(), MonitorState::Warning { remaining_secs: 60 });

        sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.state(), MonitorState::Warning { remaining_secs: 59 });

        sleep(Duration::from_secs(28)).await;
        assert_eq!(handle.state(), MonitorState::Warning { remaining_secs: 31 });
        assert!(f.ctx.snapshot().is_authenticated);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.state(), MonitorState::Expired);
        assert_cleared(&f.ctx);
        assert_eq!(f.history.current(), "/login");
        assert_eq!(f.history.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_expired_is_immediate() {
        let f = fixture(&token(NOW - 5));
        let handle = f.monitor.mount("/perfil");

        assert_eq!(handle.state(), MonitorState::Expired);
        assert!(!handle.is_active());
        assert_cleared(&f.ctx);
        assert_eq!(f.history.current(), "/login");
        assert_eq!(f.history.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extreme_past_exp_expires_at_mount() {
        let f = fixture(&token(i64::MIN));
        let handle = f.monitor.mount("/perfil");

        assert_eq!(handle.state(), MonitorState::Expired);
        assert_cleared(&f.ctx);
        assert_eq!(f.history.current(), "/login");
    }

    #[tokio::test(start_paused = true)]
    async fn test_extreme_future_exp_arms() {
        let f = fixture(&token(i64::MAX));
        let handle = f.monitor.mount("/perfil");

        assert_eq!(handle.state(), MonitorState::Armed { expires_at: i64::MAX });
        sleep(Duration::from_secs(3600)).await;
        assert!(handle.is_active());
        assert_eq!(handle.state(), MonitorState::Armed { expires_at: i64::MAX });
        assert!(f.ctx.snapshot().is_authenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_warning_waits_for_lead_time() {
        let f = fixture(&token(NOW + 120));
        let handle = f.monitor.mount("/perfil");

        sleep(Duration::from_millis(59_500)).await;
        assert_eq!(handle.state(), MonitorState::Armed { expires_at: NOW + 120 });

        sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.state(), MonitorState::Warning { remaining_secs: 60 });

        sleep(Duration::from_secs(60)).await;
        assert!(handle.state().is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timers() {
        let f = fixture(&token(NOW + 30));
        let handle = f.monitor.mount("/perfil");
        let rx = handle.subscribe();
        drop(handle);

        sleep(Duration::from_secs(120)).await;
        assert!(f.ctx.snapshot().is_authenticated);
        assert_eq!(f.history.current(), "/perfil");
        assert_eq!(*rx.borrow(), MonitorState::Armed { expires_at: NOW + 30 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_route_change_rearms() {
        let f = fixture(&token(NOW + 30));
        let mut route = RouteMonitor::new(f.monitor.clone());

        assert!(matches!(route.navigate("/perfil"), MonitorState::Armed { .. }));
        sleep(Duration::from_secs(10)).await;

        // Public page: old timers cancelled, nothing new armed.
        assert_eq!(route.navigate("/home"), MonitorState::Idle);
        sleep(Duration::from_secs(60)).await;
        assert!(f.ctx.snapshot().is_authenticated);

        assert!(matches!(route.navigate("/forum"), MonitorState::Armed { .. }));
        route.unmount();
        assert!(route.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_expiry_after_relogin() {
        let f = fixture(&token(NOW + 30));
        let handle = f.monitor.mount("/perfil");

        f.ctx.logout().unwrap();
        f.ctx
            .login(Login::new(
                token(NOW + 3600),
                Role::Admin,
                UserProfile::new("2", "Leo", Some(Role::Admin)),
            ))
            .unwrap();

        sleep(Duration::from_secs(31)).await;
        assert_eq!(handle.state(), MonitorState::Idle);
        assert!(f.ctx.snapshot().is_authenticated);
        assert_eq!(f.ctx.snapshot().role, Some(Role::Admin));
        assert_eq!(f.history.current(), "/perfil");
    }

    #[test]
    fn test_mount_outside_runtime_stays_idle() {
        let f = fixture(&token(NOW + 30));
        let handle = f.monitor.mount("/perfil");
        assert_eq!(handle.state(), MonitorState::Idle);
    }
}
