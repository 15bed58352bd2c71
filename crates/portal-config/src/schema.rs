// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema for the portal access layer.
//!
//! # Schema Structure
//!
//! ```text
//! PortalConfig
//! ├── session: SessionConfig
//! ├── routes: RoutesConfig
//! ├── expiry: ExpiryConfig
//! ├── menus: MenusConfig
//! └── logging: LoggingConfig
//! ```
//!
//! Every section has defaults, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use portal_access::{
    AccessResult, MenuSet, RoleHomes, RouteGuard, RouteTable, FORBIDDEN_PATH, LOGIN_PATH,
    NOT_FOUND_PATH,
};
use portal_core::{FileStore, MemoryStore, SessionResult, SessionStore};
use portal_expiry::MonitorConfig;

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default session file.
pub const DEFAULT_SESSION_PATH: &str = "./data/session.json";

/// Longest accepted warning lead (one hour).
pub const MAX_WARNING_LEAD_SECS: u64 = 3600;

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortalConfig {
    /// Session persistence.
    pub session: SessionConfig,

    /// Redirect targets.
    pub routes: RoutesConfig,

    /// Expiry monitor settings.
    pub expiry: ExpiryConfig,

    /// Sidebar menus.
    pub menus: MenusConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl PortalConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.session.validate()?;
        self.routes.validate()?;
        self.expiry.validate()?;
        self.menus.validate()?;

        let login = &self.routes.login;
        if !self.expiry.public_paths.iter().any(|p| p == login) {
            return Err(ConfigError::validation(
                "expiry.public_paths",
                format!("must include the login page '{}'", login),
            ));
        }

        Ok(())
    }

    /// Builds the route guard.
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(&self.routes.login, &self.routes.forbidden)
    }

    /// Builds the portal route table with the configured redirect targets.
    pub fn route_table(&self) -> RouteTable {
        RouteTable::portal()
            .with_guard(self.guard())
            .with_homes(self.routes.homes.clone())
            .with_not_found(&self.routes.not_found)
    }

    /// Builds the expiry monitor settings.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            warning_lead_secs: self.expiry.warning_lead_secs,
            countdown_start_secs: self.expiry.countdown_secs,
            clamp_countdown: self.expiry.clamp_countdown,
            public_paths: self.expiry.public_paths.clone(),
            login_path: self.routes.login.clone(),
        }
    }

    /// Loads the configured menus, or the built-in ones.
    pub fn menu_set(&self) -> AccessResult<MenuSet> {
        match &self.menus.file {
            Some(path) => MenuSet::load(path),
            None => Ok(portal_access::portal_menus().clone()),
        }
    }

    /// Opens the configured session store.
    pub fn open_store(&self) -> SessionResult<Arc<dyn SessionStore>> {
        match self.session.store {
            StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreKind::File => {
                info!(path = %self.session.path.display(), "Opening session file");
                Ok(Arc::new(FileStore::open(&self.session.path)?))
            }
        }
    }
}

// =============================================================================
// Session Configuration
// =============================================================================

/// Session store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Process memory. Lost on exit.
    Memory,
    /// JSON file on disk.
    #[default]
    File,
}

impl StoreKind {
    /// Returns the name used in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Memory => "memory",
            StoreKind::File => "file",
        }
    }
}

/// Session persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Store backend.
    pub store: StoreKind,

    /// Session file, for the file store.
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::default(),
            path: PathBuf::from(DEFAULT_SESSION_PATH),
        }
    }
}

impl SessionConfig {
    /// Validates the session configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store == StoreKind::File && self.path.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "session.path",
                "file store requires a path",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Routes Configuration
// =============================================================================

/// Redirect targets used by the guard and the root redirect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutesConfig {
    /// Login page.
    pub login: String,

    /// Page shown when the role is not allowed.
    pub forbidden: String,

    /// Page shown for unknown paths.
    pub not_found: String,

    /// Landing page per role.
    pub homes: RoleHomes,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login: LOGIN_PATH.to_string(),
            forbidden: FORBIDDEN_PATH.to_string(),
            not_found: NOT_FOUND_PATH.to_string(),
            homes: RoleHomes::default(),
        }
    }
}

impl RoutesConfig {
    /// Validates the routes configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        check_path("routes.login", &self.login)?;
        check_path("routes.forbidden", &self.forbidden)?;
        check_path("routes.not_found", &self.not_found)?;
        check_path("routes.homes.admin", &self.homes.admin)?;
        check_path("routes.homes.teacher", &self.homes.teacher)?;
        check_path("routes.homes.student", &self.homes.student)?;
        Ok(())
    }
}

// =============================================================================
// Expiry Configuration
// =============================================================================

/// Expiry monitor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpiryConfig {
    /// Seconds before expiry at which the warning appears.
    pub warning_lead_secs: u64,

    /// First value of the countdown.
    pub countdown_secs: u64,

    /// Start the countdown at the real remaining time when that is shorter.
    pub clamp_countdown: bool,

    /// Pages on which the monitor stays idle.
    pub public_paths: Vec<String>,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        let monitor = MonitorConfig::default();
        Self {
            warning_lead_secs: monitor.warning_lead_secs,
            countdown_secs: monitor.countdown_start_secs,
            clamp_countdown: monitor.clamp_countdown,
            public_paths: monitor.public_paths,
        }
    }
}

impl ExpiryConfig {
    /// Validates the expiry configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.warning_lead_secs == 0 || self.warning_lead_secs > MAX_WARNING_LEAD_SECS {
            return Err(ConfigError::validation(
                "expiry.warning_lead_secs",
                format!("must be between 1 and {}", MAX_WARNING_LEAD_SECS),
            ));
        }
        if self.countdown_secs == 0 {
            return Err(ConfigError::validation(
                "expiry.countdown_secs",
                "must be greater than 0",
            ));
        }
        for (i, path) in self.public_paths.iter().enumerate() {
            check_path(&format!("expiry.public_paths[{}]", i), path)?;
        }
        Ok(())
    }
}

// =============================================================================
// Menus Configuration
// =============================================================================

/// Sidebar menu source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenusConfig {
    /// Menu file (JSON or YAML). The built-in menus are used when absent.
    pub file: Option<PathBuf>,
}

impl MenusConfig {
    /// Validates the menus configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };

        let ext = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("json") | Some("yaml") | Some("yml") => Ok(()),
            _ => Err(ConfigError::validation(
                "menus.file",
                format!("'{}' must be a .json, .yaml or .yml file", file.display()),
            )),
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    pub level: LogLevel,

    /// Log format.
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the filter directive for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name. Accepts `warning` for `warn`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON lines.
    Json,
    /// Compact single-line text.
    Compact,
}

impl LogFormat {
    /// Parses a format name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn check_path(field: &str, value: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(ConfigError::validation(field, "must not be empty"));
    }
    if !value.starts_with('/') {
        return Err(ConfigError::validation(
            field,
            format!("'{}' must start with '/'", value),
        ));
    }
    Ok(())
}

/// Joins `path` onto `base` when it is relative.
pub(crate) fn resolve_relative(path: &mut PathBuf, base: &Path) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}
