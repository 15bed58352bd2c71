// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.

mod guard;
mod menu;
mod routes;
mod session;
mod token;
mod validate;
mod version;
mod watch;

pub use guard::guard;
pub use menu::menu;
pub use routes::routes;
pub use session::session;
pub use token::token;
pub use validate::validate;
pub use version::version;
pub use watch::watch;

use std::path::{Path, PathBuf};

use tracing::debug;

use portal_config::{
    ConfigError, ConfigFormat, ConfigLoader, ConfigResult, LoggingConfig, PortalConfig,
};
use portal_core::{Session, UserProfile};

use crate::cli::{Cli, Commands, SubjectArgs};
use crate::error::{BinError, BinResult};

/// Executes the command selected on the command line.
pub async fn execute(cli: Cli, config: LoadedConfig) -> BinResult<()> {
    match cli.command {
        Commands::Validate(args) => validate::validate(&config, args),
        Commands::Menu(args) => menu::menu(&config, args),
        Commands::Routes(args) => routes::routes(&config, args),
        Commands::Guard(args) => guard::guard(&config, args),
        Commands::Token(args) => token::token(&config, args),
        Commands::Session(command) => session::session(&config, command),
        Commands::Watch(args) => watch::watch(&config, args).await,
        Commands::Version => version::version(),
    }
}

// =============================================================================
// LoadedConfig
// =============================================================================

/// Outcome of loading the configuration at startup.
///
/// Loading happens before logging is initialized so the file's logging
/// section can take effect; errors are kept and surfaced by the commands
/// that need the configuration.
#[derive(Debug)]
pub struct LoadedConfig {
    path: PathBuf,
    found: bool,
    result: ConfigResult<PortalConfig>,
}

impl LoadedConfig {
    /// Loads `path`, or the defaults plus environment overrides when the file
    /// does not exist.
    pub fn load(path: &Path) -> Self {
        let found = path.exists();
        let result = if found {
            ConfigLoader::new().load(path)
        } else {
            ConfigLoader::new().load_from_str("", ConfigFormat::Yaml)
        };

        Self {
            path: path.to_path_buf(),
            found,
            result,
        }
    }

    /// Wraps an already loaded configuration.
    pub fn from_config(path: impl Into<PathBuf>, config: PortalConfig) -> Self {
        Self {
            path: path.into(),
            found: true,
            result: Ok(config),
        }
    }

    /// Path the configuration was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the configuration file exists.
    pub fn found(&self) -> bool {
        self.found
    }

    /// Returns the configuration or the loading error.
    pub fn config(&self) -> BinResult<&PortalConfig> {
        self.result.as_ref().map_err(|e| self.error(e))
    }

    /// Logging settings, or the defaults when loading failed.
    pub fn logging(&self) -> LoggingConfig {
        self.result
            .as_ref()
            .map(|config| config.logging.clone())
            .unwrap_or_default()
    }

    fn error(&self, e: &ConfigError) -> BinError {
        BinError::config(e.to_string()).with_context(format!(
            "Failed to load configuration '{}'",
            self.path.display()
        ))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Builds the session a decision is evaluated for.
///
/// `--anonymous` and `--role` describe a synthetic session; otherwise the
/// stored session is read.
pub(crate) fn subject_session(
    subject: &SubjectArgs,
    config: &PortalConfig,
    semester: Option<&str>,
) -> BinResult<Session> {
    if subject.anonymous {
        return Ok(Session::anonymous());
    }

    if let Some(role) = subject.role {
        let mut profile = UserProfile::new("cli", role.as_str(), Some(role));
        if let Some(semester) = semester {
            profile = profile.with_semester(semester);
        }
        return Ok(Session::authenticated(Some(role)).with_profile(profile));
    }

    let store = config.open_store()?;
    let mut session = Session::read(store.as_ref());
    debug!(
        store = store.name(),
        authenticated = session.is_authenticated,
        "Using stored session"
    );

    if let (Some(semester), Some(profile)) = (semester, session.current_user.as_mut()) {
        profile.semester = Some(semester.to_string());
    }
    Ok(session)
}

/// Describes a session in one line.
pub(crate) fn describe_session(session: &Session) -> String {
    if !session.is_authenticated {
        return "anonymous".to_string();
    }

    let role = session
        .role
        .map(|r| r.to_string())
        .unwrap_or_else(|| "no role".to_string());
    match &session.current_user {
        Some(user) if !user.name.is_empty() => format!("{} ({})", user.name, role),
        _ => role,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_config::StoreKind;
    use portal_core::Role;

    fn memory_config() -> PortalConfig {
        let mut config = PortalConfig::default();
        config.session.store = StoreKind::Memory;
        config
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let loaded = LoadedConfig::load(Path::new("/nonexistent/portal.yaml"));
        assert!(!loaded.found());
        assert_eq!(loaded.config().unwrap().routes.login, "/login");
    }

    #[test]
    fn test_anonymous_subject() {
        let subject = SubjectArgs {
            role: None,
            anonymous: true,
        };
        let session = subject_session(&subject, &memory_config(), None).unwrap();
        assert_eq!(session, Session::anonymous());
        assert_eq!(describe_session(&session), "anonymous");
    }

    #[test]
    fn test_role_subject_carries_semester() {
        let subject = SubjectArgs {
            role: Some(Role::Teacher),
            anonymous: false,
        };
        let session = subject_session(&subject, &memory_config(), Some("5")).unwrap();

        assert_eq!(session.role, Some(Role::Teacher));
        assert_eq!(session.menu_role(), Some(Role::Teacher));
        assert_eq!(
            session.current_user.as_ref().and_then(|u| u.assigned_semester()),
            Some("5")
        );
    }

    #[test]
    fn test_stored_subject_defaults_to_empty_store() {
        let session = subject_session(&SubjectArgs::default(), &memory_config(), None).unwrap();
        assert!(!session.is_authenticated);
    }
}
