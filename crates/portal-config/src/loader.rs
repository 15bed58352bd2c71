// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Loading Pipeline
//!
//! 1. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw text
//! 2. Parse YAML, TOML or JSON, chosen by file extension
//! 3. Apply `PORTAL_*` environment overrides
//! 4. Resolve relative file paths against the config file's directory
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! PORTAL_LOG_LEVEL=debug
//! PORTAL_LOG_FORMAT=json
//! PORTAL_STORE_PATH=/var/lib/portal/session.json
//! PORTAL_WARNING_LEAD_SECS=120
//! PORTAL_LOGIN_PATH=/login
//! PORTAL_MENUS_FILE=menus.yaml
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{resolve_relative, LogFormat, LogLevel, PortalConfig, StoreKind};

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "PORTAL";

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// ```no_run
/// use portal_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("portal.yaml").unwrap();
/// println!("login page: {}", config.routes.login);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Base directory for resolving relative paths.
    base_path: Option<PathBuf>,

    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve placeholders and apply overrides.
    resolve_env_vars: bool,

    /// Whether to resolve relative paths.
    resolve_paths: bool,
}

impl ConfigLoader {
    /// Creates a loader with default settings.
    pub fn new() -> Self {
        Self {
            base_path: None,
            env_prefix: ENV_PREFIX.to_string(),
            resolve_env_vars: true,
            resolve_paths: true,
        }
    }

    /// Sets the base path for resolving relative paths.
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Enables or disables relative path resolution.
    pub fn with_path_resolution(mut self, enabled: bool) -> Self {
        self.resolve_paths = enabled;
        self
    }

    /// Loads configuration from a file.
    ///
    /// The format is determined by the extension: `.yaml`/`.yml`, `.toml` or
    /// `.json`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<PortalConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let base_path = self.base_path.clone().unwrap_or_else(|| {
            path.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        });

        let content = read_file(path)?;
        let format = ConfigFormat::from_path(path)?;
        let mut config = self
            .parse_content(&content, format)
            .map_err(|e| match e {
                ConfigError::Serialization { message } => ConfigError::parse(path, message),
                other => other,
            })?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        if self.resolve_paths {
            resolve_relative_paths(&mut config, &base_path);
        }

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!(
            store = config.session.store.as_str(),
            warning_lead_secs = config.expiry.warning_lead_secs,
            custom_menus = config.menus.file.is_some(),
            "Configuration summary"
        );

        Ok(config)
    }

    /// Loads configuration from a string.
    ///
    /// Relative paths are left as written.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<PortalConfig> {
        let mut config = self.parse_content(content, format)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn parse_content(&self, content: &str, format: ConfigFormat) -> ConfigResult<PortalConfig> {
        let content = if self.resolve_env_vars {
            resolve_env_placeholders(content)
        } else {
            content.to_string()
        };

        parse_str(&content, format)
    }

    /// Applies `PREFIX_*` environment overrides.
    fn apply_env_overrides(&self, config: &mut PortalConfig) -> ConfigResult<()> {
        if let Some(value) = self.env("LOG_LEVEL") {
            match LogLevel::parse(&value) {
                Some(level) => config.logging.level = level,
                None => warn!(value = %value, "Ignoring unknown log level override"),
            }
        }

        if let Some(value) = self.env("LOG_FORMAT") {
            match LogFormat::parse(&value) {
                Some(format) => config.logging.format = format,
                None => warn!(value = %value, "Ignoring unknown log format override"),
            }
        }

        if let Some(value) = self.env("STORE_PATH") {
            config.session.store = StoreKind::File;
            config.session.path = PathBuf::from(value);
        }

        if let Some(value) = self.env("WARNING_LEAD_SECS") {
            let name = self.env_name("WARNING_LEAD_SECS");
            config.expiry.warning_lead_secs = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected a number of seconds"))?;
        }

        if let Some(value) = self.env("LOGIN_PATH") {
            // Keep the monitor idle on the new login page as well.
            if !config.expiry.public_paths.contains(&value) {
                config.expiry.public_paths.push(value.clone());
            }
            config.routes.login = value;
        }

        if let Some(value) = self.env("MENUS_FILE") {
            config.menus.file = Some(PathBuf::from(value));
        }

        Ok(())
    }

    fn env_name(&self, suffix: &str) -> String {
        format!("{}_{}", self.env_prefix, suffix)
    }

    fn env(&self, suffix: &str) -> Option<String> {
        env::var(self.env_name(suffix)).ok()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn read_file(path: &Path) -> ConfigResult<String> {
    if !path.exists() {
        return Err(ConfigError::file_not_found(path));
    }

    fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
}

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<PortalConfig> {
    // An empty YAML document is `null`, not an empty mapping.
    if content.trim().is_empty() {
        return Ok(PortalConfig::default());
    }

    match format {
        ConfigFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// Resolves `${VAR_NAME}` and `${VAR_NAME:default}` placeholders.
///
/// Unset variables without a default are left in place.
fn resolve_env_placeholders(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' || chars.peek() != Some(&'{') {
            result.push(c);
            continue;
        }
        chars.next();

        let mut var_content = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            var_content.push(c);
        }

        if !found_close {
            result.push_str("${");
            result.push_str(&var_content);
            continue;
        }

        let (var_name, default_value) = match var_content.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (var_content.as_str(), None),
        };

        match (env::var(var_name), default_value) {
            (Ok(value), _) => result.push_str(&value),
            (Err(_), Some(default)) => result.push_str(default),
            (Err(_), None) => {
                warn!("Environment variable '{}' not found", var_name);
                result.push_str(&format!("${{{}}}", var_name));
            }
        }
    }

    result
}

fn resolve_relative_paths(config: &mut PortalConfig, base_path: &Path) {
    resolve_relative(&mut config.session.path, base_path);

    if let Some(ref mut file) = config.menus.file {
        resolve_relative(file, base_path);
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<PortalConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<PortalConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================
