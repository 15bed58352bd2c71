// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `validate`: Validate the configuration file
//! - `menu`: Print the sidebar a user would see
//! - `routes`: Print every route and the guard decision for a session
//! - `guard`: Resolve a single navigation request
//! - `token`: Decode a bearer token's claims
//! - `session`: Manage the stored session
//! - `watch`: Run the expiry monitor against the stored session
//! - `version`: Show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use portal_config::LogFormat;
use portal_core::Role;

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Defensa Integral portal access-control tool
///
/// Evaluates route guards and sidebar menus against a session, and watches
/// the stored session for token expiry.
#[derive(Parser, Debug)]
#[command(
    name = "portal",
    author = "Sylvex <contact@sylvex.io>",
    version = portal_core::VERSION,
    about = "Access control for the Defensa Integral portal",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path. Defaults apply when the file does not exist.
    #[arg(
        short,
        long,
        default_value = "portal.yaml",
        env = "PORTAL_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, env = "PORTAL_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact). Overrides the config file.
    #[arg(long, env = "PORTAL_LOG_FORMAT", global = true, value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate the configuration file
    Validate(ValidateArgs),

    /// Print the visible sidebar menu
    Menu(MenuArgs),

    /// Print every route with the guard decision
    Routes(RoutesArgs),

    /// Resolve a navigation request
    Guard(GuardArgs),

    /// Decode a bearer token
    Token(TokenArgs),

    /// Manage the stored session
    #[command(subcommand)]
    Session(SessionCommand),

    /// Watch the stored session for expiry
    ///
    /// Runs until the session expires, nothing is left to watch, or Ctrl+C.
    Watch(WatchArgs),

    /// Show detailed version information
    Version,
}

/// `session` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// Store a new session
    Login(LoginArgs),

    /// Clear the stored session
    Logout,

    /// Show the stored session
    Show(ShowArgs),
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Who a decision is evaluated for.
///
/// Without flags the stored session is used.
#[derive(Args, Debug, Default, Clone)]
pub struct SubjectArgs {
    /// Evaluate as an authenticated user with this role
    #[arg(short, long, conflicts_with = "anonymous", value_parser = parse_role)]
    pub role: Option<Role>,

    /// Evaluate as an anonymous visitor
    #[arg(long)]
    pub anonymous: bool,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `menu` command.
#[derive(Args, Debug, Default, Clone)]
pub struct MenuArgs {
    #[command(flatten)]
    pub subject: SubjectArgs,

    /// Assigned semester, shown on the teacher dashboard entry
    #[arg(long)]
    pub semester: Option<String>,

    /// Menu file (JSON or YAML) to use instead of the configured menus
    #[arg(long)]
    pub menu_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `routes` command.
#[derive(Args, Debug, Default, Clone)]
pub struct RoutesArgs {
    #[command(flatten)]
    pub subject: SubjectArgs,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `guard` command.
#[derive(Args, Debug, Clone)]
pub struct GuardArgs {
    /// Requested path
    pub path: String,

    #[command(flatten)]
    pub subject: SubjectArgs,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `token` command.
#[derive(Args, Debug, Clone)]
pub struct TokenArgs {
    /// Token to decode. Defaults to the stored session's token.
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for `session login`.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Bearer token
    #[arg(short, long)]
    pub token: String,

    /// Role of the user
    #[arg(short, long, value_parser = parse_role)]
    pub role: Role,

    /// User id
    #[arg(long, default_value = "1")]
    pub id: String,

    /// User name
    #[arg(long, default_value = "")]
    pub name: String,

    /// User email
    #[arg(long)]
    pub email: Option<String>,

    /// Assigned semester
    #[arg(long)]
    pub semester: Option<String>,
}

/// Arguments for `session show`.
#[derive(Args, Debug, Default, Clone)]
pub struct ShowArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `watch` command.
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Route the monitor is mounted on
    #[arg(short, long, default_value = "/perfil")]
    pub path: String,
}

// =============================================================================
// Enums
// =============================================================================

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

fn parse_role(value: &str) -> Result<Role, String> {
    Role::parse(value).ok_or_else(|| {
        format!(
            "unknown role '{}' (expected admin, teacher or student)",
            value
        )
    })
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    LogFormat::parse(value)
        .ok_or_else(|| format!("unknown log format '{}' (expected text, json or compact)", value))
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the log level to use, given the one from the config file.
    pub fn effective_log_level<'a>(&'a self, configured: &'a str) -> &'a str {
        if self.quiet {
            "warn"
        } else {
            self.log_level.as_deref().unwrap_or(configured)
        }
    }

    /// Returns the log format to use, given the one from the config file.
    pub fn effective_log_format(&self, configured: LogFormat) -> LogFormat {
        self.log_format.unwrap_or(configured)
    }
}

// =============================================================================
// Tests
// =============================================================================
