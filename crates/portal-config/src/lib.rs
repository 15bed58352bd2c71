// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # portal-config
//!
//! Configuration for the Defensa Integral portal access layer.
//!
//! ## Features
//!
//! - **Schema**: session store, redirect targets, expiry monitor timings,
//!   menu source and logging, all with defaults
//! - **Multi-Format Support**: YAML, TOML and JSON files
//! - **Environment Overrides**: `PORTAL_*` variables and `${VAR:default}`
//!   placeholders
//! - **Builders**: turn the loaded config into a [`RouteTable`], a
//!   [`MonitorConfig`] or a session store
//!
//! ## Quick Start
//!
//! ```no_run
//! use portal_config::load_config;
//!
//! let config = load_config("portal.yaml").unwrap();
//! let table = config.route_table();
//! println!("{} routes", table.routes().len());
//! ```
//!
//! ## Example File
//!
//! ```yaml
//! session:
//!   store: file
//!   path: "${PORTAL_DATA:./data}/session.json"
//! routes:
//!   login: /login
//!   homes:
//!     teacher: /dashboard
//! expiry:
//!   warning_lead_secs: 60
//!   countdown_secs: 60
//!   clamp_countdown: false
//! logging:
//!   level: info
//!   format: text
//! ```
//!
//! [`RouteTable`]: portal_access::RouteTable
//! [`MonitorConfig`]: portal_expiry::MonitorConfig

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader, ENV_PREFIX};
pub use schema::{
    ExpiryConfig, LogFormat, LogLevel, LoggingConfig, MenusConfig, PortalConfig, RoutesConfig,
    SessionConfig, StoreKind,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
