// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # portal-bin
//!
//! Command-line tool for the Defensa Integral portal access layer.
//!
//! ## Architecture
//!
//! ```text
//!                  main.rs
//!                     │
//!        ┌────────────┼─────────────┐
//!        ▼            ▼             ▼
//!     cli.rs    LoadedConfig    logging.rs
//!        │            │
//!        └─────┬──────┘
//!              ▼
//!          commands ───── watch ──── shutdown
//!              │
//!        portal-* crates
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Which pages can a teacher open?
//! portal routes --role teacher
//!
//! # What happens when an anonymous visitor opens /admin/users?
//! portal guard /admin/users --anonymous
//!
//! # Sidebar for a teacher in semester 4
//! portal menu --role teacher --semester 4
//!
//! # Store a session, then watch it run out
//! portal session login --token "$TOKEN" --role student --name Rosa
//! portal watch --path /perfil
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use commands::LoadedConfig;
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use shutdown::ShutdownCoordinator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
