// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Portal Integration Tests
//!
//! Cross-crate tests for the portal access layer, plus the fixtures and
//! helpers they share.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Signed tokens, profiles and menu files
//!   - `builders`: Session and monitor setups
//!   - `mocks`: Recording navigator and failing store
//!   - `assertions`: Session and menu assertions
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p portal-tests
//! cargo test -p portal-tests --test integration_access
//! cargo test -p portal-tests --test integration_expiry
//! cargo test -p portal-tests --test integration_config
//! ```
//!
//! ## Test Categories
//!
//! ### Access Tests (`integration_access.rs`)
//! - Route guard decisions and redirects
//! - Root redirect and not-found handling
//! - Sidebar filtering and the semester badge
//! - Menu files
//!
//! ### Expiry Tests (`integration_expiry.rs`)
//! - Warning, countdown and expiry on paused time
//! - Already-expired and undecodable tokens
//! - Cancellation on route change and stale expiry after re-login
//!
//! ### Config Tests (`integration_config.rs`)
//! - Loading YAML, TOML and JSON files
//! - Environment overrides
//! - File-backed sessions driven by the loaded config

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::mocks::*;
    pub use crate::common::{init_test_logging, temp_test_dir};
}
