// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # portal-expiry
//!
//! Client-side session expiry for the Defensa Integral portal.
//!
//! - [`claims`]: reads the `exp` claim out of a bearer token without
//!   verifying it
//! - [`clock`]: wall-clock source, swappable in tests
//! - [`monitor`]: the per-route monitor that warns before expiry and clears
//!   the session once the token runs out
//!
//! Backend authorization is unaffected by anything here; the monitor only
//! keeps the client from carrying on with a token the server will reject.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod claims;
pub mod clock;
pub mod monitor;

pub use claims::{expires_at, ClaimsError, TokenClaims};
pub use clock::{Clock, ManualClock, SystemClock};
pub use monitor::{ExpiryMonitor, MonitorConfig, MonitorHandle, MonitorState, RouteMonitor};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
