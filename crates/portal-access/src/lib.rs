// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # portal-access
//!
//! Page and menu access control for the Defensa Integral portal.
//!
//! This crate provides:
//! - The route guard (`Allow` / `RedirectTo`)
//! - The route table with the root redirect and not-found handling
//! - The menu definition types and the built-in role menus
//! - The sidebar navigation filter
//!
//! Every decision here is a pure function of a session snapshot and static
//! configuration. Nothing is cached between evaluations.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod guard;
pub mod menu;
pub mod menus;
pub mod nav;
pub mod route;

pub use error::{AccessError, AccessResult};
pub use guard::{guard, GuardDecision, RouteGuard, FORBIDDEN_PATH, LOGIN_PATH};
pub use menu::{Badge, MenuEntry, MenuNode, MenuPermission, MenuSet, MenuTarget};
pub use menus::portal_menus;
pub use nav::{allowed, apply_semester_badge, build_visible_menu, Sidebar};
pub use route::{root_redirect, Navigation, RoleHomes, Route, RouteTable, NOT_FOUND_PATH};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
