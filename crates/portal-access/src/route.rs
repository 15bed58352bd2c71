// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route table and navigation decisions.
//!
//! The table is a static ordered list of routes. It is the only place where
//! routes are interpreted for access control: [`RouteTable::navigate`] turns a
//! requested path and a session snapshot into either a view to render or a
//! redirect.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use portal_core::{Role, Session};

use crate::guard::{GuardDecision, RouteGuard};

/// Default not-found page.
pub const NOT_FOUND_PATH: &str = "/404";

// =============================================================================
// Route
// =============================================================================

/// A page of the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Path pattern. Segments starting with `:` match any single segment.
    pub path: String,
    /// Route name.
    pub name: String,
    /// Reference to the lazily resolved view.
    pub component: String,
    /// Whether the route sits behind the guard.
    #[serde(default = "default_requires_auth")]
    pub requires_auth: bool,
    /// Roles allowed to render the route. `None` means any authenticated user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_roles: Option<Vec<Role>>,
}

fn default_requires_auth() -> bool {
    true
}

impl Route {
    /// A route anyone can render.
    pub fn public(
        path: impl Into<String>,
        name: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            component: component.into(),
            requires_auth: false,
            allowed_roles: None,
        }
    }

    /// A route any authenticated user can render.
    pub fn protected(
        path: impl Into<String>,
        name: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            requires_auth: true,
            ..Self::public(path, name, component)
        }
    }

    /// A route restricted to the given roles.
    pub fn restricted(
        path: impl Into<String>,
        name: impl Into<String>,
        component: impl Into<String>,
        roles: &[Role],
    ) -> Self {
        Self {
            allowed_roles: Some(roles.to_vec()),
            ..Self::protected(path, name, component)
        }
    }

    /// Returns `true` if the (normalized) path matches this route's pattern.
    pub fn matches(&self, path: &str) -> bool {
        let pattern = normalize_path(&self.path);
        if pattern == path {
            return true;
        }

        let mut pattern_segments = pattern.split('/');
        let mut path_segments = path.split('/');
        loop {
            match (pattern_segments.next(), path_segments.next()) {
                (None, None) => return true,
                (Some(p), Some(s)) if p.starts_with(':') && !s.is_empty() => continue,
                (Some(p), Some(s)) if p == s => continue,
                _ => return false,
            }
        }
    }

    /// Evaluates the guard for this route.
    pub fn check(&self, guard: &RouteGuard, session: &Session) -> GuardDecision {
        if !self.requires_auth {
            return GuardDecision::Allow;
        }
        guard.check(session, self.allowed_roles.as_deref())
    }
}

/// Strips query and fragment and trailing slashes.
pub fn normalize_path(path: &str) -> String {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

// =============================================================================
// Role homes
// =============================================================================

/// Landing page per role, used by the root redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleHomes {
    /// Admin landing page.
    pub admin: String,
    /// Teacher landing page.
    pub teacher: String,
    /// Student landing page.
    pub student: String,
}

impl Default for RoleHomes {
    fn default() -> Self {
        Self {
            admin: "/admin/dashboard".to_string(),
            teacher: "/dashboard".to_string(),
            student: "/perfil".to_string(),
        }
    }
}

impl RoleHomes {
    /// Returns the landing page for `role`.
    pub fn home_for(&self, role: Role) -> &str {
        match role {
            Role::Admin => &self.admin,
            Role::Teacher => &self.teacher,
            Role::Student => &self.student,
        }
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// Result of resolving a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation<'a> {
    /// Render this route.
    Render(&'a Route),
    /// Go to this path instead.
    Redirect(String),
}

impl Navigation<'_> {
    /// Returns the redirect target, if any.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Navigation::Render(_) => None,
            Navigation::Redirect(target) => Some(target),
        }
    }
}

// =============================================================================
// RouteTable
// =============================================================================

/// Ordered list of routes plus the redirect policy.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    guard: RouteGuard,
    homes: RoleHomes,
    not_found_path: String,
}

impl RouteTable {
    /// Creates a table with default redirect targets.
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes,
            guard: RouteGuard::default(),
            homes: RoleHomes::default(),
            not_found_path: NOT_FOUND_PATH.to_string(),
        }
    }

    /// The portal's route table.
    pub fn portal() -> Self {
        Self::new(PORTAL_ROUTES.clone())
    }

    /// Sets the guard.
    pub fn with_guard(mut self, guard: RouteGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Sets the role landing pages.
    pub fn with_homes(mut self, homes: RoleHomes) -> Self {
        self.homes = homes;
        self
    }

    /// Sets the not-found page.
    pub fn with_not_found(mut self, path: impl Into<String>) -> Self {
        self.not_found_path = path.into();
        self
    }

    /// Returns the routes in declaration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the guard.
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Returns the first route matching `path`.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let path = normalize_path(path);
        self.routes.iter().find(|route| route.matches(&path))
    }

    /// Where `/` sends the current session.
    pub fn root_redirect(&self, session: &Session) -> String {
        match session.role {
            Some(role) if session.is_authenticated => self.homes.home_for(role).to_string(),
            _ => self.guard.login_path.clone(),
        }
    }

    /// Decides what happens when the user navigates to `path`.
    pub fn navigate(&self, path: &str, session: &Session) -> Navigation<'_> {
        let normalized = normalize_path(path);
        if normalized == "/" {
            let target = self.root_redirect(session);
            debug!(target = %target, "root redirect");
            return Navigation::Redirect(target);
        }

        let Some(route) = self.resolve(&normalized) else {
            debug!(path = %normalized, "no route matched");
            return Navigation::Redirect(self.not_found_path.clone());
        };

        match route.check(&self.guard, session) {
            GuardDecision::Allow => Navigation::Render(route),
            GuardDecision::RedirectTo(target) => Navigation::Redirect(target),
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::portal()
    }
}

/// Root redirect with the default landing pages.
pub fn root_redirect(session: &Session) -> String {
    RouteTable::new(Vec::new()).root_redirect(session)
}

static PORTAL_ROUTES: Lazy<Vec<Route>> = Lazy::new(|| {
    use Role::{Admin, Student, Teacher};

    vec![
        // Public pages
        Route::public("/login", "login", "views/auth/Login"),
        Route::public("/register", "register", "views/auth/Register"),
        Route::public("/home", "home", "views/Home"),
        Route::public("/403", "forbidden", "views/errors/Forbidden"),
        Route::public("/404", "not-found", "views/errors/NotFound"),
        // Admin
        Route::restricted("/admin/dashboard", "admin-dashboard", "views/admin/Dashboard", &[Admin]),
        Route::restricted("/admin/users", "admin-users", "views/admin/Users", &[Admin]),
        Route::restricted("/admin/users/:id", "admin-user-edit", "views/admin/UserEdit", &[Admin]),
        Route::restricted("/admin/posts", "admin-posts", "views/admin/Posts", &[Admin]),
        Route::restricted(
            "/admin/publications",
            "admin-publications",
            "views/admin/Publications",
            &[Admin],
        ),
        // Teacher
        Route::restricted("/dashboard", "teacher-dashboard", "views/teacher/Dashboard", &[Teacher]),
        Route::restricted("/questions", "questions", "views/teacher/Questions", &[Teacher, Admin]),
        Route::restricted("/reports", "reports", "views/Reports", &[Teacher, Admin]),
        // Student
        Route::restricted("/quiz", "quiz", "views/student/Quiz", &[Student]),
        // Any authenticated user
        Route::protected("/perfil", "profile", "views/Profile"),
        Route::protected("/forum", "forum", "views/forum/Forum"),
        Route::protected("/forum/:id", "forum-post", "views/forum/Post"),
        Route::protected("/publications", "publications", "views/Publications"),
        Route::protected("/plan", "study-plan", "views/StudyPlan"),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session::authenticated(Some(role))
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/dashboard/"), "/dashboard");
        assert_eq!(normalize_path("/forum?page=2"), "/forum");
        assert_eq!(normalize_path("/perfil#datos"), "/perfil");
        assert_eq!(normalize_path("quiz"), "/quiz");
    }

    #[test]
    fn test_pattern_matching() {
        let route = Route::protected("/forum/:id", "forum-post", "Post");
        assert!(route.matches("/forum/15"));
        assert!(!route.matches("/forum"));
        assert!(!route.matches("/forum/15/edit"));
    }

    #[test]
    fn test_root_redirect_is_total() {
        assert_eq!(root_redirect(&session(Role::Admin)), "/admin/dashboard");
        assert_eq!(root_redirect(&session(Role::Teacher)), "/dashboard");
        assert_eq!(root_redirect(&session(Role::Student)), "/perfil");
        assert_eq!(root_redirect(&Session::authenticated(None)), "/login");
        assert_eq!(root_redirect(&Session::anonymous()), "/login");
    }

    #[test]
    fn test_navigate_public_route() {
        let table = RouteTable::portal();
        let nav = table.navigate("/login", &Session::anonymous());
        assert!(matches!(nav, Navigation::Render(route) if route.name == "login"));
    }

    #[test]
    fn test_navigate_guarded_routes() {
        let table = RouteTable::portal();

        assert_eq!(
            table.navigate("/admin/users", &Session::anonymous()).redirect_target(),
            Some("/login")
        );
        assert_eq!(
            table.navigate("/admin/users", &session(Role::Student)).redirect_target(),
            Some("/403")
        );
        assert!(matches!(
            table.navigate("/admin/users/3", &session(Role::Admin)),
            Navigation::Render(route) if route.name == "admin-user-edit"
        ));
        assert!(matches!(
            table.navigate("/forum", &session(Role::Student)),
            Navigation::Render(_)
        ));
    }

    #[test]
    fn test_navigate_root_and_unknown() {
        let table = RouteTable::portal();
        assert_eq!(
            table.navigate("/", &session(Role::Teacher)).redirect_target(),
            Some("/dashboard")
        );
        assert_eq!(
            table.navigate("/nowhere", &session(Role::Teacher)).redirect_target(),
            Some("/404")
        );
    }

    #[test]
    fn test_custom_homes_and_guard() {
        let table = RouteTable::portal()
            .with_guard(RouteGuard::new("/ingresar", "/prohibido"))
            .with_homes(RoleHomes {
                student: "/quiz".to_string(),
                ..RoleHomes::default()
            })
            .with_not_found("/no-existe");

        assert_eq!(table.root_redirect(&session(Role::Student)), "/quiz");
        assert_eq!(
            table.navigate("/quiz", &Session::anonymous()).redirect_target(),
            Some("/ingresar")
        );
        assert_eq!(
            table.navigate("/x", &session(Role::Student)).redirect_target(),
            Some("/no-existe")
        );
    }

    #[test]
    fn test_route_deserialization_defaults() {
        let route: Route =
            serde_json::from_str(r#"{"path": "/x", "name": "x", "component": "X"}"#).unwrap();
        assert!(route.requires_auth);
        assert_eq!(route.allowed_roles, None);
    }
}
