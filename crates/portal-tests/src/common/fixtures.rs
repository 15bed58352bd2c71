// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Signed tokens, user profiles and menu documents.
//!
//! Timer tests run against a [`ManualClock`](portal_expiry::ManualClock)
//! frozen at [`NOW`], so token expiries are expressed relative to it.

use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

use portal_core::{Login, Role, UserProfile};

/// Frozen wall-clock time used by timer tests (2027-01-15).
pub const NOW: i64 = 1_800_000_000;

/// Secret used to sign fixture tokens. The access layer never verifies it.
pub const SIGNING_SECRET: &[u8] = b"portal-test-secret";

// =============================================================================
// Token Fixtures
// =============================================================================

#[derive(Debug, Serialize)]
struct FixtureClaims<'a> {
    sub: &'a str,
    role: &'a str,
    iat: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Fixture providing bearer tokens.
pub struct TokenFixtures;

impl TokenFixtures {
    /// An HS256 token for `role` expiring at `exp`.
    pub fn signed(role: Role, exp: Option<i64>) -> String {
        let claims = FixtureClaims {
            sub: "42",
            role: role.as_str(),
            iat: NOW - 3600,
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SIGNING_SECRET),
        )
        .expect("Failed to sign fixture token")
    }

    /// A token expiring `secs` after [`NOW`]. Negative values are in the past.
    pub fn expiring_in(secs: i64) -> String {
        Self::signed(Role::Student, Some(NOW + secs))
    }

    /// A well-formed token without an `exp` claim.
    pub fn without_exp() -> String {
        Self::signed(Role::Student, None)
    }

    /// An HS256 token carrying `claims` verbatim, for claim shapes the typed
    /// fixtures cannot express.
    pub fn with_claims(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SIGNING_SECRET),
        )
        .expect("Failed to sign fixture token")
    }

    /// A token that is not a JWT at all.
    pub fn opaque() -> String {
        "sess_5f1c2a9e0b7d".to_string()
    }
}

// =============================================================================
// Profile Fixtures
// =============================================================================

/// Fixture providing stored user profiles.
pub struct ProfileFixtures;

impl ProfileFixtures {
    /// An administrator.
    pub fn admin() -> UserProfile {
        UserProfile::new("1", "Ana Torres", Some(Role::Admin)).with_email("ana@example.org")
    }

    /// A teacher assigned to `semester`.
    pub fn teacher(semester: &str) -> UserProfile {
        UserProfile::new("10", "Marta Ruiz", Some(Role::Teacher)).with_semester(semester)
    }

    /// A student.
    pub fn student() -> UserProfile {
        UserProfile::new("100", "Rosa Díaz", Some(Role::Student)).with_score(87.5)
    }

    /// The profile matching `role`.
    pub fn for_role(role: Role) -> UserProfile {
        match role {
            Role::Admin => Self::admin(),
            Role::Teacher => Self::teacher("3"),
            Role::Student => Self::student(),
        }
    }

    /// A login record for `role` with `token`.
    pub fn login(role: Role, token: impl Into<String>) -> Login {
        Login::new(token, role, Self::for_role(role))
    }

    /// Legacy stored profile JSON that carries the role under `type` and
    /// uses numeric ids.
    pub fn legacy_json(role_field: &str, role: &str) -> String {
        format!(
            r#"{{"id": 77, "name": "Luis", "{}": "{}", "semester": 4}}"#,
            role_field, role
        )
    }
}

// =============================================================================
// Menu Fixtures
// =============================================================================

/// Fixture providing menu documents.
pub struct MenuFixtures;

impl MenuFixtures {
    /// A YAML menu set with an admin group whose children are all
    /// teacher-only.
    pub fn yaml_with_teacher_only_group() -> &'static str {
        r#"
admin:
  - label: Dashboard
    icon: home
    target: /admin/dashboard
  - label: Docencia
    icon: book
    children:
      - label: Preguntas
        icon: help
        target: /questions
        permission: teacher
      - label: Reportes
        icon: chart
        target: /reports
        permission: [teacher]
teacher:
  - label: Dashboard
    icon: home
    target: /dashboard
    permission: teacher
student:
  - label: Perfil
    icon: user
    target: /perfil
  - label: Campus
    icon: globe
    target: https://campus.example.org
"#
    }

    /// A JSON entry with both a target and children.
    pub fn json_with_invalid_entry() -> &'static str {
        r#"{
  "admin": [
    {"label": "Roto", "icon": "x", "target": "/a", "children": []}
  ],
  "teacher": [],
  "student": []
}"#
    }
}
