// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User profile as stored in the session.
//!
//! Records written by the REST backend carry the role under one of three
//! field names (`role`, `permission` or `type`). They are normalized here, at
//! the store boundary, so the rest of the crate only ever sees
//! [`UserProfile::role`].

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Denormalized user attributes, read-only for the access layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProfile")]
pub struct UserProfile {
    /// User identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Resolved role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Assigned semester (teachers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    /// Accumulated quiz score (students).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl UserProfile {
    /// Creates a profile with the given id, name and role.
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            role,
            semester: None,
            score: None,
        }
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the assigned semester.
    pub fn with_semester(mut self, semester: impl Into<String>) -> Self {
        self.semester = Some(semester.into());
        self
    }

    /// Sets the score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Returns the semester if it is set and non-blank.
    pub fn assigned_semester(&self) -> Option<&str> {
        self.semester
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

// =============================================================================
// Legacy record adapter
// =============================================================================

/// Wire shape of a profile record as the backend writes it.
#[derive(Debug, Deserialize)]
struct RawProfile {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    permission: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    semester: Option<serde_json::Value>,
    #[serde(default)]
    score: Option<f64>,
}

impl RawProfile {
    /// First non-empty of `role`, `permission`, `type`.
    fn role_field(&self) -> Option<&str> {
        [&self.role, &self.permission, &self.kind]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .find(|value| !value.is_empty())
    }
}

impl From<RawProfile> for UserProfile {
    fn from(raw: RawProfile) -> Self {
        let role = raw.role_field().and_then(Role::parse);

        Self {
            id: raw.id.as_ref().map(scalar_to_string).unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            email: raw.email,
            role,
            semester: raw
                .semester
                .as_ref()
                .map(scalar_to_string)
                .filter(|s| !s.is_empty()),
            score: raw.score,
        }
    }
}

/// The backend uses both numeric and string ids and semesters.
fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
