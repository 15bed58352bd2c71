// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Portal roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The roles known to the portal.
///
/// A role controls both page access (route guard) and sidebar visibility
/// (navigation filter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Teaching staff.
    Teacher,
    /// Enrolled student.
    Student,
}

impl Role {
    /// Returns the role name as stored in the session.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    /// Parses a role from a string.
    ///
    /// Matching is case-insensitive and accepts the Spanish names used by the
    /// portal's records. Anything else is `None`, which every consumer treats
    /// as "no role".
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" | "administrator" | "administrador" => Some(Role::Admin),
            "teacher" | "profesor" | "docente" => Some(Role::Teacher),
            "student" | "estudiante" | "alumno" => Some(Role::Student),
            _ => None,
        }
    }

    /// Returns all roles.
    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::Teacher, Role::Student]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| format!("unknown role '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("TEACHER"), Some(Role::Teacher));
        assert_eq!(Role::parse(" student "), Some(Role::Student));
        assert_eq!(Role::parse("docente"), Some(Role::Teacher));
        assert_eq!(Role::parse("alumno"), Some(Role::Student));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Role::Teacher).unwrap();
        assert_eq!(json, "\"teacher\"");

        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("student".parse::<Role>(), Ok(Role::Student));
        assert!("guest".parse::<Role>().is_err());
    }
}
