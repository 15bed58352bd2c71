// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Sidebar menu definitions.
//!
//! A menu is an ordered tree of [`MenuEntry`] values. Each entry is either a
//! leaf pointing at a target or a group holding children, never both and
//! never neither. The type enforces this with [`MenuNode`]; deserialization
//! rejects records that violate it.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use portal_core::Role;

use crate::error::{AccessError, AccessResult};

// =============================================================================
// Badge
// =============================================================================

/// Small label rendered next to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    /// Color name.
    pub color: String,
    /// Badge text.
    pub text: String,
}

impl Badge {
    /// Creates a badge.
    pub fn new(color: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            text: text.into(),
        }
    }
}

// =============================================================================
// MenuPermission
// =============================================================================

/// Roles allowed to see an entry: a single role or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuPermission {
    /// Exactly this role.
    One(Role),
    /// Any of these roles.
    Any(Vec<Role>),
}

impl MenuPermission {
    /// Returns `true` if `role` is admitted.
    pub fn admits(&self, role: Role) -> bool {
        match self {
            MenuPermission::One(required) => *required == role,
            MenuPermission::Any(roles) => roles.contains(&role),
        }
    }
}

impl From<Role> for MenuPermission {
    fn from(role: Role) -> Self {
        MenuPermission::One(role)
    }
}

impl<const N: usize> From<[Role; N]> for MenuPermission {
    fn from(roles: [Role; N]) -> Self {
        MenuPermission::Any(roles.to_vec())
    }
}

impl From<Vec<Role>> for MenuPermission {
    fn from(roles: Vec<Role>) -> Self {
        MenuPermission::Any(roles)
    }
}

// =============================================================================
// MenuTarget
// =============================================================================

/// Where a leaf entry leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MenuTarget {
    /// A path inside the portal.
    Route(String),
    /// An absolute URL outside the portal.
    External(String),
}

impl MenuTarget {
    /// Returns the target as a string.
    pub fn as_str(&self) -> &str {
        match self {
            MenuTarget::Route(path) | MenuTarget::External(path) => path,
        }
    }

    /// Returns `true` for targets outside the portal.
    pub fn is_external(&self) -> bool {
        matches!(self, MenuTarget::External(_))
    }
}

impl From<String> for MenuTarget {
    fn from(target: String) -> Self {
        if target.starts_with("http://") || target.starts_with("https://") {
            MenuTarget::External(target)
        } else {
            MenuTarget::Route(target)
        }
    }
}

impl From<&str> for MenuTarget {
    fn from(target: &str) -> Self {
        MenuTarget::from(target.to_string())
    }
}

impl From<MenuTarget> for String {
    fn from(target: MenuTarget) -> Self {
        match target {
            MenuTarget::Route(path) | MenuTarget::External(path) => path,
        }
    }
}

impl fmt::Display for MenuTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// MenuEntry
// =============================================================================

/// Leaf or group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    /// Navigates to a target.
    Leaf(MenuTarget),
    /// Holds nested entries.
    Group(Vec<MenuEntry>),
}

/// A node of the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMenuEntry", into = "RawMenuEntry")]
pub struct MenuEntry {
    /// Display label.
    pub label: String,
    /// Icon name.
    pub icon: String,
    /// Optional badge.
    pub badge: Option<Badge>,
    /// Roles allowed to see the entry. `None` means everyone.
    pub permission: Option<MenuPermission>,
    /// Leaf target or group children.
    pub node: MenuNode,
}

impl MenuEntry {
    /// Creates a leaf entry.
    pub fn leaf(
        label: impl Into<String>,
        icon: impl Into<String>,
        target: impl Into<MenuTarget>,
    ) -> Self {
        Self {
            label: label.into(),
            icon: icon.into(),
            badge: None,
            permission: None,
            node: MenuNode::Leaf(target.into()),
        }
    }

    /// Creates a group entry.
    pub fn group(
        label: impl Into<String>,
        icon: impl Into<String>,
        children: Vec<MenuEntry>,
    ) -> Self {
        Self {
            label: label.into(),
            icon: icon.into(),
            badge: None,
            permission: None,
            node: MenuNode::Group(children),
        }
    }

    /// Sets the badge.
    pub fn with_badge(mut self, color: impl Into<String>, text: impl Into<String>) -> Self {
        self.badge = Some(Badge::new(color, text));
        self
    }

    /// Restricts the entry to the given roles.
    pub fn permit(mut self, permission: impl Into<MenuPermission>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Returns `true` for groups.
    pub fn is_group(&self) -> bool {
        matches!(self.node, MenuNode::Group(_))
    }

    /// Returns the target of a leaf.
    pub fn target(&self) -> Option<&MenuTarget> {
        match &self.node {
            MenuNode::Leaf(target) => Some(target),
            MenuNode::Group(_) => None,
        }
    }

    /// Returns the children of a group.
    pub fn children(&self) -> Option<&[MenuEntry]> {
        match &self.node {
            MenuNode::Leaf(_) => None,
            MenuNode::Group(children) => Some(children),
        }
    }

    /// Counts this entry and all its descendants.
    pub fn count(&self) -> usize {
        1 + self
            .children()
            .map(|children| children.iter().map(MenuEntry::count).sum())
            .unwrap_or(0)
    }
}

/// Wire form of an entry: `target` and `children` are separate optional keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawMenuEntry {
    label: String,
    #[serde(default)]
    icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    badge: Option<Badge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    permission: Option<MenuPermission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<MenuTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<MenuEntry>>,
}

impl TryFrom<RawMenuEntry> for MenuEntry {
    type Error = AccessError;

    fn try_from(raw: RawMenuEntry) -> Result<Self, Self::Error> {
        let node = match (raw.target, raw.children) {
            (Some(target), None) => MenuNode::Leaf(target),
            (None, Some(children)) => MenuNode::Group(children),
            (Some(_), Some(_)) => {
                return Err(AccessError::invalid_entry(
                    raw.label,
                    "has both a target and children",
                ))
            }
            (None, None) => {
                return Err(AccessError::invalid_entry(
                    raw.label,
                    "needs either a target or children",
                ))
            }
        };

        Ok(Self {
            label: raw.label,
            icon: raw.icon,
            badge: raw.badge,
            permission: raw.permission,
            node,
        })
    }
}

impl From<MenuEntry> for RawMenuEntry {
    fn from(entry: MenuEntry) -> Self {
        let (target, children) = match entry.node {
            MenuNode::Leaf(target) => (Some(target), None),
            MenuNode::Group(children) => (None, Some(children)),
        };

        Self {
            label: entry.label,
            icon: entry.icon,
            badge: entry.badge,
            permission: entry.permission,
            target,
            children,
        }
    }
}

// =============================================================================
// MenuSet
// =============================================================================

/// The three role-specific menu trees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuSet {
    /// Admin sidebar.
    pub admin: Vec<MenuEntry>,
    /// Teacher sidebar.
    pub teacher: Vec<MenuEntry>,
    /// Student sidebar.
    pub student: Vec<MenuEntry>,
}

impl MenuSet {
    /// Returns the tree for `role`.
    pub fn tree_for(&self, role: Role) -> &[MenuEntry] {
        match role {
            Role::Admin => &self.admin,
            Role::Teacher => &self.teacher,
            Role::Student => &self.student,
        }
    }

    /// Loads a menu set from a JSON or YAML file.
    pub fn load(path: impl AsRef<Path>) -> AccessResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AccessError::io(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| AccessError::parse(path, e.to_string()))
            }
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| AccessError::parse(path, e.to_string()))
            }
            _ => Err(AccessError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}
