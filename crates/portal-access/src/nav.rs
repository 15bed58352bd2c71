// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Sidebar navigation filter.
//!
//! [`build_visible_menu`] is a pure, order-preserving, depth-first filter over
//! a menu tree. Entries without a permission are visible to everyone; gated
//! entries are visible only to an admitted role and are hidden entirely when
//! there is no role. A group that survives the filter is re-emitted with its
//! filtered children even when none of them survive.

use tracing::debug;

use portal_core::{Role, UserProfile};

use crate::menu::{Badge, MenuEntry, MenuNode, MenuSet};
use crate::menus::{portal_menus, TEACHER_DASHBOARD_LABEL, TEACHER_DASHBOARD_PATH};

/// Badge color used when the dashboard entry has no badge of its own.
const SEMESTER_BADGE_COLOR: &str = "info";

/// Returns `true` if `entry` is visible to `role`.
pub fn allowed(entry: &MenuEntry, role: Option<Role>) -> bool {
    match (&entry.permission, role) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(permission), Some(role)) => permission.admits(role),
    }
}

/// Returns the subset of `tree` visible to `role`.
pub fn build_visible_menu(tree: &[MenuEntry], role: Option<Role>) -> Vec<MenuEntry> {
    tree.iter()
        .filter(|entry| allowed(entry, role))
        .map(|entry| match &entry.node {
            MenuNode::Leaf(_) => entry.clone(),
            MenuNode::Group(children) => MenuEntry {
                node: MenuNode::Group(build_visible_menu(children, role)),
                ..entry.clone()
            },
        })
        .collect()
}

/// Puts the teacher's assigned semester on the dashboard entry's badge.
///
/// Only the top-level teacher "Dashboard" entry is touched. Nothing happens
/// when `semester` is `None`.
pub fn apply_semester_badge(tree: &mut [MenuEntry], semester: Option<&str>) {
    let Some(semester) = semester else {
        return;
    };

    let dashboard = tree.iter_mut().find(|entry| {
        entry.label == TEACHER_DASHBOARD_LABEL
            && entry
                .target()
                .is_some_and(|target| target.as_str() == TEACHER_DASHBOARD_PATH)
    });

    if let Some(entry) = dashboard {
        match entry.badge.as_mut() {
            Some(badge) => badge.text = semester.to_string(),
            None => entry.badge = Some(Badge::new(SEMESTER_BADGE_COLOR, semester)),
        }
    }
}

// =============================================================================
// Sidebar
// =============================================================================

/// Produces the sidebar for a stored profile.
#[derive(Debug, Clone)]
pub struct Sidebar {
    menus: MenuSet,
}

impl Sidebar {
    /// Creates a sidebar over the given menus.
    pub fn new(menus: MenuSet) -> Self {
        Self { menus }
    }

    /// Returns the menus.
    pub fn menus(&self) -> &MenuSet {
        &self.menus
    }

    /// Returns the visible menu for `profile`.
    ///
    /// The tree is chosen by the profile's role; without a resolvable role the
    /// student tree is used and every gated entry is hidden. Teachers get the
    /// semester badge before filtering.
    pub fn visible_menu(&self, profile: Option<&UserProfile>) -> Vec<MenuEntry> {
        let role = profile.and_then(|p| p.role);
        let mut tree = self.menus.tree_for(role.unwrap_or(Role::Student)).to_vec();

        if role == Some(Role::Teacher) {
            apply_semester_badge(&mut tree, profile.and_then(UserProfile::assigned_semester));
        }

        let visible = build_visible_menu(&tree, role);
        debug!(
            role = ?role,
            entries = visible.iter().map(MenuEntry::count).sum::<usize>(),
            "sidebar built"
        );
        visible
    }
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new(portal_menus().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Vec<MenuEntry> {
        vec![
            MenuEntry::leaf("Inicio", "home", "/home"),
            MenuEntry::leaf("Usuarios", "people", "/admin/users").permit(Role::Admin),
            MenuEntry::group(
                "Docencia",
                "book",
                vec![
                    MenuEntry::leaf("Preguntas", "q", "/questions").permit([Role::Teacher, Role::Admin]),
                    MenuEntry::leaf("Plan", "journal", "/plan"),
                ],
            ),
            MenuEntry::group(
                "Sólo profesores",
                "lock",
                vec![MenuEntry::leaf("Reportes", "chart", "/reports").permit(Role::Teacher)],
            )
            .permit([Role::Teacher, Role::Admin]),
        ]
    }

    fn labels(entries: &[MenuEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.label.as_str()).collect()
    }

    #[test]
    fn test_no_role_hides_gated_entries() {
        let visible = build_visible_menu(&sample_tree(), None);
        assert_eq!(labels(&visible), vec!["Inicio", "Docencia"]);
        assert_eq!(labels(visible[1].children().unwrap()), vec!["Plan"]);
    }

    #[test]
    fn test_membership_in_list_permission() {
        let visible = build_visible_menu(&sample_tree(), Some(Role::Teacher));
        assert_eq!(labels(&visible), vec!["Inicio", "Docencia", "Sólo profesores"]);
        assert_eq!(labels(visible[1].children().unwrap()), vec!["Preguntas", "Plan"]);
        assert_eq!(labels(visible[2].children().unwrap()), vec!["Reportes"]);
    }

    #[test]
    fn test_empty_group_still_rendered() {
        let visible = build_visible_menu(&sample_tree(), Some(Role::Admin));
        let group = visible.iter().find(|e| e.label == "Sólo profesores").unwrap();
        assert!(group.is_group());
        assert!(group.children().unwrap().is_empty());
    }

    #[test]
    fn test_filter_is_deterministic() {
        let tree = sample_tree();
        for role in [None, Some(Role::Admin), Some(Role::Teacher), Some(Role::Student)] {
            assert_eq!(build_visible_menu(&tree, role), build_visible_menu(&tree, role));
        }
    }

    #[test]
    fn test_semester_badge_replaces_text() {
        let mut tree = portal_menus().tree_for(Role::Teacher).to_vec();
        apply_semester_badge(&mut tree, Some("5"));

        let badge = tree[0].badge.as_ref().unwrap();
        assert_eq!(badge.text, "5");
        assert_eq!(badge.color, "info");
    }

    #[test]
    fn test_semester_badge_added_when_missing() {
        let mut tree = vec![MenuEntry::leaf("Dashboard", "home", "/dashboard")];
        apply_semester_badge(&mut tree, Some("2"));
        assert_eq!(tree[0].badge, Some(Badge::new("info", "2")));

        let mut untouched = vec![MenuEntry::leaf("Dashboard", "home", "/admin/dashboard")];
        apply_semester_badge(&mut untouched, Some("2"));
        assert_eq!(untouched[0].badge, None);
    }

    #[test]
    fn test_sidebar_teacher_gets_semester() {
        let profile = UserProfile::new("3", "Marta", Some(Role::Teacher)).with_semester("4");
        let visible = Sidebar::default().visible_menu(Some(&profile));

        assert_eq!(visible[0].label, "Dashboard");
        assert_eq!(visible[0].badge.as_ref().unwrap().text, "4");
    }

    #[test]
    fn test_sidebar_without_semester_keeps_default_badge() {
        let profile = UserProfile::new("3", "Marta", Some(Role::Teacher));
        let visible = Sidebar::default().visible_menu(Some(&profile));
        assert_eq!(visible[0].badge.as_ref().unwrap().text, "Semestre");
    }

    #[test]
    fn test_sidebar_without_role_is_student_tree_ungated() {
        let visible = Sidebar::default().visible_menu(None);
        let all = labels(&visible);
        assert!(all.contains(&"Perfil"));
        assert!(!all.contains(&"Quiz"));
    }

    #[test]
    fn test_sidebar_student() {
        let profile = UserProfile::new("9", "Rosa", Some(Role::Student));
        let visible = Sidebar::default().visible_menu(Some(&profile));
        assert!(labels(&visible).contains(&"Quiz"));
    }
}
