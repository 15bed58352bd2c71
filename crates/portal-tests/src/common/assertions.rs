// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Assertion helpers with failure messages that name the offending key,
//! path or label.

use portal_access::{MenuEntry, Navigation};
use portal_core::{keys, SessionContext};

// =============================================================================
// Session Assertions
// =============================================================================

/// Asserts that none of the session keys are stored.
pub fn assert_session_cleared(ctx: &SessionContext) {
    for key in keys::ALL {
        assert!(
            ctx.store().get(key).is_none(),
            "Expected session key '{}' to be cleared, found {:?}",
            key,
            ctx.store().get(key)
        );
    }
}

/// Asserts that every session key is stored.
pub fn assert_session_present(ctx: &SessionContext) {
    for key in keys::ALL {
        assert!(
            ctx.store().get(key).is_some(),
            "Expected session key '{}' to be stored",
            key
        );
    }
}

// =============================================================================
// Navigation Assertions
// =============================================================================

/// Asserts that `navigation` renders the route named `name`.
pub fn assert_renders(navigation: &Navigation<'_>, name: &str) {
    match navigation {
        Navigation::Render(route) => assert_eq!(
            route.name, name,
            "Expected route '{}' to render, got '{}'",
            name, route.name
        ),
        Navigation::Redirect(target) => {
            panic!("Expected route '{}' to render, got redirect to {}", name, target)
        }
    }
}

/// Asserts that `navigation` redirects to `target`.
pub fn assert_redirects(navigation: &Navigation<'_>, target: &str) {
    assert_eq!(
        navigation.redirect_target(),
        Some(target),
        "Expected redirect to {}, got {:?}",
        target,
        navigation
    );
}

// =============================================================================
// Menu Assertions
// =============================================================================

/// Returns the labels of the top-level entries.
pub fn top_labels(tree: &[MenuEntry]) -> Vec<&str> {
    tree.iter().map(|entry| entry.label.as_str()).collect()
}

/// Returns every label in depth-first order.
pub fn all_labels(tree: &[MenuEntry]) -> Vec<String> {
    let mut labels = Vec::new();
    collect_labels(tree, &mut labels);
    labels
}

fn collect_labels(tree: &[MenuEntry], out: &mut Vec<String>) {
    for entry in tree {
        out.push(entry.label.clone());
        if let Some(children) = entry.children() {
            collect_labels(children, out);
        }
    }
}

/// Returns the top-level entry labelled `label`, panicking if absent.
pub fn find_entry<'a>(tree: &'a [MenuEntry], label: &str) -> &'a MenuEntry {
    tree.iter()
        .find(|entry| entry.label == label)
        .unwrap_or_else(|| panic!("No top-level entry '{}' in {:?}", label, top_labels(tree)))
}

/// Asserts that no entry anywhere in `tree` is labelled `label`.
pub fn assert_hidden(tree: &[MenuEntry], label: &str) {
    assert!(
        !all_labels(tree).iter().any(|l| l == label),
        "Expected '{}' to be hidden, menu was {:?}",
        label,
        all_labels(tree)
    );
}
