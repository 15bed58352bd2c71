// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `menu` command.

use std::fmt::Write as _;

use portal_access::{MenuEntry, MenuNode, MenuSet, Sidebar};

use super::{describe_session, subject_session, LoadedConfig};
use crate::cli::{MenuArgs, OutputFormat};
use crate::error::BinResult;

/// Executes the `menu` command: prints the sidebar the subject would see.
pub fn menu(loaded: &LoadedConfig, args: MenuArgs) -> BinResult<()> {
    let config = loaded.config()?;
    let session = subject_session(&args.subject, config, args.semester.as_deref())?;

    let menus = match &args.menu_file {
        Some(path) => MenuSet::load(path)?,
        None => config.menu_set()?,
    };
    let visible = Sidebar::new(menus).visible_menu(session.current_user.as_ref());

    match args.format {
        OutputFormat::Text => {
            println!("Menu for {}:", describe_session(&session));
            print!("{}", render_tree(&visible));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&visible)?);
        }
    }
    Ok(())
}

/// Renders entries as an indented tree.
pub(crate) fn render_tree(entries: &[MenuEntry]) -> String {
    let mut out = String::new();
    render_level(entries, 1, &mut out);
    out
}

fn render_level(entries: &[MenuEntry], depth: usize, out: &mut String) {
    for entry in entries {
        let indent = "  ".repeat(depth);
        let label = format!("{}{}", indent, entry.label);
        let badge = entry
            .badge
            .as_ref()
            .map(|b| format!("  [{}: {}]", b.color, b.text))
            .unwrap_or_default();

        match &entry.node {
            MenuNode::Leaf(target) => {
                let external = if target.is_external() { " (external)" } else { "" };
                let _ = writeln!(out, "{:<32} {}{}{}", label, target, external, badge);
            }
            MenuNode::Group(children) => {
                let _ = writeln!(out, "{}{}", label, badge);
                render_level(children, depth + 1, out);
            }
        }
    }
}
