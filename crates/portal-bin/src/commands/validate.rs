// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use portal_access::MenuEntry;
use portal_config::{PortalConfig, StoreKind};
use portal_core::Role;

use super::LoadedConfig;
use crate::cli::{OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Executes the `validate` command.
pub fn validate(loaded: &LoadedConfig, args: ValidateArgs) -> BinResult<()> {
    if !loaded.found() {
        return Err(BinError::config(format!(
            "Configuration file not found: {}",
            loaded.path().display()
        )));
    }

    let config = loaded.config()?;

    // The menu file is only read lazily by the other commands; load it here
    // so a broken file fails validation.
    let menus = config
        .menu_set()
        .map_err(|e| BinError::from(e).with_context("Menu file is invalid"))?;
    let menu_counts: Vec<(Role, usize)> = Role::all()
        .iter()
        .map(|role| (*role, menus.tree_for(*role).iter().map(MenuEntry::count).sum()))
        .collect();

    let warnings = collect_warnings(config);

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", loaded.path().display());
            println!();
            println!("Summary:");
            match config.session.store {
                StoreKind::Memory => println!("  Session store: memory"),
                StoreKind::File => {
                    println!("  Session store: file ({})", config.session.path.display())
                }
            }
            println!("  Login page:    {}", config.routes.login);
            println!("  Forbidden:     {}", config.routes.forbidden);
            println!("  Not found:     {}", config.routes.not_found);
            println!(
                "  Homes:         admin={} teacher={} student={}",
                config.routes.homes.admin, config.routes.homes.teacher, config.routes.homes.student
            );
            println!(
                "  Expiry:        warn {}s before, countdown from {}{}",
                config.expiry.warning_lead_secs,
                config.expiry.countdown_secs,
                if config.expiry.clamp_countdown { " (clamped)" } else { "" }
            );
            println!("  Public paths:  {}", config.expiry.public_paths.join(", "));
            match &config.menus.file {
                Some(file) => println!("  Menus:         {}", file.display()),
                None => println!("  Menus:         built-in"),
            }
            for (role, count) in &menu_counts {
                println!("    {:<8} {} entries", role.as_str(), count);
            }

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!("{}", serde_json::to_string_pretty(config)?);
            }
        }
        OutputFormat::Json => {
            let counts: serde_json::Map<String, serde_json::Value> = menu_counts
                .iter()
                .map(|(role, count)| (role.as_str().to_string(), (*count).into()))
                .collect();
            let output = serde_json::json!({
                "valid": true,
                "config_path": loaded.path().display().to_string(),
                "summary": {
                    "session_store": config.session.store.as_str(),
                    "login": config.routes.login,
                    "warning_lead_secs": config.expiry.warning_lead_secs,
                    "countdown_secs": config.expiry.countdown_secs,
                    "clamp_countdown": config.expiry.clamp_countdown,
                    "custom_menus": config.menus.file.is_some(),
                    "menu_entries": counts,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(config) } else { None },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn collect_warnings(config: &PortalConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.expiry.countdown_secs > config.expiry.warning_lead_secs
        && !config.expiry.clamp_countdown
    {
        warnings.push(format!(
            "Countdown starts at {}s but the warning only appears {}s before expiry",
            config.expiry.countdown_secs, config.expiry.warning_lead_secs
        ));
    }

    if config.session.store == StoreKind::File {
        if let Some(parent) = config.session.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                warnings.push(format!(
                    "Session directory does not exist yet: {}",
                    parent.display()
                ));
            }
        }
    }

    warnings
}
