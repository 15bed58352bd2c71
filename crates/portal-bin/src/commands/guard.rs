// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `guard` command.

use portal_access::Navigation;

use super::{describe_session, subject_session, LoadedConfig};
use crate::cli::{GuardArgs, OutputFormat};
use crate::error::BinResult;

/// Executes the `guard` command: resolves one navigation request.
pub fn guard(loaded: &LoadedConfig, args: GuardArgs) -> BinResult<()> {
    let config = loaded.config()?;
    let session = subject_session(&args.subject, config, None)?;
    let table = config.route_table();
    let navigation = table.navigate(&args.path, &session);

    match args.format {
        OutputFormat::Text => match &navigation {
            Navigation::Render(route) => println!(
                "{} as {}: render {} ({})",
                args.path,
                describe_session(&session),
                route.name,
                route.component
            ),
            Navigation::Redirect(target) => println!(
                "{} as {}: redirect to {}",
                args.path,
                describe_session(&session),
                target
            ),
        },
        OutputFormat::Json => {
            let output = match &navigation {
                Navigation::Render(route) => serde_json::json!({
                    "path": args.path,
                    "decision": "render",
                    "route": route.name,
                    "component": route.component,
                }),
                Navigation::Redirect(target) => serde_json::json!({
                    "path": args.path,
                    "decision": "redirect",
                    "target": target,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
