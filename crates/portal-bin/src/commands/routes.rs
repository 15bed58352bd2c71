// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `routes` command.

use serde::Serialize;

use portal_access::{GuardDecision, Route};

use super::{describe_session, subject_session, LoadedConfig};
use crate::cli::{OutputFormat, RoutesArgs};
use crate::error::BinResult;

#[derive(Debug, Serialize)]
struct RouteRow<'a> {
    path: &'a str,
    name: &'a str,
    access: String,
    #[serde(flatten)]
    decision: GuardDecision,
}

/// Executes the `routes` command: prints every route with the guard
/// decision for the subject.
pub fn routes(loaded: &LoadedConfig, args: RoutesArgs) -> BinResult<()> {
    let config = loaded.config()?;
    let session = subject_session(&args.subject, config, None)?;
    let table = config.route_table();

    let rows: Vec<RouteRow<'_>> = table
        .routes()
        .iter()
        .map(|route| RouteRow {
            path: &route.path,
            name: &route.name,
            access: access_label(route),
            decision: route.check(table.guard(), &session),
        })
        .collect();

    match args.format {
        OutputFormat::Text => {
            println!("Routes for {}:", describe_session(&session));
            for row in &rows {
                let decision = match &row.decision {
                    GuardDecision::Allow => "allow".to_string(),
                    GuardDecision::RedirectTo(target) => format!("redirect {}", target),
                };
                println!("  {:<24} {:<22} {}", row.path, row.access, decision);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

/// Who may open a route, in a few words.
pub(crate) fn access_label(route: &Route) -> String {
    if !route.requires_auth {
        return "public".to_string();
    }
    match &route.allowed_roles {
        Some(roles) if !roles.is_empty() => roles
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        _ => "authenticated".to_string(),
    }
}
