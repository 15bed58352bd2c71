// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `session` commands.

use tracing::warn;

use portal_core::{Login, SessionContext, UserProfile};
use portal_expiry::{expires_at, Clock, SystemClock};

use super::{describe_session, LoadedConfig};
use crate::cli::{LoginArgs, OutputFormat, SessionCommand, ShowArgs};
use crate::error::BinResult;

/// Executes a `session` subcommand against the configured store.
pub fn session(loaded: &LoadedConfig, command: SessionCommand) -> BinResult<()> {
    let config = loaded.config()?;
    let ctx = SessionContext::new(config.open_store()?);

    match command {
        SessionCommand::Login(args) => login(&ctx, args),
        SessionCommand::Logout => {
            ctx.logout()?;
            println!("Session cleared");
            Ok(())
        }
        SessionCommand::Show(args) => show(&ctx, args),
    }
}

fn login(ctx: &SessionContext, args: LoginArgs) -> BinResult<()> {
    let mut profile = UserProfile::new(args.id, args.name, Some(args.role));
    if let Some(email) = args.email {
        profile = profile.with_email(email);
    }
    if let Some(semester) = args.semester {
        profile = profile.with_semester(semester);
    }

    ctx.login(Login::new(args.token.clone(), args.role, profile))?;
    println!("Logged in as {}", describe_session(&ctx.snapshot()));

    match expires_at(&args.token) {
        Ok(exp) => {
            let remaining = exp - SystemClock.now_unix();
            if remaining <= 0 {
                warn!(exp, "Stored token is already expired");
                println!("Token already expired; the monitor will end this session on mount");
            } else {
                println!("Token expires in {}s", remaining);
            }
        }
        Err(e) => println!("Token expiry unknown ({}); expiry will not be enforced", e),
    }
    Ok(())
}

fn show(ctx: &SessionContext, args: ShowArgs) -> BinResult<()> {
    let session = ctx.snapshot();

    match args.format {
        OutputFormat::Text => {
            println!("Session: {}", describe_session(&session));
            if let Some(user) = &session.current_user {
                println!("  Id:       {}", user.id);
                if let Some(email) = &user.email {
                    println!("  Email:    {}", email);
                }
                if let Some(semester) = user.assigned_semester() {
                    println!("  Semester: {}", semester);
                }
            }
            if let Some(token) = &session.token {
                println!("  Token:    {}", abbreviate(token));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
    }
    Ok(())
}

fn abbreviate(token: &str) -> String {
    match token.char_indices().nth(16) {
        Some((idx, _)) => format!("{}…", &token[..idx]),
        None => token.to_string(),
    }
}
