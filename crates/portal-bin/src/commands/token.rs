// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `token` command.

use portal_core::Session;
use portal_expiry::{Clock, SystemClock, TokenClaims};

use super::LoadedConfig;
use crate::cli::{OutputFormat, TokenArgs};
use crate::error::{BinError, BinResult};

/// Executes the `token` command: decodes a token's claims.
///
/// The signature is not verified.
pub fn token(loaded: &LoadedConfig, args: TokenArgs) -> BinResult<()> {
    let token = match args.token {
        Some(token) => token,
        None => {
            let store = loaded.config()?.open_store()?;
            Session::read(store.as_ref())
                .token
                .ok_or_else(|| BinError::input("no token given and no stored session"))?
        }
    };

    let claims = TokenClaims::decode(&token)?;
    let now = SystemClock.now_unix();
    let remaining = claims.seconds_remaining(now);

    match args.format {
        OutputFormat::Text => {
            match claims.expiration() {
                Some(exp) => println!("Expires:   {}", exp.to_rfc3339()),
                None => println!("Expires:   never (no exp claim)"),
            }
            if let Some(iat) = claims.issued_at() {
                println!("Issued:    {}", iat.to_rfc3339());
            }
            if let Some(sub) = &claims.sub {
                println!("Subject:   {}", sub);
            }
            if let Some(role) = &claims.role {
                println!("Role:      {}", role);
            }
            println!("Remaining: {}", describe_remaining(remaining));
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "claims": claims,
                "remaining_secs": remaining,
                "expired": remaining.is_some_and(|r| r <= 0),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn describe_remaining(remaining: Option<i64>) -> String {
    match remaining {
        None => "unknown".to_string(),
        Some(secs) if secs <= 0 => format!("expired {}s ago", secs.unsigned_abs()),
        Some(secs) => format!("{}s", secs),
    }
}
