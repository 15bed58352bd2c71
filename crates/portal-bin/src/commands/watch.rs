// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `watch` command.

use std::sync::Arc;

use tracing::info;

use portal_core::{HistoryNavigator, Navigator, SessionContext};
use portal_expiry::{ExpiryMonitor, MonitorState};

use super::{describe_session, LoadedConfig};
use crate::cli::WatchArgs;
use crate::error::BinResult;
use crate::shutdown::ShutdownCoordinator;

/// Executes the `watch` command.
///
/// Mounts the expiry monitor on `--path` and prints each state change until
/// the session expires, the monitor goes idle, or a shutdown signal arrives.
pub async fn watch(loaded: &LoadedConfig, args: WatchArgs) -> BinResult<()> {
    let config = loaded.config()?;
    let ctx = SessionContext::new(config.open_store()?);
    let history = Arc::new(HistoryNavigator::new(args.path.as_str()));

    println!(
        "Watching {} as {}",
        args.path,
        describe_session(&ctx.snapshot())
    );

    let monitor =
        ExpiryMonitor::new(ctx, history.clone()).with_config(config.monitor_config());
    let handle = monitor.mount(&args.path);
    let mut state = handle.subscribe();

    let initial = *state.borrow_and_update();
    println!("{}", describe_state(initial));
    if !handle.is_active() {
        if initial.is_expired() {
            println!("Redirected to {}", history.current());
        }
        return Ok(());
    }

    let shutdown = ShutdownCoordinator::new();
    let stop = shutdown.wait_for_shutdown();
    tokio::pin!(stop);

    loop {
        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *state.borrow_and_update();
                println!("{}", describe_state(current));
                match current {
                    MonitorState::Expired => {
                        println!("Redirected to {}", history.current());
                        break;
                    }
                    MonitorState::Idle => break,
                    _ => {}
                }
            }
            result = &mut stop => {
                result?;
                info!(path = %args.path, "Watch interrupted");
                println!("Stopped; session left untouched");
                break;
            }
        }
    }

    handle.cancel();
    Ok(())
}

pub(crate) fn describe_state(state: MonitorState) -> String {
    match state {
        MonitorState::Idle => "Idle: nothing to watch".to_string(),
        MonitorState::Armed { expires_at } => {
            let at = chrono::DateTime::from_timestamp(expires_at, 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| expires_at.to_string());
            format!("Armed: token expires at {}", at)
        }
        MonitorState::Warning { remaining_secs } => {
            format!("Warning: session expires in {}s", remaining_secs)
        }
        MonitorState::Expired => "Expired: session cleared".to_string(),
    }
}
