// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Entry point of the `portal` command.

use portal_bin::error::report_error_and_exit;
use portal_bin::{commands, init_logging, Cli, LoadedConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let config = LoadedConfig::load(&cli.config);
    let logging = config.logging();
    init_logging(
        cli.effective_log_level(logging.level.as_str()),
        cli.effective_log_format(logging.format),
    );

    if let Err(e) = commands::execute(cli, config).await {
        report_error_and_exit(e);
    }
}
