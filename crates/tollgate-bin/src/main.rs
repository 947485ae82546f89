// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Tollgate command-line entry point.

use tollgate_bin::{commands, error::report_error_and_exit, logging, Cli};

fn main() {
    let cli = Cli::parse_args();

    let configured = logging::configured_logging(&cli.config);
    logging::init_logging(
        cli.effective_log_level(configured.as_ref().map(|l| l.level.as_str())),
        cli.effective_log_format(configured.as_ref().map(|l| l.format)),
    );

    if let Err(e) = commands::execute(&cli) {
        report_error_and_exit(e);
    }
}
