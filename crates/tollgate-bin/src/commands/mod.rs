// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.

mod demo;
mod gen_secret;
mod hash_password;
mod validate;
mod version;

pub use demo::{demo, run_scenario};
pub use gen_secret::{encode_secret, gen_secret, generate_secret};
pub use hash_password::{hash_password, hashing_params};
pub use validate::{validate, ValidationReport};
pub use version::version;

use std::io::{self, Read};

use crate::cli::{Cli, Commands};
use crate::error::{BinError, BinResult};

/// Executes the appropriate command based on CLI arguments.
pub fn execute(cli: &Cli) -> BinResult<()> {
    match &cli.command {
        Commands::Validate(args) => validate::validate(cli, args),
        Commands::Version => version::version(cli),
        Commands::GenSecret(args) => gen_secret::gen_secret(cli, args),
        Commands::HashPassword(args) => hash_password::hash_password(cli, args),
        Commands::Demo(args) => demo::demo(cli, args),
    }
}

/// Returns `value`, or a trimmed line read from stdin when `stdin` is set.
pub(crate) fn value_or_stdin(value: Option<&str>, stdin: bool) -> BinResult<String> {
    if stdin {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| BinError::io(format!("Failed to read from stdin: {}", e)))?;
        return Ok(input.trim_end_matches(['\r', '\n']).to_string());
    }
    value
        .map(str::to_string)
        .ok_or_else(|| BinError::config("No value provided. Use --stdin or provide a value"))
}
