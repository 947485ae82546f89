// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `hash-password` command.

use tollgate_config::HashingSettings;
use tollgate_core::{CredentialStore, HashingParams};
use tracing::debug;

use super::value_or_stdin;
use crate::cli::{Cli, HashPasswordArgs, OutputFormat};
use crate::error::BinResult;

/// Executes the `hash-password` command.
pub fn hash_password(_cli: &Cli, args: &HashPasswordArgs) -> BinResult<()> {
    let password = value_or_stdin(args.password.as_deref(), args.stdin)?;
    let params = hashing_params(args)?;
    debug!(
        memory_kib = params.memory_kib,
        iterations = params.iterations,
        parallelism = params.parallelism,
        "Hashing password"
    );

    let store = CredentialStore::new(params)?;
    let salt = store.generate_salt();
    let digest = store.hash(&password, &salt)?;

    match args.format {
        OutputFormat::Text => {
            println!("salt:   {}", salt.as_str());
            println!("digest: {}", digest.as_str());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "salt": salt.as_str(),
                "digest": digest.as_str(),
                "params": {
                    "memory_kib": params.memory_kib,
                    "iterations": params.iterations,
                    "parallelism": params.parallelism,
                },
            });
            println!("{}", serde_json::to_string_pretty(&output).map_err(anyhow::Error::from)?);
        }
    }

    Ok(())
}

/// Resolves hashing parameters from the flags, falling back to the
/// configuration defaults, and validates them with the same range checks as a
/// config file.
pub fn hashing_params(args: &HashPasswordArgs) -> BinResult<HashingParams> {
    let defaults = HashingSettings::default();
    let settings = HashingSettings {
        memory_kib: args.memory_kib.unwrap_or(defaults.memory_kib),
        iterations: args.iterations.unwrap_or(defaults.iterations),
        parallelism: args.parallelism.unwrap_or(defaults.parallelism),
    };
    settings.validate()?;

    Ok(HashingParams::new(
        settings.memory_kib,
        settings.iterations,
        settings.parallelism,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = hashing_params(&HashPasswordArgs::default()).unwrap();
        let defaults = HashingSettings::default();
        assert_eq!(params.memory_kib, defaults.memory_kib);
        assert_eq!(params.iterations, defaults.iterations);
    }

    #[test]
    fn test_params_out_of_range() {
        let args = HashPasswordArgs {
            parallelism: Some(0),
            ..HashPasswordArgs::default()
        };
        assert_eq!(hashing_params(&args).unwrap_err().exit_code(), 1);
    }

    #[test]
    fn test_hashed_output_verifies() {
        let args = HashPasswordArgs {
            memory_kib: Some(8),
            iterations: Some(1),
            ..HashPasswordArgs::default()
        };
        let store = CredentialStore::new(hashing_params(&args).unwrap()).unwrap();
        let salt = store.generate_salt();
        let digest = store.hash("pw1", &salt).unwrap();

        assert!(digest.as_str().starts_with("$argon2id$"));
        assert!(store.verify("pw1", &salt, &digest));
        assert!(!store.verify("pw2", &salt, &digest));
    }
}
