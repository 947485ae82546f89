// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use humantime_serde::re::humantime::format_duration;
use tollgate_config::{FromConfig, SecretValue, TollgateConfig};
use tollgate_core::{token::RECOMMENDED_SECRET_LEN, AuthService};
use tracing::info;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Non-fatal findings about an otherwise valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Human-readable warnings.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Inspects a configuration that already passed validation.
    pub fn inspect(config: &TollgateConfig) -> Self {
        let mut warnings = Vec::new();

        if let Some(secret) = &config.token.secret {
            if secret.expose().len() < RECOMMENDED_SECRET_LEN {
                warnings.push(format!(
                    "token.secret is {} bytes; at least {} are recommended",
                    secret.expose().len(),
                    RECOMMENDED_SECRET_LEN
                ));
            }
        }

        if !config.token.leeway.is_zero() {
            warnings.push(format!(
                "token.leeway accepts tokens up to {} past expiry",
                format_duration(config.token.leeway)
            ));
        }

        if config.hashing.memory_kib < tollgate_config::schema::DEFAULT_MEMORY_KIB {
            warnings.push(format!(
                "hashing.memory_kib ({}) is below the recommended {}",
                config.hashing.memory_kib,
                tollgate_config::schema::DEFAULT_MEMORY_KIB
            ));
        }

        Self { warnings }
    }

    /// Returns `true` when there is nothing to report.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: &ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    if !config_path.exists() {
        return Err(BinError::config(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let config = tollgate_config::load_config(config_path)
        .map_err(|e| BinError::from(e).with_context("Configuration validation failed"))?;

    // Hashing parameters and token settings are only fully checked by the
    // primitives themselves.
    AuthService::from_config(&config)
        .map_err(|e| BinError::from(e).with_context("Configuration rejected by auth service"))?;

    let report = ValidationReport::inspect(&config);
    info!(
        path = %config_path.display(),
        warnings = report.warnings.len(),
        "Configuration validated"
    );

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  Issuer:           {}", config.token.issuer);
            println!("  Algorithm:        {:?}", config.token.algorithm);
            println!("  Token validity:   {}", format_duration(config.token.validity));
            println!("  Revocation TTL:   {}", format_duration(config.revocation_ttl()));
            println!(
                "  Argon2id:         m={} KiB, t={}, p={}",
                config.hashing.memory_kib, config.hashing.iterations, config.hashing.parallelism
            );

            if !report.is_clean() {
                println!();
                println!("Warnings:");
                for warning in &report.warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!("{}", redacted_json(&config)?);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "issuer": config.token.issuer,
                    "algorithm": config.token.algorithm,
                    "validity_secs": config.token.validity.as_secs(),
                    "revocation_ttl_secs": config.revocation_ttl().as_secs(),
                },
                "warnings": report.warnings,
                "config": if args.show_config { Some(redacted(&config)) } else { None },
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).map_err(anyhow::Error::from)?
            );
        }
    }

    if args.strict && !report.is_clean() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            report.warnings.len()
        )));
    }

    Ok(())
}

fn redacted(config: &TollgateConfig) -> TollgateConfig {
    let mut shown = config.clone();
    if shown.token.secret.is_some() {
        shown.token.secret = Some(SecretValue::new("***"));
    }
    shown
}

fn redacted_json(config: &TollgateConfig) -> BinResult<String> {
    Ok(serde_json::to_string_pretty(&redacted(config)).map_err(anyhow::Error::from)?)
}
