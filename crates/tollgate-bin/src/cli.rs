// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! Subcommands:
//!
//! - `validate`: Validate a configuration file
//! - `version`: Show version information
//! - `gen-secret`: Generate a token signing secret
//! - `hash-password`: Hash a password with the configured Argon2id parameters
//! - `demo`: Run a login/role/logout walkthrough against a live service

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Tollgate - in-process authentication and role authorization
#[derive(Parser, Debug)]
#[command(
    name = "tollgate",
    author = "Sylvex <contact@sylvex.io>",
    version = tollgate_core::VERSION,
    about = "Users, roles and revocable session tokens",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "tollgate.yaml",
        env = "TOLLGATE_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, env = "TOLLGATE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact); overrides the config file
    #[arg(long, env = "TOLLGATE_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the Tollgate CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate the configuration file
    ///
    /// Parses, applies environment overrides and validates the configuration,
    /// then builds a service from it to make sure the token settings are usable.
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,

    /// Generate a token signing secret
    ///
    /// Produces cryptographically random bytes suitable for `token.secret`.
    #[command(name = "gen-secret")]
    GenSecret(GenSecretArgs),

    /// Hash a password
    ///
    /// Prints a fresh salt and the Argon2id PHC digest for the given password.
    #[command(name = "hash-password")]
    HashPassword(HashPasswordArgs),

    /// Run the demo walkthrough
    ///
    /// Registers users, assigns a role, logs in, checks roles and logs out,
    /// printing every step.
    Demo(DemoArgs),
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation (secret redacted)
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `gen-secret` command.
#[derive(Args, Debug, Clone)]
pub struct GenSecretArgs {
    /// Number of random bytes
    #[arg(short, long, default_value_t = 32)]
    pub bytes: usize,

    /// Output encoding
    #[arg(short, long, default_value = "base64")]
    pub format: SecretFormat,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `hash-password` command.
#[derive(Args, Debug, Clone, Default)]
pub struct HashPasswordArgs {
    /// Password to hash
    #[arg(required_unless_present = "stdin")]
    pub password: Option<String>,

    /// Read the password from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Memory cost in KiB
    #[arg(long)]
    pub memory_kib: Option<u32>,

    /// Number of passes
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Degree of parallelism
    #[arg(long)]
    pub parallelism: Option<u32>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `demo` command.
#[derive(Args, Debug, Clone, Default)]
pub struct DemoArgs {
    /// Build the service from the configuration file instead of an
    /// ephemeral secret with minimal hashing cost
    #[arg(long)]
    pub use_config: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<tollgate_config::LogFormat> for LogFormat {
    fn from(format: tollgate_config::LogFormat) -> Self {
        match format {
            tollgate_config::LogFormat::Text => LogFormat::Text,
            tollgate_config::LogFormat::Json => LogFormat::Json,
            tollgate_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

/// Secret output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SecretFormat {
    /// Base64 encoded
    #[default]
    Base64,
    /// Hexadecimal encoded
    Hex,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Check if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Get the effective log level: flags first, then `--log-level`, then the
    /// configured level, then `info`.
    pub fn effective_log_level<'a>(&'a self, configured: Option<&'a str>) -> &'a str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().or(configured).unwrap_or("info")
        }
    }

    /// Get the effective log format, preferring `--log-format`.
    pub fn effective_log_format(
        &self,
        configured: Option<tollgate_config::LogFormat>,
    ) -> LogFormat {
        self.log_format
            .or_else(|| configured.map(LogFormat::from))
            .unwrap_or_default()
    }
}

impl Default for GenSecretArgs {
    fn default() -> Self {
        Self {
            bytes: 32,
            format: SecretFormat::Base64,
            output: None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["tollgate", "validate", "--show-config"]);
        if let Commands::Validate(args) = cli.command {
            assert!(args.show_config);
            assert_eq!(args.format, OutputFormat::Text);
        } else {
            panic!("Expected Validate command");
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["tollgate"]).is_err());
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["tollgate", "-c", "/etc/tollgate/config.yaml", "version"]);
        assert_eq!(cli.config, PathBuf::from("/etc/tollgate/config.yaml"));
    }

    #[test]
    fn test_log_level_precedence() {
        let cli = Cli::parse_from(["tollgate", "-l", "trace", "version"]);
        assert_eq!(cli.effective_log_level(Some("error")), "trace");

        let cli = Cli::parse_from(["tollgate", "version"]);
        assert_eq!(cli.effective_log_level(Some("error")), "error");
        assert_eq!(cli.effective_log_level(None), "info");
    }

    #[test]
    fn test_quiet_mode() {
        let cli = Cli::parse_from(["tollgate", "-q", "-l", "trace", "version"]);
        assert!(cli.quiet);
        assert!(!cli.is_verbose());
        assert_eq!(cli.effective_log_level(None), "warn");
    }

    #[test]
    fn test_verbose_mode() {
        let cli = Cli::parse_from(["tollgate", "-v", "version"]);
        assert!(cli.is_verbose());
        assert_eq!(cli.effective_log_level(None), "debug");
    }

    #[test]
    fn test_log_format_precedence() {
        let cli = Cli::parse_from(["tollgate", "version"]);
        assert_eq!(cli.effective_log_format(None), LogFormat::Text);
        assert_eq!(
            cli.effective_log_format(Some(tollgate_config::LogFormat::Json)),
            LogFormat::Json
        );

        let cli = Cli::parse_from(["tollgate", "--log-format", "compact", "version"]);
        assert_eq!(
            cli.effective_log_format(Some(tollgate_config::LogFormat::Json)),
            LogFormat::Compact
        );
    }

    #[test]
    fn test_gen_secret_command() {
        let cli = Cli::parse_from(["tollgate", "gen-secret", "-f", "hex", "-b", "48"]);
        if let Commands::GenSecret(args) = cli.command {
            assert_eq!(args.format, SecretFormat::Hex);
            assert_eq!(args.bytes, 48);
        } else {
            panic!("Expected GenSecret command");
        }
    }

    #[test]
    fn test_hash_password_command() {
        let cli = Cli::parse_from(["tollgate", "hash-password", "pw1", "--iterations", "3"]);
        if let Commands::HashPassword(args) = cli.command {
            assert_eq!(args.password.as_deref(), Some("pw1"));
            assert_eq!(args.iterations, Some(3));
            assert_eq!(args.memory_kib, None);
        } else {
            panic!("Expected HashPassword command");
        }
    }

    #[test]
    fn test_hash_password_requires_input() {
        assert!(Cli::try_parse_from(["tollgate", "hash-password"]).is_err());
        assert!(Cli::try_parse_from(["tollgate", "hash-password", "--stdin"]).is_ok());
    }

    #[test]
    fn test_demo_command() {
        let cli = Cli::parse_from(["tollgate", "demo", "--use-config"]);
        assert!(matches!(cli.command, Commands::Demo(DemoArgs { use_config: true })));
    }
}
