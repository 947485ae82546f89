// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading for Tollgate.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and resolve `${VAR}` / `${VAR:default}` placeholders
//! 2. Parse YAML, TOML or JSON depending on the extension
//! 3. Apply `TOLLGATE_*` environment overrides
//! 4. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! TOLLGATE_TOKEN_SECRET=...
//! TOLLGATE_TOKEN_ISSUER=my-service
//! TOLLGATE_TOKEN_VALIDITY=30m
//! TOLLGATE_TOKEN_LEEWAY=5s
//! TOLLGATE_TOKEN_ALGORITHM=HS512
//! TOLLGATE_HASHING_MEMORY_KIB=65536
//! TOLLGATE_HASHING_ITERATIONS=3
//! TOLLGATE_HASHING_PARALLELISM=2
//! TOLLGATE_REVOCATION_TTL=1h
//! TOLLGATE_REVOCATION_PURGE_INTERVAL=30s
//! TOLLGATE_LOG_LEVEL=debug
//! TOLLGATE_LOG_FORMAT=json
//! ```

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{LogFormat, LogLevel, SecretValue, TokenAlgorithm, TollgateConfig};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "TOLLGATE";

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader for Tollgate.
///
/// # Examples
///
/// ```no_run
/// use tollgate_config::loader::ConfigLoader;
///
/// let loader = ConfigLoader::new();
/// let config = loader.load("tollgate.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve placeholders and apply environment overrides.
    resolve_env_vars: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            resolve_env_vars: true,
        }
    }

    /// Creates a builder for configuring the loader.
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder::new()
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Loads configuration from a file.
    ///
    /// The file format is determined by the file extension:
    /// - `.yaml` or `.yml` - YAML format
    /// - `.toml` - TOML format
    /// - `.json` - JSON format
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<TollgateConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;
        let mut config = self.parse_content(&content, format, path)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!(
            issuer = %config.token.issuer,
            validity = ?config.token.validity,
            algorithm = ?config.token.algorithm,
            "Token settings"
        );

        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<TollgateConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            content.to_string()
        };

        let mut config = parse_str(&content, format)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate()?;

        Ok(config)
    }

    /// Builds a configuration from defaults and environment overrides only.
    pub fn load_from_env(&self) -> ConfigResult<TollgateConfig> {
        let mut config = TollgateConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    fn parse_content(
        &self,
        content: &str,
        format: ConfigFormat,
        path: &Path,
    ) -> ConfigResult<TollgateConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            content.to_string()
        };

        parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })
    }

    /// Resolves environment variable placeholders in content.
    ///
    /// Supports the format: `${VAR_NAME}` or `${VAR_NAME:default}`
    fn resolve_env_placeholders(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' || chars.peek() != Some(&'{') {
                result.push(c);
                continue;
            }
            chars.next();

            let mut var_content = String::new();
            let mut found_close = false;
            for c in chars.by_ref() {
                if c == '}' {
                    found_close = true;
                    break;
                }
                var_content.push(c);
            }

            if !found_close {
                result.push_str("${");
                result.push_str(&var_content);
                continue;
            }

            let (var_name, default_value) = match var_content.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (var_content.as_str(), None),
            };

            match (env::var(var_name), default_value) {
                (Ok(value), _) => result.push_str(&value),
                (Err(_), Some(default)) => result.push_str(default),
                (Err(_), None) => {
                    warn!("Environment variable '{}' not found", var_name);
                    result.push_str(&format!("${{{}}}", var_name));
                }
            }
        }

        result
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&self, config: &mut TollgateConfig) -> ConfigResult<()> {
        // Token
        if let Some(value) = self.env("TOKEN_SECRET") {
            config.token.secret = Some(SecretValue::new(value));
        }
        if let Some(value) = self.env("TOKEN_ISSUER") {
            config.token.issuer = value;
        }
        if let Some(value) = self.env_duration("TOKEN_VALIDITY")? {
            config.token.validity = value;
        }
        if let Some(value) = self.env_duration("TOKEN_LEEWAY")? {
            config.token.leeway = value;
        }
        if let Some(value) = self.env("TOKEN_ALGORITHM") {
            config.token.algorithm = TokenAlgorithm::parse(&value).ok_or_else(|| {
                ConfigError::invalid_env_var(self.var_name("TOKEN_ALGORITHM"), "expected HS256, HS384 or HS512")
            })?;
        }

        // Hashing
        if let Some(value) = self.env_parsed("HASHING_MEMORY_KIB")? {
            config.hashing.memory_kib = value;
        }
        if let Some(value) = self.env_parsed("HASHING_ITERATIONS")? {
            config.hashing.iterations = value;
        }
        if let Some(value) = self.env_parsed("HASHING_PARALLELISM")? {
            config.hashing.parallelism = value;
        }

        // Revocation
        if let Some(value) = self.env_duration("REVOCATION_TTL")? {
            config.revocation.ttl = Some(value);
        }
        if let Some(value) = self.env_duration("REVOCATION_PURGE_INTERVAL")? {
            config.revocation.purge_interval = value;
        }

        // Logging
        if let Some(value) = self.env("LOG_LEVEL") {
            match LogLevel::parse(&value) {
                Some(level) => config.logging.level = level,
                None => warn!("Ignoring unknown log level '{}'", value),
            }
        }
        if let Some(value) = self.env("LOG_FORMAT") {
            match LogFormat::parse(&value) {
                Some(format) => config.logging.format = format,
                None => warn!("Ignoring unknown log format '{}'", value),
            }
        }

        Ok(())
    }

    fn var_name(&self, key: &str) -> String {
        format!("{}_{}", self.env_prefix, key)
    }

    fn env(&self, key: &str) -> Option<String> {
        env::var(self.var_name(key)).ok()
    }

    fn env_parsed<T: FromStr>(&self, key: &str) -> ConfigResult<Option<T>> {
        self.env(key)
            .map(|value| {
                value.trim().parse().map_err(|_| {
                    ConfigError::invalid_env_var(self.var_name(key), "expected valid number")
                })
            })
            .transpose()
    }

    fn env_duration(&self, key: &str) -> ConfigResult<Option<Duration>> {
        self.env(key)
            .map(|value| {
                humantime_serde::re::humantime::parse_duration(value.trim()).map_err(|e| {
                    ConfigError::invalid_env_var(self.var_name(key), format!("expected duration: {}", e))
                })
            })
            .transpose()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigLoaderBuilder
// =============================================================================

/// Builder for ConfigLoader.
#[derive(Debug, Default)]
pub struct ConfigLoaderBuilder {
    env_prefix: Option<String>,
    resolve_env_vars: Option<bool>,
}

impl ConfigLoaderBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the environment prefix.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn resolve_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = Some(enabled);
        self
    }

    /// Builds the ConfigLoader.
    pub fn build(self) -> ConfigLoader {
        let mut loader = ConfigLoader::new();
        if let Some(prefix) = self.env_prefix {
            loader.env_prefix = prefix;
        }
        if let Some(resolve_env_vars) = self.resolve_env_vars {
            loader.resolve_env_vars = resolve_env_vars;
        }
        loader
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<TollgateConfig> {
    match format {
        ConfigFormat::Yaml => yaml_parse(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// YAML parsing goes through the `config` crate.
fn yaml_parse<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
///
/// # Examples
///
/// ```no_run
/// use tollgate_config::loader::load_config;
///
/// let config = load_config("tollgate.yaml").unwrap();
/// ```
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<TollgateConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<TollgateConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML: &str = r#"
token:
  secret: VeKcPGNcxYOCVRUDnzoEzwhtYGQddlRu
  issuer: test-issuer
  validity: 30m
  leeway: 5s
  algorithm: HS384

hashing:
  memory_kib: 4096
  iterations: 1
  parallelism: 1

revocation:
  purge_interval: 10s

logging:
  level: debug
  format: json
"#;

    fn no_env() -> ConfigLoader {
        ConfigLoader::new().with_env_vars(false)
    }

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let config = no_env().load(file.path()).unwrap();

        assert_eq!(config.token.secret.as_ref().unwrap().expose(), "VeKcPGNcxYOCVRUDnzoEzwhtYGQddlRu");
        assert_eq!(config.token.issuer, "test-issuer");
        assert_eq!(config.token.validity, Duration::from_secs(1800));
        assert_eq!(config.token.leeway, Duration::from_secs(5));
        assert_eq!(config.token.algorithm, TokenAlgorithm::HS384);
        assert_eq!(config.hashing.memory_kib, 4096);
        assert_eq!(config.revocation.purge_interval, Duration::from_secs(10));
        assert_eq!(config.revocation_ttl(), Duration::from_secs(1805));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_toml() {
        let toml = r#"
[token]
secret = "VeKcPGNcxYOCVRUDnzoEzwhtYGQddlRu"
validity = "1h"

[revocation]
ttl = "90m"
"#;
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let config = no_env().load(file.path()).unwrap();
        assert_eq!(config.token.validity, Duration::from_secs(3600));
        assert_eq!(config.revocation_ttl(), Duration::from_secs(5400));
        assert_eq!(config.token.issuer, "tollgate");
    }

    #[test]
    fn test_load_json() {
        let json = r#"{ "token": { "secret": "VeKcPGNcxYOCVRUDnzoEzwhtYGQddlRu", "algorithm": "HS512" } }"#;
        let config = no_env().load_from_str(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.token.algorithm, TokenAlgorithm::HS512);
        assert_eq!(config.token.validity, Duration::from_secs(7200));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{ "token": { "secret": "x", "audience": "nope" } }"#;
        assert!(matches!(
            no_env().load_from_str(json, ConfigFormat::Json),
            Err(ConfigError::Serialization { .. })
        ));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(b"[token\nsecret = ").unwrap();

        let result = no_env().load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let json = r#"{ "token": { "issuer": "x" } }"#;
        assert!(matches!(
            no_env().load_from_str(json, ConfigFormat::Json),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("tollgate.yaml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("tollgate.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("tollgate.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("tollgate.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("tollgate.txt")).is_err());
        assert!(ConfigFormat::from_path(Path::new("tollgate")).is_err());
    }

    #[test]
    fn test_env_placeholder_with_default() {
        let loader = ConfigLoader::new();
        let result = loader.resolve_env_placeholders("secret: ${TOLLGATE_TEST_NONEXISTENT_VAR:fallback}");
        assert_eq!(result, "secret: fallback");
    }

    #[test]
    fn test_env_placeholder_resolution() {
        env::set_var("TOLLGATE_TEST_PLACEHOLDER_SECRET", "from-env");
        let loader = ConfigLoader::new();
        let result = loader.resolve_env_placeholders("secret: ${TOLLGATE_TEST_PLACEHOLDER_SECRET}");
        assert_eq!(result, "secret: from-env");
    }

    #[test]
    fn test_env_placeholder_unresolved_kept() {
        let loader = ConfigLoader::new();
        assert_eq!(
            loader.resolve_env_placeholders("a: ${TOLLGATE_TEST_MISSING_VAR}"),
            "a: ${TOLLGATE_TEST_MISSING_VAR}"
        );
        assert_eq!(loader.resolve_env_placeholders("a: ${unclosed"), "a: ${unclosed");
        assert_eq!(loader.resolve_env_placeholders("cost: $5"), "cost: $5");
    }

    #[test]
    fn test_env_overrides() {
        let prefix = "TOLLGATE_TEST_OVERRIDES";
        env::set_var(format!("{}_TOKEN_SECRET", prefix), "override-secret-override-secret!!");
        env::set_var(format!("{}_TOKEN_VALIDITY", prefix), "15m");
        env::set_var(format!("{}_TOKEN_ALGORITHM", prefix), "hs512");
        env::set_var(format!("{}_HASHING_ITERATIONS", prefix), "3");
        env::set_var(format!("{}_LOG_LEVEL", prefix), "warn");

        let config = ConfigLoader::new()
            .with_env_prefix(prefix)
            .load_from_str(YAML, ConfigFormat::Yaml)
            .unwrap();

        assert_eq!(
            config.token.secret.as_ref().unwrap().expose(),
            "override-secret-override-secret!!"
        );
        assert_eq!(config.token.validity, Duration::from_secs(900));
        assert_eq!(config.token.algorithm, TokenAlgorithm::HS512);
        assert_eq!(config.hashing.iterations, 3);
        assert_eq!(config.logging.level, LogLevel::Warn);
        // Untouched values survive.
        assert_eq!(config.token.issuer, "test-issuer");
    }

    #[test]
    fn test_invalid_env_override() {
        let prefix = "TOLLGATE_TEST_INVALID";
        env::set_var(format!("{}_HASHING_MEMORY_KIB", prefix), "lots");

        let result = ConfigLoader::new()
            .with_env_prefix(prefix)
            .load_from_str(YAML, ConfigFormat::Yaml);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
    }

    #[test]
    fn test_load_from_env() {
        let prefix = "TOLLGATE_TEST_ENV_ONLY";
        env::set_var(format!("{}_TOKEN_SECRET", prefix), "VeKcPGNcxYOCVRUDnzoEzwhtYGQddlRu");
        env::set_var(format!("{}_REVOCATION_PURGE_INTERVAL", prefix), "5s");

        let config = ConfigLoader::new().with_env_prefix(prefix).load_from_env().unwrap();
        assert_eq!(config.revocation.purge_interval, Duration::from_secs(5));
        assert_eq!(config.token.validity, Duration::from_secs(7200));
    }

    #[test]
    fn test_loader_builder() {
        let loader = ConfigLoader::builder()
            .env_prefix("MYAPP")
            .resolve_env_vars(false)
            .build();

        assert_eq!(loader.env_prefix, "MYAPP");
        assert!(!loader.resolve_env_vars);
    }

    #[test]
    fn test_file_not_found() {
        let result = ConfigLoader::new().load("/nonexistent/path/tollgate.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }
}
