//! Configuration management for commitgpt
//!
//! Settings come from an optional TOML file; every field has a default.
//! The API key is never stored in the file. It is read from the environment
//! variable named by `api_key_env` and carried around as an [`ApiKey`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const DEFAULT_FALLBACK_SUMMARY: &str = "Unable to generate summary";

/// What to do when no summary can be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryErrorPolicy {
    /// Commit with `fallback_summary` instead
    #[default]
    Fallback,
    /// Stop without committing
    Abort,
}

/// How the classified commit type is applied to the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PrefixMode {
    /// Prepend the type unless the summary already has a conventional prefix
    #[default]
    Auto,
    /// Always prepend the classified type
    Always,
    /// Use the summary as-is
    Never,
}

/// Configuration file structure
///
/// # Example TOML
///
/// ```toml
/// model = "claude-3-5-sonnet-latest"
/// max_tokens = 4096
/// timeout_secs = 60
/// on_summary_error = "abort"
/// prefix = "auto"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Model identifier sent with every request
    pub model: String,
    /// Maximum number of output tokens
    pub max_tokens: u32,
    /// Messages API endpoint
    pub endpoint: String,
    /// Value of the `anthropic-version` header
    pub api_version: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Retry once on connect failures and timeouts
    pub retry_transient: bool,
    /// Maximum size of the prompt in bytes
    pub max_prompt_size: usize,
    pub on_summary_error: SummaryErrorPolicy,
    pub prefix: PrefixMode,
    /// Summary used when the API cannot provide one
    pub fallback_summary: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: 60,
            retry_transient: true,
            max_prompt_size: crate::prompt::DEFAULT_MAX_PROMPT_SIZE,
            on_summary_error: SummaryErrorPolicy::default(),
            prefix: PrefixMode::default(),
            fallback_summary: DEFAULT_FALLBACK_SUMMARY.to_string(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check value ranges that serde cannot express
    ///
    /// # Errors
    ///
    /// * `max_tokens`, `timeout_secs` or `max_prompt_size` is zero
    /// * `model`, `endpoint`, `api_key_env` or `fallback_summary` is blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid("'max_tokens' must be greater than 0".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("'timeout_secs' must be greater than 0".into()));
        }
        if self.max_prompt_size == 0 {
            return Err(ConfigError::Invalid(
                "'max_prompt_size' must be greater than 0".into(),
            ));
        }

        let required = [
            ("model", &self.model),
            ("endpoint", &self.endpoint),
            ("api_key_env", &self.api_key_env),
            ("fallback_summary", &self.fallback_summary),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "'{name}' cannot be empty or whitespace-only"
                )));
            }
        }

        Ok(())
    }
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// * File does not exist
/// * Invalid TOML format or unknown fields
/// * Values fail [`Config::validate`]
///
/// # Example
///
/// ```no_run
/// use commitgpt::config::load_config;
///
/// # fn main() -> anyhow::Result<()> {
/// let config = load_config("commitgpt.toml")?;
/// println!("Model: {}", config.model);
/// # Ok(())
/// # }
/// ```
pub fn load_config(config_path: &str) -> Result<Config> {
    let content = fs::read_to_string(config_path)
        .context(format!("Failed to read config file: {}", config_path))?;
    let config: Config = toml::from_str(&content).context("Failed to parse config file as TOML")?;

    config
        .validate()
        .context(format!("Configuration error in {}", config_path))?;

    Ok(config)
}

/// Credential for the Messages API
///
/// `Debug` output is redacted so the key cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Read the key from the environment variable `var`
    ///
    /// # Errors
    ///
    /// * [`ConfigError::MissingApiKey`] if the variable is unset, not
    ///   unicode, or blank
    pub fn from_env(var: &str) -> Result<Self, ConfigError> {
        Self::from_value(var, std::env::var(var).ok())
    }

    fn from_value(var: &str, value: Option<String>) -> Result<Self, ConfigError> {
        match value {
            Some(key) if !key.trim().is_empty() => Ok(Self(key.trim().to_string())),
            _ => Err(ConfigError::MissingApiKey(var.to_string())),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
