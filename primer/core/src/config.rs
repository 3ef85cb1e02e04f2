//! TOML Configuration File Support
//!
//! Centralized configuration loading, supporting a TOML configuration file at
//! `~/.config/primer/primer.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [github]
//! api_base_url = "https://api.github.com"
//! timeout_secs = 30
//! user_agent = "primer"
//!
//! [delay]
//! max_delay_secs = 10.0
//! tasks = 5
//!
//! [generator]
//! count = 10
//! interval_ms = 1000
//! scale = 10.0
//! ```
//!
//! # Environment Variables
//!
//! - `PRIMER_GITHUB_API`: GitHub API base URL
//! - `PRIMER_HTTP_TIMEOUT`: HTTP timeout in seconds
//! - `PRIMER_USER_AGENT`: HTTP user agent
//! - `PRIMER_MAX_DELAY`: Upper bound for random delays, in seconds
//! - `PRIMER_TASKS`: Number of concurrent delay tasks

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::delay::{DEFAULT_MAX_DELAY, MAX_DELAY_LIMIT};
use crate::generator::GeneratorConfig;

/// Default GitHub REST API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// GitHub section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubToml {
    /// API base URL
    pub api_base_url: Option<String>,

    /// HTTP timeout in seconds
    pub timeout_secs: Option<u64>,

    /// HTTP user agent
    pub user_agent: Option<String>,
}

/// Delay section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayToml {
    /// Upper bound for a single random delay, in seconds
    pub max_delay_secs: Option<f64>,

    /// Number of concurrent delay tasks
    pub tasks: Option<usize>,
}

/// Generator section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorToml {
    /// Values per stream
    pub count: Option<usize>,

    /// Pause before each value, in milliseconds
    pub interval_ms: Option<u64>,

    /// Values are drawn from `[0, scale)`
    pub scale: Option<f64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimerToml {
    /// GitHub configuration section
    pub github: GithubToml,

    /// Delay configuration section
    pub delay: DelayToml,

    /// Generator configuration section
    pub generator: GeneratorToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// GitHub client settings
#[derive(Clone, Debug, PartialEq)]
pub struct GithubConfig {
    /// API base URL, without trailing slash
    pub api_base_url: String,
    /// HTTP request timeout
    pub timeout: Duration,
    /// HTTP user agent (GitHub rejects requests without one)
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("primer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Fan-out delay settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelayConfig {
    /// Upper bound for a single random delay, in seconds
    pub max_delay_secs: f64,
    /// Number of concurrent delay tasks
    pub tasks: usize,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            max_delay_secs: DEFAULT_MAX_DELAY,
            tasks: 5,
        }
    }
}

/// Resolved configuration from all sources
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug)]
pub struct PrimerConfig {
    /// GitHub client settings
    pub github: GithubConfig,

    /// Fan-out delay settings
    pub delay: DelayConfig,

    /// Random stream settings
    pub generator: GeneratorConfig,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for PrimerConfig {
    fn default() -> Self {
        Self {
            github: GithubConfig::default(),
            delay: DelayConfig::default(),
            generator: GeneratorConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl PrimerConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Check values that would make the operations misbehave
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.github.api_base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "github.api_base_url must be an http(s) URL, got '{base}'"
            )));
        }
        let max_delay = self.delay.max_delay_secs;
        if !max_delay.is_finite() || max_delay < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "delay.max_delay_secs must be a non-negative number, got {max_delay}"
            )));
        }
        if max_delay > MAX_DELAY_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "delay.max_delay_secs must be at most {MAX_DELAY_LIMIT}, got {max_delay}"
            )));
        }
        if self.generator.count == 0 {
            return Err(ConfigError::ValidationError(
                "generator.count must be at least 1".to_string(),
            ));
        }
        let scale = self.generator.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "generator.scale must be a positive number, got {scale}"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/primer/primer.toml` or
/// `~/.config/primer/primer.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("primer").join("primer.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if the
/// resulting values fail validation. A missing config file is not an error.
pub fn load_config() -> Result<PrimerConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed, or
/// if the resulting values fail validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<PrimerConfig, ConfigError> {
    load_config_with_env(path, |name| std::env::var(name).ok())
}

/// Load configuration with a custom environment lookup
///
/// `env` maps a variable name to its value. [`load_config_from_path`] passes
/// the process environment.
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env<E>(path: Option<PathBuf>, env: E) -> Result<PrimerConfig, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    // Start with defaults
    let mut config = PrimerConfig::default();

    // Try to load from file
    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: PrimerToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    // Apply environment variables (overrides file values)
    apply_env_config(&mut config, env);

    config.validate()?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut PrimerConfig, toml: &PrimerToml) {
    // GitHub settings
    if let Some(ref url) = toml.github.api_base_url {
        config.github.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = toml.github.timeout_secs {
        config.github.timeout = Duration::from_secs(secs);
    }
    if let Some(ref agent) = toml.github.user_agent {
        config.github.user_agent.clone_from(agent);
    }

    // Delay settings
    if let Some(max_delay) = toml.delay.max_delay_secs {
        config.delay.max_delay_secs = max_delay;
    }
    if let Some(tasks) = toml.delay.tasks {
        config.delay.tasks = tasks;
    }

    // Generator settings
    if let Some(count) = toml.generator.count {
        config.generator.count = count;
    }
    if let Some(ms) = toml.generator.interval_ms {
        config.generator.interval = Duration::from_millis(ms);
    }
    if let Some(scale) = toml.generator.scale {
        config.generator.scale = scale;
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config<E>(config: &mut PrimerConfig, env: E)
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(url) = env("PRIMER_GITHUB_API") {
        config.github.api_base_url = url.trim_end_matches('/').to_string();
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = env("PRIMER_HTTP_TIMEOUT") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config.github.timeout = Duration::from_secs(secs);
            config.source = ConfigSource::Env;
        } else {
            tracing::warn!(value = %timeout, "Ignoring unparseable PRIMER_HTTP_TIMEOUT");
        }
    }
    if let Some(agent) = env("PRIMER_USER_AGENT") {
        config.github.user_agent = agent;
        config.source = ConfigSource::Env;
    }
    if let Some(max_delay) = env("PRIMER_MAX_DELAY") {
        if let Ok(secs) = max_delay.parse::<f64>() {
            config.delay.max_delay_secs = secs;
            config.source = ConfigSource::Env;
        } else {
            tracing::warn!(value = %max_delay, "Ignoring unparseable PRIMER_MAX_DELAY");
        }
    }
    if let Some(tasks) = env("PRIMER_TASKS") {
        if let Ok(n) = tasks.parse::<usize>() {
            config.delay.tasks = n;
            config.source = ConfigSource::Env;
        } else {
            tracing::warn!(value = %tasks, "Ignoring unparseable PRIMER_TASKS");
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// API base URL override
    pub api_base_url: Option<String>,

    /// HTTP timeout override (seconds)
    pub timeout_secs: Option<u64>,

    /// Max delay override (seconds)
    pub max_delay_secs: Option<f64>,

    /// Task count override
    pub tasks: Option<usize>,

    /// Generated value count override
    pub count: Option<usize>,

    /// Generator interval override (milliseconds)
    pub interval_ms: Option<u64>,

    /// Generator scale override
    pub scale: Option<f64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set API base URL override
    #[must_use]
    pub fn with_api_base_url(mut self, url: String) -> Self {
        self.api_base_url = Some(url);
        self
    }

    /// Set HTTP timeout override
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set max delay override
    #[must_use]
    pub fn with_max_delay_secs(mut self, secs: f64) -> Self {
        self.max_delay_secs = Some(secs);
        self
    }

    /// Set task count override
    #[must_use]
    pub fn with_tasks(mut self, tasks: usize) -> Self {
        self.tasks = Some(tasks);
        self
    }

    /// Set generated value count override
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Set generator interval override
    #[must_use]
    pub fn with_interval_ms(mut self, ms: u64) -> Self {
        self.interval_ms = Some(ms);
        self
    }

    /// Set generator scale override
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.api_base_url.is_none()
            && self.timeout_secs.is_none()
            && self.max_delay_secs.is_none()
            && self.tasks.is_none()
            && self.count.is_none()
            && self.interval_ms.is_none()
            && self.scale.is_none()
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut PrimerConfig) {
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref url) = self.api_base_url {
            config.github.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(secs) = self.timeout_secs {
            config.github.timeout = Duration::from_secs(secs);
        }

        if let Some(max_delay) = self.max_delay_secs {
            config.delay.max_delay_secs = max_delay;
        }

        if let Some(tasks) = self.tasks {
            config.delay.tasks = tasks;
        }

        if let Some(count) = self.count {
            config.generator.count = count;
        }

        if let Some(ms) = self.interval_ms {
            config.generator.interval = Duration::from_millis(ms);
        }

        if let Some(scale) = self.scale {
            config.generator.scale = scale;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
