//! Primer - Command-line front end for primer-core
//!
//! Every helper in `primer-core` is reachable as a subcommand. Results are
//! printed to stdout as JSON; logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Typed helpers
//! primer first a b c
//! primer zoom --factor 3 12 72 91
//! primer sum 1 2.5 -0.5
//!
//! # Concurrent random waits
//! primer wait --tasks 5 --max-delay 3
//!
//! # Ten timed random values, printed as they arrive
//! primer generate
//!
//! # Public repositories with an Apache 2.0 license
//! primer repos google --license apache-2.0
//!
//! # With config file
//! primer --config ~/.config/primer/primer.toml repos google
//!
//! # Verbose logging
//! RUST_LOG=debug primer org google
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use primer_core::{load_config_from_path, ConfigOverrides, PrimerConfig};

use commands::Command;

/// Primer - typed helpers, async fan-out and a GitHub organization client
#[derive(Parser, Debug)]
#[command(name = "primer")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "PRIMER_CONFIG", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// GitHub API base URL (overrides config and environment)
    #[arg(long, value_name = "URL", global = true)]
    api_base: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "PRIMER_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    /// CLI values that take precedence over file and environment
    ///
    /// Global flags plus the subcommand's own.
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = self.command.overrides();
        if let Some(ref url) = self.api_base {
            overrides = overrides.with_api_base_url(url.clone());
        }
        if let Some(secs) = self.timeout {
            overrides = overrides.with_timeout_secs(secs);
        }
        overrides
    }
}

/// Initialize logging with the specified level
///
/// `RUST_LOG` wins over `--log-level` when set.
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("primer={level},primer_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration and apply the CLI overrides
fn resolve_config(args: &Args) -> Result<PrimerConfig> {
    let path = args
        .config
        .clone()
        .or_else(primer_core::default_config_path);

    let mut config = load_config_from_path(path.clone())
        .with_context(|| format!("Failed to load configuration from {path:?}"))?;

    args.overrides().apply(&mut config);
    config.validate().context("Invalid command-line override")?;

    debug!(
        source = %config.source(),
        config_file = ?config.config_file_path,
        api_base_url = %config.github.api_base_url,
        "Configuration resolved"
    );
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging first
    init_logging(&args.log_level);

    let config = resolve_config(&args)?;

    let mut stdout = std::io::stdout().lock();
    let result = args.command.run(&config, &mut stdout).await;

    if let Err(ref e) = result {
        error!(error = %e, "Command failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_args_parse_global_after_subcommand() {
        let args = Args::try_parse_from([
            "primer",
            "repos",
            "google",
            "--license",
            "apache-2.0",
            "--api-base",
            "http://localhost:9000",
        ])
        .unwrap();

        assert_eq!(args.api_base.as_deref(), Some("http://localhost:9000"));
        let overrides = args.overrides();
        assert_eq!(
            overrides.api_base_url.as_deref(),
            Some("http://localhost:9000")
        );
        assert!(overrides.timeout_secs.is_none());
    }

    #[test]
    fn test_resolve_config_from_file_with_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[github]
api_base_url = "https://github.example.com/api/v3"
timeout_secs = 12
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let args = Args::try_parse_from([
            "primer",
            "--config",
            path.as_str(),
            "--timeout",
            "3",
            "org",
            "google",
        ])
        .unwrap();

        let config = resolve_config(&args).unwrap();
        assert_eq!(
            config.github.api_base_url,
            "https://github.example.com/api/v3"
        );
        assert_eq!(config.github.timeout, std::time::Duration::from_secs(3));
        assert_eq!(config.source(), primer_core::ConfigSource::Cli);
    }

    #[test]
    fn test_resolve_config_rejects_bad_override() {
        let args =
            Args::try_parse_from(["primer", "--api-base", "ftp://nope", "org", "google"]).unwrap();
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_subcommand_flags_are_validated() {
        let args = Args::try_parse_from(["primer", "wait", "--max-delay", "1e20"]).unwrap();
        assert!(resolve_config(&args).is_err());

        let args = Args::try_parse_from(["primer", "wait", "-n", "3", "-m", "0.5"]).unwrap();
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.delay.tasks, 3);
        assert!((config.delay.max_delay_secs - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.source(), primer_core::ConfigSource::Cli);
    }
}
