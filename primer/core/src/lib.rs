//! Primer Core - Typed Helpers, Async Delays and a GitHub Client
//!
//! This crate collects small, independent utilities. None of them share
//! state; the only composition is the GitHub client, which builds on the
//! nested-lookup, fetch and memoization helpers.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          primer-core                             │
//! │                                                                  │
//! │  ┌─────────────┐   ┌─────────────┐   ┌────────────────────────┐  │
//! │  │ annotations │   │    delay    │◄──│       generator        │  │
//! │  │  (pure fns) │   │ (fan-out)   │   │ (timed random stream)  │  │
//! │  └─────────────┘   └─────────────┘   └────────────────────────┘  │
//! │                                                                  │
//! │  ┌──────────────────────────────────────────────────────────┐    │
//! │  │                    GithubOrgClient                       │    │
//! │  │  ┌──────────┐   ┌───────────────┐   ┌────────────────┐   │    │
//! │  │  │  nested  │   │  fetch        │   │  memo          │   │    │
//! │  │  │ (lookup) │   │ (JsonFetcher) │   │ (Memoized<T>)  │   │    │
//! │  │  └──────────┘   └───────────────┘   └────────────────┘   │    │
//! │  └──────────────────────────────────────────────────────────┘    │
//! │                                                                  │
//! │  config: TOML file + environment + CLI overrides                 │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`GithubOrgClient`]: Cached access to an organization's public repositories
//! - [`JsonFetcher`]: Source of JSON documents (HTTP or in-memory routes)
//! - [`Memoized`]: A value computed once on first request
//! - [`GeneratorConfig`]: Shape of a timed random stream
//! - [`PrimerConfig`]: Resolved configuration from all sources
//!
//! # Quick Start
//!
//! ```ignore
//! use primer_core::{delay::wait_n, generator::async_comprehension, GithubOrgClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = primer_core::load_config()?;
//!
//!     let delays = wait_n(config.delay.tasks, config.delay.max_delay_secs).await;
//!     let values = async_comprehension().await;
//!
//!     let client = GithubOrgClient::from_config("google", &config.github)?;
//!     let apache = client.public_repos(Some("apache-2.0")).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`annotations`]: Typed helpers over sequences, maps and numbers
//! - [`delay`]: Random sleeps and concurrent fan-out/gather
//! - [`generator`]: Lazy timed random streams and their collection
//! - [`nested`]: Path-based lookup into JSON objects
//! - [`fetch`]: JSON fetching over HTTP or from fixed routes
//! - [`memo`]: Memoized values
//! - [`github`]: GitHub organization client
//! - [`config`]: TOML configuration with environment and CLI overrides

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod annotations;
pub mod config;
pub mod delay;
pub mod fetch;
pub mod generator;
pub mod github;
pub mod memo;
pub mod nested;

// Re-exports for convenience
pub use annotations::{
    add, concat, element_length, floor, make_multiplier, safe_first_element, safely_get_value,
    sum_list, sum_mixed_list, to_kv, to_str, zoom_array, Length, Number, DEFAULT_ZOOM_FACTOR,
};
pub use delay::{
    measure_time, task_wait_n, task_wait_random, wait_n, wait_random, DelayError, MAX_DELAY_LIMIT,
};
pub use fetch::{get_json, FetchError, HttpJsonFetcher, JsonFetcher, StaticJsonFetcher};
pub use generator::{
    async_comprehension, async_comprehension_with, async_generator, async_generator_with,
    measure_runtime, GeneratorConfig,
};
pub use github::{ClientError, GithubOrgClient};
pub use memo::Memoized;
pub use nested::{access_nested_map, LookupError};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_env,
    ConfigError, ConfigOverrides, ConfigSource, DelayConfig, GithubConfig, PrimerConfig,
    PrimerToml,
};
