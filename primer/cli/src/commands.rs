//! Subcommands
//!
//! Each subcommand maps onto one `primer-core` operation and writes its
//! result as JSON. `generate` is the exception: it writes one value per line
//! as the stream produces them.

use std::collections::HashMap;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;
use serde_json::{json, Value};
use tokio_stream::StreamExt;
use tracing::info;

use primer_core::{
    access_nested_map, async_generator_with, element_length, make_multiplier, measure_runtime,
    measure_time, safe_first_element, safely_get_value, sum_mixed_list, task_wait_n, to_kv,
    wait_n, zoom_array, ConfigOverrides, GithubOrgClient, Number, PrimerConfig,
    DEFAULT_ZOOM_FACTOR,
};

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the first argument, or null when there is none
    First {
        /// Input values
        values: Vec<String>,
    },

    /// Repeat every value `factor` times in place
    Zoom {
        /// Repetitions per value
        #[arg(short, long, default_value_t = DEFAULT_ZOOM_FACTOR)]
        factor: usize,
        /// Input values
        values: Vec<String>,
    },

    /// Sum integers and floats
    Sum {
        /// Numbers to add
        #[arg(value_parser = parse_number, allow_negative_numbers = true)]
        values: Vec<Number>,
    },

    /// Pair a key with the square of a number
    Kv {
        /// Key
        key: String,
        /// Number to square
        #[arg(value_parser = parse_number, allow_negative_numbers = true)]
        value: Number,
    },

    /// Multiply every value by a fixed factor
    Multiply {
        /// The factor
        #[arg(short, long, allow_negative_numbers = true)]
        by: f64,
        /// Values to scale
        #[arg(allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Pair every word with its length in characters
    Lengths {
        /// Input words
        words: Vec<String>,
    },

    /// Look up a key among `key=value` entries
    Get {
        /// Map entry as `key=value` (repeatable)
        #[arg(short, long = "entry", value_parser = parse_entry)]
        entries: Vec<(String, String)>,
        /// Value printed when the key is absent
        #[arg(short, long)]
        default: Option<String>,
        /// Key to look up
        key: String,
    },

    /// Follow a path of keys into a JSON document
    Lookup {
        /// JSON document
        document: String,
        /// Keys, outermost first
        path: Vec<String>,
    },

    /// Run random waits concurrently and print their delays, ascending
    Wait {
        /// Number of waits (defaults to `delay.tasks`)
        #[arg(short = 'n', long)]
        tasks: Option<usize>,
        /// Upper bound per wait in seconds (defaults to `delay.max_delay_secs`)
        #[arg(short, long)]
        max_delay: Option<f64>,
        /// Run each wait as a spawned task
        #[arg(long)]
        spawn: bool,
        /// Print the average time per wait instead of the delays
        #[arg(long, conflicts_with = "spawn")]
        measure: bool,
    },

    /// Print timed random values as they are produced
    Generate {
        /// Values to produce (defaults to `generator.count`)
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Pause before each value in milliseconds
        #[arg(short, long)]
        interval_ms: Option<u64>,
        /// Values are drawn from `[0, scale)`
        #[arg(short, long)]
        scale: Option<f64>,
    },

    /// Time four concurrent ten-value comprehensions
    Runtime,

    /// Print an organization document
    Org {
        /// Organization login
        org: String,
    },

    /// List an organization's public repositories
    Repos {
        /// Organization login
        org: String,
        /// Only repositories with this license key (e.g. `apache-2.0`)
        #[arg(long)]
        license: Option<String>,
    },
}

/// Parse an integer, falling back to a float
fn parse_number(s: &str) -> Result<Number, String> {
    if let Ok(i) = s.parse::<i64>() {
        return Ok(Number::Int(i));
    }
    s.parse::<f64>()
        .map(Number::Float)
        .map_err(|_| format!("'{s}' is not a number"))
}

/// Split `key=value`
fn parse_entry(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("'{s}' is not of the form key=value"))
}

/// Write `value` as a single JSON line
fn emit<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value).context("Failed to serialize output")?;
    writeln!(out).context("Failed to write output")?;
    Ok(())
}

impl Command {
    /// Configuration values this command's flags override
    ///
    /// They are applied with the global overrides, before validation.
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        match *self {
            Self::Wait {
                tasks, max_delay, ..
            } => {
                if let Some(n) = tasks {
                    overrides = overrides.with_tasks(n);
                }
                if let Some(secs) = max_delay {
                    overrides = overrides.with_max_delay_secs(secs);
                }
            }
            Self::Generate {
                count,
                interval_ms,
                scale,
            } => {
                if let Some(count) = count {
                    overrides = overrides.with_count(count);
                }
                if let Some(ms) = interval_ms {
                    overrides = overrides.with_interval_ms(ms);
                }
                if let Some(scale) = scale {
                    overrides = overrides.with_scale(scale);
                }
            }
            _ => {}
        }
        overrides
    }

    /// Run the command against `config`, writing results to `out`
    ///
    /// Flag values reach the command through `config`; see [`Self::overrides`].
    pub async fn run<W: Write>(self, config: &PrimerConfig, out: &mut W) -> Result<()> {
        match self {
            Self::First { values } => emit(out, &safe_first_element(&values)),

            Self::Zoom { factor, values } => emit(out, &zoom_array(&values, factor)),

            Self::Sum { values } => emit(out, &sum_mixed_list(&values)),

            Self::Kv { key, value } => emit(out, &to_kv(key, value)),

            Self::Multiply { by, values } => {
                let multiplier = make_multiplier(by);
                let scaled: Vec<f64> = values.into_iter().map(multiplier).collect();
                emit(out, &scaled)
            }

            Self::Lengths { words } => emit(out, &element_length(words)),

            Self::Get {
                entries,
                default,
                key,
            } => {
                let map: HashMap<String, String> = entries.into_iter().collect();
                emit(out, &safely_get_value(&map, key.as_str(), default.as_ref()))
            }

            Self::Lookup { document, path } => {
                let document: Value =
                    serde_json::from_str(&document).context("Document is not valid JSON")?;
                let found = access_nested_map(&document, path.as_slice())?;
                emit(out, found)
            }

            Self::Wait { spawn, measure, .. } => {
                let n = config.delay.tasks;
                let max_delay = config.delay.max_delay_secs;
                info!(n, max_delay, spawn, measure, "Waiting");

                if measure {
                    let average = measure_time(n, max_delay).await;
                    emit(out, &json!({ "average_secs": average.as_secs_f64() }))
                } else if spawn {
                    emit(out, &task_wait_n(n, max_delay).await?)
                } else {
                    emit(out, &wait_n(n, max_delay).await)
                }
            }

            Self::Generate { .. } => {
                let stream = async_generator_with(config.generator);
                tokio::pin!(stream);
                while let Some(value) = stream.next().await {
                    emit(out, &value)?;
                    out.flush().context("Failed to flush output")?;
                }
                Ok(())
            }

            Self::Runtime => {
                let elapsed = measure_runtime().await;
                emit(out, &json!({ "elapsed_secs": elapsed.as_secs_f64() }))
            }

            Self::Org { org } => {
                let client = GithubOrgClient::from_config(org, &config.github)?;
                emit(out, client.org().await?)
            }

            Self::Repos { org, license } => {
                let client = GithubOrgClient::from_config(org, &config.github)?;
                emit(out, &client.public_repos(license.as_deref()).await?)
            }
        }
    }
}
