//! Timed Random Streams
//!
//! A lazy stream that suspends for a fixed interval before producing each
//! random value, plus helpers that drain it into a list.
//!
//! Nothing happens until the stream is polled: the first interval starts on
//! the first poll, not when the stream is built. Every call to
//! [`async_generator`] builds a fresh, independent stream.

use std::time::Duration;

use futures::future::join_all;
use futures::stream::{self, Stream, StreamExt};
use tokio::time::Instant;

use crate::delay::random_delay;

/// Number of comprehensions [`measure_runtime`] runs side by side
pub const PARALLEL_COMPREHENSIONS: usize = 4;

/// Shape of a generated stream
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// How many values the stream yields
    pub count: usize,
    /// Pause before each value
    pub interval: Duration,
    /// Values are drawn from `[0, scale)`
    pub scale: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 10,
            interval: Duration::from_secs(1),
            scale: 10.0,
        }
    }
}

/// Ten random values in `[0, 10)`, one per second
pub fn async_generator() -> impl Stream<Item = f64> + Send {
    async_generator_with(GeneratorConfig::default())
}

/// Stream of `config.count` random values, each preceded by `config.interval`
pub fn async_generator_with(config: GeneratorConfig) -> impl Stream<Item = f64> + Send {
    stream::unfold(0_usize, move |produced| async move {
        if produced >= config.count {
            return None;
        }
        tokio::time::sleep(config.interval).await;
        let value = random_delay(&mut rand::thread_rng(), config.scale);
        Some((value, produced + 1))
    })
}

/// Collect one run of [`async_generator`]
pub async fn async_comprehension() -> Vec<f64> {
    async_comprehension_with(GeneratorConfig::default()).await
}

/// Collect one run of [`async_generator_with`]
pub async fn async_comprehension_with(config: GeneratorConfig) -> Vec<f64> {
    async_generator_with(config).collect().await
}

/// Run [`PARALLEL_COMPREHENSIONS`] comprehensions concurrently and time them
///
/// The runs overlap, so the result is close to a single run's duration.
pub async fn measure_runtime() -> Duration {
    let start = Instant::now();
    join_all((0..PARALLEL_COMPREHENSIONS).map(|_| async_comprehension())).await;
    let elapsed = start.elapsed();

    tracing::debug!(
        runs = PARALLEL_COMPREHENSIONS,
        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        "Measured parallel comprehensions"
    );
    elapsed
}
