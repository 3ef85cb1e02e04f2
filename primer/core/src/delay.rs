//! Random Delays and Fan-Out
//!
//! Async operations that sleep for a random duration and report how long they
//! waited. [`wait_n`] runs many of them concurrently on the current task and
//! gathers the results; [`task_wait_n`] does the same with spawned tokio tasks.
//!
//! Results come back sorted ascending. Start order is never observable: each
//! operation picks its own delay and knows nothing about the others.
//!
//! # Example
//!
//! ```ignore
//! use primer_core::delay::wait_n;
//!
//! let delays = wait_n(5, 10.0).await;
//! assert_eq!(delays.len(), 5);
//! assert!(delays.windows(2).all(|w| w[0] <= w[1]));
//! ```

use std::time::Duration;

use futures::future::join_all;
use rand::Rng;
use thiserror::Error;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;

/// Default upper bound for a single random delay, in seconds
pub const DEFAULT_MAX_DELAY: f64 = 10.0;

/// Largest bound [`wait_random`] honours, in seconds (one day)
pub const MAX_DELAY_LIMIT: f64 = 86_400.0;

/// Errors from task-based fan-out
#[derive(Debug, Error)]
pub enum DelayError {
    /// A spawned delay task panicked or was cancelled
    #[error("Delay task failed: {0}")]
    TaskFailed(String),
}

impl From<tokio::task::JoinError> for DelayError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskFailed(err.to_string())
    }
}

/// Draw a delay in `[0, max_delay)` seconds
///
/// A bound that is zero, negative or not finite yields `0.0`.
pub fn random_delay<R: Rng + ?Sized>(rng: &mut R, max_delay: f64) -> f64 {
    if max_delay.is_finite() && max_delay > 0.0 {
        rng.gen_range(0.0..max_delay)
    } else {
        0.0
    }
}

/// Sleep for a random delay below `max_delay` seconds and return it
///
/// Bounds above [`MAX_DELAY_LIMIT`] are clamped to it.
pub async fn wait_random(max_delay: f64) -> f64 {
    let delay = random_delay(&mut rand::thread_rng(), max_delay.min(MAX_DELAY_LIMIT));
    let duration = Duration::try_from_secs_f64(delay).unwrap_or(Duration::ZERO);
    tokio::time::sleep(duration).await;
    delay
}

/// Run `n` random waits concurrently and return their delays, ascending
///
/// All waits are polled cooperatively on the calling task.
pub async fn wait_n(n: usize, max_delay: f64) -> Vec<f64> {
    tracing::debug!(n, max_delay, "Gathering random waits");

    let mut delays = join_all((0..n).map(|_| wait_random(max_delay))).await;
    delays.sort_by(f64::total_cmp);
    delays
}

/// Spawn a random wait as its own tokio task
#[must_use]
pub fn task_wait_random(max_delay: f64) -> JoinHandle<f64> {
    tokio::spawn(wait_random(max_delay))
}

/// Like [`wait_n`], but each wait runs as a spawned task
///
/// # Errors
///
/// Returns [`DelayError::TaskFailed`] if any task panics or is cancelled.
/// The remaining tasks are aborted when that happens.
pub async fn task_wait_n(n: usize, max_delay: f64) -> Result<Vec<f64>, DelayError> {
    tracing::debug!(n, max_delay, "Spawning random wait tasks");

    let mut join_set = JoinSet::new();
    for _ in 0..n {
        join_set.spawn(wait_random(max_delay));
    }

    let mut delays = Vec::with_capacity(n);
    while let Some(result) = join_set.join_next().await {
        delays.push(result?);
    }

    delays.sort_by(f64::total_cmp);
    Ok(delays)
}

/// Average wall time per wait for one [`wait_n`] run
///
/// Returns [`Duration::ZERO`] when `n` is zero.
pub async fn measure_time(n: usize, max_delay: f64) -> Duration {
    if n == 0 {
        return Duration::ZERO;
    }

    let start = Instant::now();
    wait_n(n, max_delay).await;
    let elapsed = start.elapsed();

    tracing::debug!(
        n,
        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        "Measured fan-out"
    );
    elapsed / u32::try_from(n).unwrap_or(u32::MAX)
}
