//! Timing harness with cooperative yielding
//!
//! Runs a unit of work a fixed number of times and reduces the per-iteration
//! wall times to average/minimum/maximum. Long runs periodically hand
//! control back to the executor so progress reporting (and anything else on
//! the same runtime) stays responsive; the yields happen *between*
//! iterations and are never counted into the measured durations.
//!
//! Two flavors exist, matching the two shapes of provider work:
//! [`measure`] for synchronous closures (yields after every 3rd iteration)
//! and [`measure_async`] for future-producing closures (yields after every
//! 2nd iteration, timing the awaited completion).

use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Instant;
use tokio::task::yield_now;

/// How many synchronous iterations run between yields
const SYNC_YIELD_INTERVAL: u32 = 3;

/// How many asynchronous iterations run between yields
const ASYNC_YIELD_INTERVAL: u32 = 2;

/// Reduced timing statistics over one measured phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    /// Arithmetic mean over all iterations, in milliseconds
    pub avg_ms: f64,
    /// Fastest iteration, in milliseconds
    pub min_ms: f64,
    /// Slowest iteration, in milliseconds
    pub max_ms: f64,
}

impl TimingStats {
    fn from_samples(samples: &[f64]) -> Self {
        let sum: f64 = samples.iter().sum();
        Self {
            avg_ms: sum / samples.len() as f64,
            min_ms: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max_ms: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Time a synchronous unit of work over `iterations` runs
///
/// Returns the reduced statistics together with the output of the *last*
/// iteration, which callers use as the representative payload.
///
/// # Errors
///
/// - [`BenchError::InvalidConfig`] - `iterations` is zero (configuration
///   validation should have rejected this upstream)
/// - Any error returned by the work function aborts the measurement
///
/// # Examples
///
/// ```
/// use compress_bench::timing::measure;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), compress_bench::BenchError> {
/// let (stats, out) = measure(5, || Ok::<_, compress_bench::BenchError>(2 + 2)).await?;
/// assert_eq!(out, 4);
/// assert!(stats.min_ms <= stats.avg_ms && stats.avg_ms <= stats.max_ms);
/// # Ok(())
/// # }
/// ```
pub async fn measure<T, F>(iterations: u32, mut work: F) -> Result<(TimingStats, T)>
where
    F: FnMut() -> Result<T>,
{
    ensure_iterations(iterations)?;
    let mut samples = Vec::with_capacity(iterations as usize);

    let start = Instant::now();
    let mut last = work()?;
    samples.push(start.elapsed().as_secs_f64() * 1000.0);

    for i in 1..iterations {
        if i % SYNC_YIELD_INTERVAL == 0 {
            yield_now().await;
        }
        let start = Instant::now();
        last = work()?;
        samples.push(start.elapsed().as_secs_f64() * 1000.0);
    }

    Ok((TimingStats::from_samples(&samples), last))
}

/// Time an asynchronous unit of work over `iterations` runs
///
/// Same contract as [`measure`], but the work function produces a future and
/// the measured duration covers its awaited completion.
pub async fn measure_async<T, F, Fut>(iterations: u32, mut work: F) -> Result<(TimingStats, T)>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    ensure_iterations(iterations)?;
    let mut samples = Vec::with_capacity(iterations as usize);

    let start = Instant::now();
    let mut last = work().await?;
    samples.push(start.elapsed().as_secs_f64() * 1000.0);

    for i in 1..iterations {
        if i % ASYNC_YIELD_INTERVAL == 0 {
            yield_now().await;
        }
        let start = Instant::now();
        last = work().await?;
        samples.push(start.elapsed().as_secs_f64() * 1000.0);
    }

    Ok((TimingStats::from_samples(&samples), last))
}

fn ensure_iterations(iterations: u32) -> Result<()> {
    if iterations == 0 {
        return Err(BenchError::InvalidConfig(
            "iteration count must be at least 1".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_measure_returns_last_output() {
        let mut counter = 0u32;
        let (stats, last) = measure(4, || {
            counter += 1;
            Ok::<_, BenchError>(counter)
        })
        .await
        .unwrap();
        assert_eq!(last, 4);
        assert!(stats.min_ms <= stats.avg_ms);
        assert!(stats.avg_ms <= stats.max_ms);
    }

    #[tokio::test]
    async fn test_measure_single_iteration() {
        let (stats, out) = measure(1, || Ok::<_, BenchError>(42)).await.unwrap();
        assert_eq!(out, 42);
        assert_eq!(stats.min_ms, stats.max_ms);
        assert_eq!(stats.avg_ms, stats.min_ms);
    }

    #[tokio::test]
    async fn test_measure_zero_iterations_rejected() {
        let result = measure(0, || Ok::<_, BenchError>(())).await;
        assert!(matches!(result, Err(BenchError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_measure_propagates_work_error() {
        let result: Result<(TimingStats, ())> = measure(3, || {
            Err(BenchError::Codec("boom".into()))
        })
        .await;
        assert!(matches!(result, Err(BenchError::Codec(_))));
    }

    #[tokio::test]
    async fn test_measure_async_counts_iterations() {
        let mut runs = 0u32;
        let (_, last) = measure_async(5, || {
            runs += 1;
            let value = runs;
            async move { Ok::<_, BenchError>(value) }
        })
        .await
        .unwrap();
        assert_eq!(last, 5);
        assert_eq!(runs, 5);
    }

    #[tokio::test]
    async fn test_measure_async_zero_iterations_rejected() {
        let result = measure_async(0, || async { Ok::<_, BenchError>(()) }).await;
        assert!(matches!(result, Err(BenchError::InvalidConfig(_))));
    }
}
