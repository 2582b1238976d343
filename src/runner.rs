//! Benchmark runner: sequential task execution with progress reporting
//!
//! Tasks run strictly one after another - concurrent CPU-bound tasks would
//! skew each other's measured durations. The runner yields control before
//! every task and between the compress and decompress phases so progress
//! output stays live, reports `(completed, total, label)` before each task
//! starts, and finishes with a `(total, total, "Complete")` callback.
//!
//! A failing task is dropped silently: its absence from the result list is
//! the only trace. Results come back in execution order; ranking and sorting
//! belong to the presentation layer and [`crate::summary`].

use crate::config::BenchmarkConfig;
use crate::error::Result;
use crate::planner::{plan_tasks, PlannedTask};
use crate::provider::{CodecHost, Family, ProviderKind};
use crate::timing::{measure, measure_async, TimingStats};
use bytes::Bytes;
use tokio::task::yield_now;
use tracing::{debug, info};

/// Bytes per megabyte for throughput normalization
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Outcome of one benchmarked (algorithm, level, provider) combination
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Task label, e.g. `"Zlib L9 (buffer)"`
    pub algorithm: String,
    /// Format family
    pub family: Family,
    /// Input size in bytes
    pub original_size: u64,
    /// Compressed payload size in bytes
    pub compressed_size: u64,
    /// `original_size / compressed_size`; may be non-finite for degenerate
    /// sizes and must be formatted, not trusted, downstream
    pub compression_ratio: f64,
    /// Percentage size reduction; negative when the payload grew
    pub compression_loss_pct: f64,
    /// Compression timing statistics
    pub compress_time: TimingStats,
    /// Decompression timing statistics
    pub decompress_time: TimingStats,
    /// Compression throughput in MB/s (original size over average time)
    pub throughput_compress: f64,
    /// Decompression throughput in MB/s
    pub throughput_decompress: f64,
    /// Representative compressed payload (last compression iteration)
    pub compressed_data: Vec<u8>,
    /// Whether decompressing the payload reproduced the input byte-for-byte
    pub verified: bool,
    /// Output file extension
    pub extension: String,
    /// Compression level, when the task carried one
    pub level: Option<u32>,
    /// Iteration count used for both phases
    pub iterations: u32,
    /// Provider that performed the work
    pub provider: ProviderKind,
    /// Human provider label
    pub provider_label: String,
}

/// Execute all planned tasks for `config` against `data`
///
/// The progress callback receives `(completed, total, label)` before each
/// task and `(total, total, "Complete")` once at the end. Individual task
/// failures are logged at debug level and skipped; only an invalid
/// configuration fails the run as a whole.
///
/// # Examples
///
/// ```no_run
/// use bytes::Bytes;
/// use compress_bench::config::BenchmarkConfig;
/// use compress_bench::provider::CodecHost;
/// use compress_bench::runner::run_benchmarks;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), compress_bench::BenchError> {
/// let host = CodecHost::new();
/// let config = BenchmarkConfig::detect(&host).await;
/// let data = Bytes::from(std::fs::read("input.bin")?);
///
/// let results = run_benchmarks(&host, &data, &config, |done, total, label| {
///     eprintln!("[{}/{}] {}", done, total, label);
/// })
/// .await?;
///
/// for r in &results {
///     println!("{}: {:.2}x, verified: {}", r.algorithm, r.compression_ratio, r.verified);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn run_benchmarks<F>(
    host: &CodecHost,
    data: &Bytes,
    config: &BenchmarkConfig,
    mut progress: F,
) -> Result<Vec<BenchmarkResult>>
where
    F: FnMut(usize, usize, &str),
{
    config.validate()?;

    let tasks = plan_tasks(config);
    let total = tasks.len();
    let mut results = Vec::with_capacity(total);

    info!(
        tasks = total,
        iterations = config.iterations,
        input_size = data.len(),
        "benchmark run starting"
    );

    for (completed, task) in tasks.iter().enumerate() {
        progress(completed, total, &task.label);
        yield_now().await;

        match run_task(host, data, task, config.iterations).await {
            Ok(result) => results.push(result),
            Err(e) => debug!(task = %task.label, error = %e, "task failed, skipping"),
        }
    }

    progress(total, total, "Complete");
    info!(results = results.len(), tasks = total, "benchmark run complete");
    Ok(results)
}

/// Run the fixed measurement protocol for one task
///
/// 1. Time compression over all iterations, keeping the last payload.
/// 2. Yield once between phases.
/// 3. Time decompression of that representative payload.
/// 4. Verify the round trip byte-for-byte.
/// 5. Derive ratio, size reduction and throughput.
async fn run_task(
    host: &CodecHost,
    data: &Bytes,
    task: &PlannedTask,
    iterations: u32,
) -> Result<BenchmarkResult> {
    let kind = task.provider;
    let family = task.family;
    let level = task.level;
    let input: &[u8] = data;

    let (compress_time, compressed) = match kind {
        ProviderKind::Stream => {
            measure_async(iterations, move || host.compress(kind, family, level, input)).await?
        }
        _ => measure(iterations, move || host.compress_sync(kind, family, level, input)).await?,
    };

    yield_now().await;

    let payload: &[u8] = &compressed;
    let (decompress_time, decompressed) = match kind {
        ProviderKind::Stream => {
            measure_async(iterations, move || host.decompress(kind, family, payload)).await?
        }
        _ => measure(iterations, move || host.decompress_sync(kind, family, payload)).await?,
    };

    let verified = decompressed.as_slice() == input;
    let original_size = input.len() as u64;
    let compressed_size = compressed.len() as u64;

    Ok(BenchmarkResult {
        algorithm: task.label.clone(),
        family,
        original_size,
        compressed_size,
        compression_ratio: original_size as f64 / compressed_size as f64,
        compression_loss_pct: (original_size as f64 - compressed_size as f64)
            / original_size as f64
            * 100.0,
        throughput_compress: throughput_mb_per_sec(original_size, compress_time.avg_ms),
        throughput_decompress: throughput_mb_per_sec(original_size, decompress_time.avg_ms),
        compress_time,
        decompress_time,
        compressed_data: compressed,
        verified,
        extension: task.extension.clone(),
        level,
        iterations,
        provider: kind,
        provider_label: kind.label().to_string(),
    })
}

/// Original size over measured time, normalized to MB/s
///
/// Division only: zero or degenerate inputs produce non-finite values that
/// the formatting layer renders as placeholders.
fn throughput_mb_per_sec(original_size: u64, avg_ms: f64) -> f64 {
    (original_size as f64 / BYTES_PER_MB) / (avg_ms / 1000.0)
}
