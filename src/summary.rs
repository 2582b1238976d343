//! Result aggregation: best-per-metric and best-per-family views
//!
//! Pure functions over a result set; nothing here mutates or re-orders the
//! runner's output. "Best" comparisons use exact numeric equality against
//! the computed extremum, so results that tie exactly are all marked best.

use crate::provider::Family;
use crate::runner::BenchmarkResult;
use std::collections::HashMap;

/// Extreme value per metric over one result set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestValues {
    /// Highest compression ratio
    pub best_ratio: f64,
    /// Lowest average compression time, in milliseconds
    pub best_compress_ms: f64,
    /// Highest compression throughput, in MB/s
    pub best_throughput: f64,
    /// Smallest compressed size, in bytes
    pub smallest_size: u64,
    /// Lowest average decompression time, in milliseconds
    pub best_decompress_ms: f64,
    /// Highest decompression throughput, in MB/s
    pub best_decompress_throughput: f64,
}

impl BestValues {
    /// Whether `r` ties the best compression ratio exactly
    pub fn is_best_ratio(&self, r: &BenchmarkResult) -> bool {
        r.compression_ratio == self.best_ratio
    }

    /// Whether `r` ties the fastest compression exactly
    pub fn is_fastest_compress(&self, r: &BenchmarkResult) -> bool {
        r.compress_time.avg_ms == self.best_compress_ms
    }

    /// Whether `r` ties the smallest output exactly
    pub fn is_smallest(&self, r: &BenchmarkResult) -> bool {
        r.compressed_size == self.smallest_size
    }

    /// Whether `r` ties the fastest decompression exactly
    pub fn is_fastest_decompress(&self, r: &BenchmarkResult) -> bool {
        r.decompress_time.avg_ms == self.best_decompress_ms
    }
}

/// Compute per-metric extrema; `None` for an empty result set
pub fn best_values(results: &[BenchmarkResult]) -> Option<BestValues> {
    if results.is_empty() {
        return None;
    }
    Some(BestValues {
        best_ratio: fold_f64(results, f64::max, |r| r.compression_ratio),
        best_compress_ms: fold_f64(results, f64::min, |r| r.compress_time.avg_ms),
        best_throughput: fold_f64(results, f64::max, |r| r.throughput_compress),
        smallest_size: results.iter().map(|r| r.compressed_size).min().unwrap_or(0),
        best_decompress_ms: fold_f64(results, f64::min, |r| r.decompress_time.avg_ms),
        best_decompress_throughput: fold_f64(results, f64::max, |r| r.throughput_decompress),
    })
}

/// Best compression ratio per family, sorted by ratio descending
///
/// Returns at most one entry per distinct family present in the input.
/// A NaN ratio (degenerate zero-by-zero input) orders below every other
/// value instead of poisoning the sort.
pub fn best_per_family(results: &[BenchmarkResult]) -> Vec<BenchmarkResult> {
    let mut by_family: HashMap<Family, &BenchmarkResult> = HashMap::new();
    for r in results {
        match by_family.get(&r.family) {
            Some(existing) if ratio_key(existing) >= ratio_key(r) => {}
            _ => {
                by_family.insert(r.family, r);
            }
        }
    }

    let mut picked: Vec<BenchmarkResult> = by_family.into_values().cloned().collect();
    picked.sort_by(|a, b| ratio_key(b).total_cmp(&ratio_key(a)));
    picked
}

/// Sort key pushing NaN ratios to the bottom
fn ratio_key(r: &BenchmarkResult) -> f64 {
    if r.compression_ratio.is_nan() {
        f64::NEG_INFINITY
    } else {
        r.compression_ratio
    }
}

fn fold_f64(
    results: &[BenchmarkResult],
    pick: fn(f64, f64) -> f64,
    metric: fn(&BenchmarkResult) -> f64,
) -> f64 {
    results
        .iter()
        .skip(1)
        .fold(metric(&results[0]), |acc, r| pick(acc, metric(r)))
}
