//! Benchmark configuration: algorithm catalog and iteration settings
//!
//! The configuration is built once per session by probing every provider in
//! the default catalog against a [`CodecHost`], then mutated only by user
//! toggles. It is never persisted; history entries record the iteration
//! count that was actually used instead.

use crate::error::{BenchError, Result};
use crate::provider::{CodecHost, Family, ProviderKind};
use tracing::info;

/// Smallest accepted iteration count
pub const MIN_ITERATIONS: u32 = 1;

/// Largest accepted iteration count
pub const MAX_ITERATIONS: u32 = 100;

/// Iteration count used when the user has not chosen one
pub const DEFAULT_ITERATIONS: u32 = 3;

/// One configurable codec entry
///
/// Invariants maintained by the mutators:
/// - `enabled` implies `supported` (a failed probe cannot be overridden)
/// - `levels`, when applicable, is a deduplicated ascending subset of
///   `available_levels`
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmSpec {
    /// Stable identifier, e.g. `"deflate-mz"`
    pub id: String,
    /// Display name, e.g. `"Deflate (buffer)"`
    pub name: String,
    /// Format family produced by this entry
    pub family: Family,
    /// Whether this entry participates in the next run
    pub enabled: bool,
    /// Selected compression levels (ascending, deduplicated)
    pub levels: Vec<u32>,
    /// Full level range the provider accepts for this family
    pub available_levels: Vec<u32>,
    /// Whether levels apply to this entry at all
    pub supports_levels: bool,
    /// Output file extension, e.g. `".gz"`
    pub extension: String,
    /// Provider performing the work
    pub provider: ProviderKind,
    /// Capability probe result; fixed for the session
    pub supported: bool,
}

impl AlgorithmSpec {
    /// Toggle this entry, refusing to enable an unsupported provider
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled && self.supported;
    }

    /// Replace the selected levels
    ///
    /// Input is filtered to `available_levels`, deduplicated and sorted
    /// ascending. Entries without level support ignore the call.
    pub fn set_levels(&mut self, levels: &[u32]) {
        if !self.supports_levels {
            return;
        }
        let mut selected: Vec<u32> = levels
            .iter()
            .copied()
            .filter(|l| self.available_levels.contains(l))
            .collect();
        selected.sort_unstable();
        selected.dedup();
        self.levels = selected;
    }

    /// Number of tasks this entry contributes to a run
    pub fn task_count(&self) -> usize {
        if !self.enabled {
            0
        } else if self.supports_levels {
            self.levels.len()
        } else {
            1
        }
    }
}

/// Iteration count plus the ordered algorithm catalog
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// How many times each compress/decompress phase is repeated
    pub iterations: u32,
    /// Ordered algorithm entries; order defines task order
    pub algorithms: Vec<AlgorithmSpec>,
}

impl BenchmarkConfig {
    /// Build the default configuration by probing the full catalog
    pub async fn detect(host: &CodecHost) -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            algorithms: default_specs(host).await,
        }
    }

    /// Validate the configuration before a run
    ///
    /// # Errors
    ///
    /// [`BenchError::InvalidConfig`] when the iteration count is out of
    /// bounds, an unsupported entry is enabled, or selected levels escape
    /// the available range.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(BenchError::InvalidConfig(format!(
                "iterations must be between {} and {}, got {}",
                MIN_ITERATIONS, MAX_ITERATIONS, self.iterations
            )));
        }
        for spec in &self.algorithms {
            if spec.enabled && !spec.supported {
                return Err(BenchError::InvalidConfig(format!(
                    "algorithm '{}' is enabled but its provider is unsupported",
                    spec.id
                )));
            }
            if spec.supports_levels {
                if let Some(bad) = spec
                    .levels
                    .iter()
                    .find(|l| !spec.available_levels.contains(l))
                {
                    return Err(BenchError::InvalidConfig(format!(
                        "algorithm '{}' selects level {} outside its available range",
                        spec.id, bad
                    )));
                }
            }
        }
        Ok(())
    }

    /// Total number of tasks a run of this configuration will plan
    ///
    /// Equals the sum over enabled entries of `levels.len()` for
    /// level-capable entries and 1 otherwise; the planner is required to
    /// produce exactly this many tasks.
    pub fn planned_task_count(&self) -> usize {
        self.algorithms.iter().map(AlgorithmSpec::task_count).sum()
    }
}

/// Probe and assemble the default algorithm catalog
///
/// Covers all six families across the four provider kinds. Entries whose
/// probe fails come back with `supported == false` and `enabled == false`;
/// they stay in the catalog so the presentation layer can show why they are
/// unavailable.
pub async fn default_specs(host: &CodecHost) -> Vec<AlgorithmSpec> {
    let deflate_levels: Vec<u32> = (1..=9).collect();
    let brotli_levels: Vec<u32> = (0..=11).collect();
    let zstd_levels: Vec<u32> = (1..=22).collect();

    let blueprint: Vec<(&str, Family, ProviderKind, Vec<u32>, Vec<u32>)> = vec![
        ("deflate-mz", Family::Deflate, ProviderKind::Buffer, vec![1, 6, 9], deflate_levels.clone()),
        ("zlib-mz", Family::Zlib, ProviderKind::Buffer, vec![1, 6, 9], deflate_levels),
        ("gzip-stream", Family::Gzip, ProviderKind::Stream, vec![], vec![]),
        ("zlib-stream", Family::Zlib, ProviderKind::Stream, vec![], vec![]),
        ("deflate-raw-stream", Family::DeflateRaw, ProviderKind::Stream, vec![], vec![]),
        ("brotli", Family::Brotli, ProviderKind::BrotliEngine, vec![1, 6, 11], brotli_levels),
        ("zstd", Family::Zstd, ProviderKind::ZstdEngine, vec![1, 5, 10, 19], zstd_levels),
    ];

    let mut specs = Vec::with_capacity(blueprint.len());
    for (id, family, provider, levels, available_levels) in blueprint {
        let supported = host.probe(provider, family).await;
        specs.push(AlgorithmSpec {
            id: id.to_string(),
            name: format!("{} ({})", family.display(), provider.tag()),
            family,
            enabled: supported,
            supports_levels: !levels.is_empty(),
            levels,
            available_levels,
            extension: family.extension().to_string(),
            provider,
            supported,
        });
    }

    info!(
        total = specs.len(),
        supported = specs.iter().filter(|s| s.supported).count(),
        "algorithm catalog probed"
    );
    specs
}
