//! Task planner: expands a configuration into a flat ordered task list
//!
//! For each enabled algorithm entry, level-capable entries emit one task per
//! selected level and level-less entries emit exactly one task. Order
//! follows the catalog order, then ascending levels within an entry (the
//! spec keeps its levels sorted). Planning is deterministic: the same
//! configuration always yields the same list.

use crate::config::BenchmarkConfig;
use crate::provider::{Family, ProviderKind};
use tracing::debug;

/// One planned (algorithm, level, provider) combination
///
/// Plain data; the runner dispatches on `provider` and `family`, so adding a
/// codec means adding a provider variant and its adapter, not extending a
/// dispatch chain.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTask {
    /// Human-readable label, e.g. `"Deflate L6 (buffer)"`
    pub label: String,
    /// Provider performing the work
    pub provider: ProviderKind,
    /// Format family to produce
    pub family: Family,
    /// Compression level, when the entry is level-capable
    pub level: Option<u32>,
    /// Output file extension
    pub extension: String,
}

/// Expand `config` into the ordered task list
pub fn plan_tasks(config: &BenchmarkConfig) -> Vec<PlannedTask> {
    let mut tasks = Vec::new();

    for spec in &config.algorithms {
        if !spec.enabled {
            continue;
        }
        if spec.supports_levels {
            for &level in &spec.levels {
                tasks.push(PlannedTask {
                    label: task_label(spec.family, spec.provider, Some(level)),
                    provider: spec.provider,
                    family: spec.family,
                    level: Some(level),
                    extension: spec.extension.clone(),
                });
            }
        } else {
            tasks.push(PlannedTask {
                label: task_label(spec.family, spec.provider, None),
                provider: spec.provider,
                family: spec.family,
                level: None,
                extension: spec.extension.clone(),
            });
        }
    }

    debug!(tasks = tasks.len(), "benchmark tasks planned");
    tasks
}

/// Build the display label for one task
///
/// Brotli uses the conventional `Q` quality marker, everything else `L`.
fn task_label(family: Family, provider: ProviderKind, level: Option<u32>) -> String {
    match level {
        Some(level) => {
            let marker = if family == Family::Brotli { 'Q' } else { 'L' };
            format!("{} {}{} ({})", family.display(), marker, level, provider.tag())
        }
        None => format!("{} ({})", family.display(), provider.tag()),
    }
}
