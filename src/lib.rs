//! Compression codec benchmark harness
//!
//! This library benchmarks multiple compression codecs (gzip, deflate,
//! deflate-raw, zlib, brotli, zstd) across multiple provider
//! implementations against a caller-supplied byte buffer, entirely
//! in-process.
//!
//! # Features
//!
//! - **Four provider kinds behind one contract** - flate2 streaming
//!   transforms, a miniz_oxide buffer codec, and lazily-initialized brotli
//!   and zstd engines
//! - **Capability probing** - each provider/family pair is probed once and
//!   cached; an unavailable codec is reflected in the catalog, never raised
//! - **Cooperative scheduling** - long CPU-bound runs yield at bounded
//!   intervals so progress reporting stays live, without polluting measured
//!   durations
//! - **Statistical timing** - every phase is repeated and reduced to
//!   average/minimum/maximum wall times plus normalized throughput
//! - **Round-trip verification** - each result records whether
//!   decompression reproduced the input byte-for-byte
//! - **Compact history** - completed runs persist as gzip-compressed JSON
//!   records with payloads stripped, a 50-entry retention cap and
//!   corruption-tolerant loading
//!
//! # Quick Start
//!
//! ```no_run
//! use bytes::Bytes;
//! use compress_bench::config::BenchmarkConfig;
//! use compress_bench::provider::CodecHost;
//! use compress_bench::runner::run_benchmarks;
//! use compress_bench::summary::best_per_family;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), compress_bench::BenchError> {
//!     let host = CodecHost::new();
//!     let config = BenchmarkConfig::detect(&host).await;
//!     let data = Bytes::from(std::fs::read("input.bin")?);
//!
//!     let results = run_benchmarks(&host, &data, &config, |done, total, label| {
//!         eprintln!("[{}/{}] {}", done, total, label);
//!     })
//!     .await?;
//!
//!     for best in best_per_family(&results) {
//!         println!("{}: {:.2}x", best.algorithm, best.compression_ratio);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **`provider`** - codec adapters and the session-scoped [`provider::CodecHost`]
//! - **`config`** - algorithm catalog, capability-probed defaults, validation
//! - **`planner`** - expands a configuration into the flat ordered task list
//! - **`timing`** - the cooperative-yield measurement harness
//! - **`runner`** - sequential task execution, progress, verification
//! - **`summary`** - best-per-metric and best-per-family views
//! - **`history`** - compressed persistent run history with retention
//! - **`format`** / **`hash`** - presentation helpers and content digests
//!
//! Failures are contained at the smallest scope that preserves a usable
//! outcome: a failing codec task disappears from the result list without
//! aborting the run, and a corrupted history record is skipped without
//! failing the load.

pub mod config;
pub mod error;
pub mod format;
pub mod hash;
pub mod history;
pub mod planner;
pub mod provider;
pub mod runner;
pub mod summary;
pub mod timing;

// Re-export commonly used types
pub use error::{BenchError, Result};
