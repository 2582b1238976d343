//! Error types for benchmark operations
//!
//! This module defines all error types that can occur while probing codec
//! providers, running benchmark tasks, and persisting run history.

use thiserror::Error;

/// Benchmark error types
///
/// All fallible operations in this library return `Result<T, BenchError>`
/// to provide explicit error handling.
#[derive(Error, Debug)]
pub enum BenchError {
    /// A provider cannot handle the requested codec family
    ///
    /// This error occurs when:
    /// - A task asks the streaming provider for a family it does not frame
    ///   (e.g. brotli through the flate2 stream codec)
    /// - A lazily-initialized engine (brotli, zstd) failed its self-test and
    ///   was recorded as unavailable
    ///
    /// The runner treats this as a task-level failure: the task is skipped
    /// and the run continues.
    #[error("provider '{provider}' cannot handle family '{family}'")]
    Unsupported {
        /// Provider kind name
        provider: &'static str,
        /// Codec family name
        family: &'static str,
    },

    /// A codec operation produced invalid output or rejected its input
    ///
    /// This error occurs when:
    /// - Decompression is handed corrupted or truncated data
    /// - The underlying codec reports a stream error that is not an I/O error
    #[error("codec error: {0}")]
    Codec(String),

    /// Invalid benchmark configuration
    ///
    /// This error occurs when:
    /// - The iteration count is zero or exceeds the allowed bound
    /// - An algorithm is enabled although its provider failed its probe
    /// - Selected levels fall outside the available level range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error during codec streaming or history persistence
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// History entry (de)serialization failure
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;
