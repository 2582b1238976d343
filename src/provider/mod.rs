//! Codec provider adapters
//!
//! Every benchmarked codec is reached through one of four provider kinds,
//! all exposing the same probe/compress/decompress contract:
//!
//! - [`ProviderKind::Stream`] - flate2 streaming transforms (gzip, zlib,
//!   raw deflate), driven chunk by chunk with cooperative yields
//! - [`ProviderKind::Buffer`] - miniz_oxide one-shot buffer codec
//!   (raw deflate, zlib) with explicit compression levels
//! - [`ProviderKind::BrotliEngine`] - the pure-Rust brotli codec behind a
//!   lazily-initialized engine handle
//! - [`ProviderKind::ZstdEngine`] - the zstd codec behind the same
//!   lazily-initialized engine handle pattern
//!
//! All probe results and engine handles are cached inside [`CodecHost`] for
//! the lifetime of the host, so capability checks never run twice and a
//! failed engine initialization is never retried.
//!
//! # Examples
//!
//! ```
//! use compress_bench::provider::{CodecHost, Family, ProviderKind};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), compress_bench::BenchError> {
//! let host = CodecHost::new();
//! assert!(host.probe(ProviderKind::Buffer, Family::Deflate).await);
//!
//! let data = vec![0u8; 1000];
//! let packed = host
//!     .compress(ProviderKind::Buffer, Family::Deflate, Some(6), &data)
//!     .await?;
//! let unpacked = host
//!     .decompress(ProviderKind::Buffer, Family::Deflate, &packed)
//!     .await?;
//! assert_eq!(data, unpacked);
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod engine;
pub mod stream;

use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

/// Compression format family, independent of the provider producing it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    /// Gzip framing (RFC 1952)
    Gzip,
    /// Raw deflate stream (RFC 1951)
    Deflate,
    /// Raw deflate via the streaming transform
    DeflateRaw,
    /// Zlib framing (RFC 1950)
    Zlib,
    /// Brotli
    Brotli,
    /// Zstandard
    Zstd,
}

impl Family {
    /// Wire name used in serialized history entries
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
            Self::DeflateRaw => "deflate-raw",
            Self::Zlib => "zlib",
            Self::Brotli => "brotli",
            Self::Zstd => "zstd",
        }
    }

    /// Human-readable display name
    pub fn display(&self) -> &'static str {
        match self {
            Self::Gzip => "Gzip",
            Self::Deflate => "Deflate",
            Self::DeflateRaw => "Deflate-Raw",
            Self::Zlib => "Zlib",
            Self::Brotli => "Brotli",
            Self::Zstd => "Zstandard",
        }
    }

    /// Conventional output file extension for this family
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Gzip => ".gz",
            Self::Deflate | Self::DeflateRaw => ".deflate",
            Self::Zlib => ".zz",
            Self::Brotli => ".br",
            Self::Zstd => ".zst",
        }
    }
}

/// The mechanism performing compression/decompression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// flate2 push/pull streaming transform
    Stream,
    /// miniz_oxide one-shot buffer codec
    Buffer,
    /// Lazily-initialized brotli engine
    BrotliEngine,
    /// Lazily-initialized zstd engine
    ZstdEngine,
}

impl ProviderKind {
    /// Short tag used in task labels
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Stream => "stream",
            Self::Buffer => "buffer",
            Self::BrotliEngine => "brotli",
            Self::ZstdEngine => "zstd",
        }
    }

    /// Human provider label shown alongside results
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stream => "flate2 (streaming)",
            Self::Buffer => "miniz_oxide (buffer)",
            Self::BrotliEngine => "brotli (engine)",
            Self::ZstdEngine => "zstd (engine)",
        }
    }
}

/// Session-scoped codec host
///
/// Owns every probe cache and lazily-initialized engine handle, replacing
/// hidden module-level state with an explicitly passed resource. Probes are
/// executed at most once per (provider, family) pair; engines initialize on
/// first use and a failed initialization is memoized as "unavailable" rather
/// than retried or raised.
#[derive(Debug, Default)]
pub struct CodecHost {
    stream_gzip: OnceLock<bool>,
    stream_zlib: OnceLock<bool>,
    stream_deflate_raw: OnceLock<bool>,
    brotli: OnceLock<Option<engine::BrotliEngine>>,
    zstd: OnceLock<Option<engine::ZstdEngine>>,
}

impl CodecHost {
    /// Create a codec host with empty caches
    pub fn new() -> Self {
        Self::default()
    }

    /// Capability probe for a (provider, family) combination
    ///
    /// Idempotent: the first call performs the actual detection (a 4-byte
    /// round trip through the streaming codec, or an engine self-test) and
    /// every later call returns the cached answer.
    pub async fn probe(&self, kind: ProviderKind, family: Family) -> bool {
        match kind {
            ProviderKind::Stream => {
                let cell = match self.stream_cell(family) {
                    Some(cell) => cell,
                    None => return false,
                };
                if let Some(ok) = cell.get() {
                    return *ok;
                }
                let ok = stream::probe_round_trip(family).await;
                debug!(family = family.name(), supported = ok, "stream codec probed");
                *cell.get_or_init(|| ok)
            }
            ProviderKind::Buffer => matches!(family, Family::Deflate | Family::Zlib),
            ProviderKind::BrotliEngine => family == Family::Brotli && self.brotli_engine().is_some(),
            ProviderKind::ZstdEngine => family == Family::Zstd && self.zstd_engine().is_some(),
        }
    }

    /// Compress `data` through the given provider
    ///
    /// `level` is the compression level (or brotli quality) for providers
    /// that support one; level-less providers ignore it.
    ///
    /// # Errors
    ///
    /// - [`BenchError::Unsupported`] - the provider does not handle the
    ///   family, or the engine is unavailable
    /// - [`BenchError::Io`] / [`BenchError::Codec`] - the codec itself failed
    pub async fn compress(
        &self,
        kind: ProviderKind,
        family: Family,
        level: Option<u32>,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        match kind {
            ProviderKind::Stream => stream::compress(family, data).await,
            _ => self.compress_sync(kind, family, level, data),
        }
    }

    /// Decompress `data` through the given provider
    pub async fn decompress(
        &self,
        kind: ProviderKind,
        family: Family,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        match kind {
            ProviderKind::Stream => stream::decompress(family, data).await,
            _ => self.decompress_sync(kind, family, data),
        }
    }

    /// Synchronous compression entry point for the in-process providers
    ///
    /// The streaming provider is excluded here: its transform is driven
    /// asynchronously and must go through [`CodecHost::compress`].
    pub fn compress_sync(
        &self,
        kind: ProviderKind,
        family: Family,
        level: Option<u32>,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        match kind {
            ProviderKind::Stream => Err(BenchError::Unsupported {
                provider: "stream-sync",
                family: family.name(),
            }),
            ProviderKind::Buffer => buffer::compress(family, level.unwrap_or(6), data),
            ProviderKind::BrotliEngine => {
                self.require_brotli(family)?.compress(data, level.unwrap_or(6))
            }
            ProviderKind::ZstdEngine => {
                self.require_zstd(family)?.compress(data, level.unwrap_or(3) as i32)
            }
        }
    }

    /// Synchronous decompression entry point for the in-process providers
    pub fn decompress_sync(
        &self,
        kind: ProviderKind,
        family: Family,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        match kind {
            ProviderKind::Stream => Err(BenchError::Unsupported {
                provider: "stream-sync",
                family: family.name(),
            }),
            ProviderKind::Buffer => buffer::decompress(family, data),
            ProviderKind::BrotliEngine => self.require_brotli(family)?.decompress(data),
            ProviderKind::ZstdEngine => self.require_zstd(family)?.decompress(data),
        }
    }

    fn stream_cell(&self, family: Family) -> Option<&OnceLock<bool>> {
        match family {
            Family::Gzip => Some(&self.stream_gzip),
            Family::Zlib => Some(&self.stream_zlib),
            Family::DeflateRaw => Some(&self.stream_deflate_raw),
            _ => None,
        }
    }

    fn brotli_engine(&self) -> Option<&engine::BrotliEngine> {
        self.brotli.get_or_init(engine::BrotliEngine::init).as_ref()
    }

    fn zstd_engine(&self) -> Option<&engine::ZstdEngine> {
        self.zstd.get_or_init(engine::ZstdEngine::init).as_ref()
    }

    fn require_brotli(&self, family: Family) -> Result<&engine::BrotliEngine> {
        if family != Family::Brotli {
            return Err(BenchError::Unsupported {
                provider: "brotli-engine",
                family: family.name(),
            });
        }
        self.brotli_engine().ok_or(BenchError::Unsupported {
            provider: "brotli-engine",
            family: family.name(),
        })
    }

    fn require_zstd(&self, family: Family) -> Result<&engine::ZstdEngine> {
        if family != Family::Zstd {
            return Err(BenchError::Unsupported {
                provider: "zstd-engine",
                family: family.name(),
            });
        }
        self.zstd_engine().ok_or(BenchError::Unsupported {
            provider: "zstd-engine",
            family: family.name(),
        })
    }
}
