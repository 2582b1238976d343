//! Streaming codec provider backed by flate2
//!
//! Re-expresses a push/pull streaming transform: input is fed to the encoder
//! in fixed-size chunks with a cooperative yield between chunks, so a large
//! payload never monopolizes the executor. The codec runs at its default
//! compression setting; this provider intentionally exposes no levels.

use crate::error::{BenchError, Result};
use crate::provider::Family;
use flate2::write::{DeflateDecoder, DeflateEncoder, GzDecoder, GzEncoder, ZlibDecoder, ZlibEncoder};
use flate2::Compression;
use std::io::Write;
use tracing::trace;

/// Chunk size used when feeding the transform
const CHUNK_SIZE: usize = 64 * 1024;

/// Sample fed through the codec by the capability probe
const PROBE_SAMPLE: [u8; 4] = [1, 2, 3, 4];

/// Compress `data` with the streaming codec for `family`
pub(crate) async fn compress(family: Family, data: &[u8]) -> Result<Vec<u8>> {
    trace!(family = family.name(), input_size = data.len(), "stream compress");
    match family {
        Family::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            feed(&mut encoder, data).await?;
            Ok(encoder.finish()?)
        }
        Family::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            feed(&mut encoder, data).await?;
            Ok(encoder.finish()?)
        }
        Family::DeflateRaw => {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            feed(&mut encoder, data).await?;
            Ok(encoder.finish()?)
        }
        _ => Err(BenchError::Unsupported {
            provider: "stream",
            family: family.name(),
        }),
    }
}

/// Decompress `data` with the streaming codec for `family`
pub(crate) async fn decompress(family: Family, data: &[u8]) -> Result<Vec<u8>> {
    trace!(family = family.name(), input_size = data.len(), "stream decompress");
    match family {
        Family::Gzip => {
            let mut decoder = GzDecoder::new(Vec::new());
            feed(&mut decoder, data).await?;
            Ok(decoder.finish()?)
        }
        Family::Zlib => {
            let mut decoder = ZlibDecoder::new(Vec::new());
            feed(&mut decoder, data).await?;
            Ok(decoder.finish()?)
        }
        Family::DeflateRaw => {
            let mut decoder = DeflateDecoder::new(Vec::new());
            feed(&mut decoder, data).await?;
            Ok(decoder.finish()?)
        }
        _ => Err(BenchError::Unsupported {
            provider: "stream",
            family: family.name(),
        }),
    }
}

/// Round-trip a 4-byte sample to verify the codec actually works
///
/// A family is only reported as supported if compression yields output and
/// that output decompresses back to the sample. Any failure along the way
/// counts as unsupported, never as an error.
pub(crate) async fn probe_round_trip(family: Family) -> bool {
    let packed = match compress(family, &PROBE_SAMPLE).await {
        Ok(packed) if !packed.is_empty() => packed,
        _ => return false,
    };
    matches!(decompress(family, &packed).await, Ok(out) if out == PROBE_SAMPLE)
}

/// Feed `data` into the transform in chunks, yielding between chunks
async fn feed<W: Write>(sink: &mut W, data: &[u8]) -> Result<()> {
    for chunk in data.chunks(CHUNK_SIZE) {
        sink.write_all(chunk)?;
        tokio::task::yield_now().await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gzip_round_trip() {
        let data = vec![0u8; 10_000];
        let packed = compress(Family::Gzip, &data).await.unwrap();
        assert!(packed.len() < data.len());
        let unpacked = decompress(Family::Gzip, &packed).await.unwrap();
        assert_eq!(data, unpacked);
    }

    #[tokio::test]
    async fn test_multi_chunk_input() {
        // Larger than two chunks to exercise the yield path
        let data: Vec<u8> = (0..CHUNK_SIZE * 2 + 17).map(|i| (i % 256) as u8).collect();
        let packed = compress(Family::Zlib, &data).await.unwrap();
        let unpacked = decompress(Family::Zlib, &packed).await.unwrap();
        assert_eq!(data, unpacked);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let packed = compress(Family::DeflateRaw, &[]).await.unwrap();
        assert!(!packed.is_empty());
        let unpacked = decompress(Family::DeflateRaw, &packed).await.unwrap();
        assert!(unpacked.is_empty());
    }

    #[tokio::test]
    async fn test_probe_rejects_unframed_families() {
        assert!(probe_round_trip(Family::Gzip).await);
        assert!(!probe_round_trip(Family::Brotli).await);
        assert!(!probe_round_trip(Family::Zstd).await);
    }

    #[tokio::test]
    async fn test_corrupt_input_fails() {
        let result = decompress(Family::Gzip, &[0xde, 0xad, 0xbe, 0xef]).await;
        assert!(result.is_err());
    }
}
