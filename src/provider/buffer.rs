//! Pure-library buffer codec provider backed by miniz_oxide
//!
//! One-shot, synchronous compression directly on byte buffers. Always
//! available (no probe needed) and the only deflate-family provider that
//! exposes explicit compression levels (1-9).

use crate::error::{BenchError, Result};
use crate::provider::Family;
use miniz_oxide::deflate::{compress_to_vec, compress_to_vec_zlib};
use miniz_oxide::inflate::{decompress_to_vec, decompress_to_vec_zlib};
use tracing::trace;

/// Compress `data` at the given level (1-9)
pub(crate) fn compress(family: Family, level: u32, data: &[u8]) -> Result<Vec<u8>> {
    trace!(
        family = family.name(),
        level,
        input_size = data.len(),
        "buffer compress"
    );
    let level = level.min(10) as u8;
    match family {
        Family::Deflate => Ok(compress_to_vec(data, level)),
        Family::Zlib => Ok(compress_to_vec_zlib(data, level)),
        _ => Err(BenchError::Unsupported {
            provider: "buffer",
            family: family.name(),
        }),
    }
}

/// Decompress `data` previously produced by this provider
pub(crate) fn decompress(family: Family, data: &[u8]) -> Result<Vec<u8>> {
    trace!(family = family.name(), input_size = data.len(), "buffer decompress");
    match family {
        Family::Deflate => decompress_to_vec(data)
            .map_err(|e| BenchError::Codec(format!("deflate inflate failed: {}", e))),
        Family::Zlib => decompress_to_vec_zlib(data)
            .map_err(|e| BenchError::Codec(format!("zlib inflate failed: {}", e))),
        _ => Err(BenchError::Unsupported {
            provider: "buffer",
            family: family.name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deflate_round_trip() {
        let data = vec![7u8; 5000];
        let packed = compress(Family::Deflate, 6, &data).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(data, decompress(Family::Deflate, &packed).unwrap());
    }

    #[test]
    fn test_zlib_round_trip() {
        let data: Vec<u8> = (0..3000).map(|i| (i % 100) as u8).collect();
        let packed = compress(Family::Zlib, 9, &data).unwrap();
        assert_eq!(data, decompress(Family::Zlib, &packed).unwrap());
    }

    #[test]
    fn test_level_ordering() {
        let data: Vec<u8> = (0..20_000).map(|i| (i / 200) as u8).collect();
        let fast = compress(Family::Deflate, 1, &data).unwrap();
        let best = compress(Family::Deflate, 9, &data).unwrap();
        assert!(best.len() <= fast.len());
    }

    #[test]
    fn test_unsupported_family() {
        assert!(compress(Family::Gzip, 6, b"x").is_err());
        assert!(decompress(Family::Brotli, b"x").is_err());
    }

    #[test]
    fn test_corrupt_input_is_codec_error() {
        let err = decompress(Family::Zlib, &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, BenchError::Codec(_)));
    }
}
