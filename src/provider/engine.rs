//! Lazily-initialized heavy codec engines (brotli, zstd)
//!
//! Each engine is an explicitly owned handle created at most once per
//! [`CodecHost`](crate::provider::CodecHost). Construction runs a small
//! round-trip self-test; if that fails the engine is recorded as unavailable
//! and never retried, and tasks routed to it are skipped rather than failing
//! the run.

use crate::error::{BenchError, Result};
use std::io::{Read, Write};
use tracing::{debug, warn};

/// Sample used by the engine self-tests
const SELF_TEST_SAMPLE: [u8; 4] = [1, 2, 3, 4];

/// Brotli window size (log2) used for all compress calls
const BROTLI_LG_WINDOW: u32 = 22;

/// Internal buffer size for the brotli reader/writer adapters
const BROTLI_BUFFER: usize = 4096;

/// Handle proving the brotli codec initialized and passed its self-test
#[derive(Debug)]
pub(crate) struct BrotliEngine(());

impl BrotliEngine {
    /// Initialize the engine, swallowing any failure
    pub(crate) fn init() -> Option<Self> {
        let engine = BrotliEngine(());
        match engine
            .compress(&SELF_TEST_SAMPLE, 5)
            .and_then(|packed| engine.decompress(&packed))
        {
            Ok(out) if out == SELF_TEST_SAMPLE => {
                debug!("brotli engine initialized");
                Some(engine)
            }
            Ok(_) => {
                warn!("brotli engine self-test produced wrong output, disabling");
                None
            }
            Err(e) => {
                warn!(error = %e, "brotli engine self-test failed, disabling");
                None
            }
        }
    }

    /// Compress at the given quality (0-11)
    pub(crate) fn compress(&self, data: &[u8], quality: u32) -> Result<Vec<u8>> {
        let quality = quality.min(11);
        let mut out = Vec::new();
        {
            let mut writer =
                brotli::CompressorWriter::new(&mut out, BROTLI_BUFFER, quality, BROTLI_LG_WINDOW);
            writer.write_all(data)?;
            writer.flush()?;
        }
        Ok(out)
    }

    /// Decompress a brotli stream
    pub(crate) fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        brotli::Decompressor::new(data, BROTLI_BUFFER)
            .read_to_end(&mut out)
            .map_err(|e| BenchError::Codec(format!("brotli decompression failed: {}", e)))?;
        Ok(out)
    }
}

/// Handle proving the zstd codec initialized and passed its self-test
#[derive(Debug)]
pub(crate) struct ZstdEngine(());

impl ZstdEngine {
    /// Initialize the engine, swallowing any failure
    pub(crate) fn init() -> Option<Self> {
        let engine = ZstdEngine(());
        match engine
            .compress(&SELF_TEST_SAMPLE, 3)
            .and_then(|packed| engine.decompress(&packed))
        {
            Ok(out) if out == SELF_TEST_SAMPLE => {
                debug!("zstd engine initialized");
                Some(engine)
            }
            Ok(_) => {
                warn!("zstd engine self-test produced wrong output, disabling");
                None
            }
            Err(e) => {
                warn!(error = %e, "zstd engine self-test failed, disabling");
                None
            }
        }
    }

    /// Compress at the given level (1-22)
    pub(crate) fn compress(&self, data: &[u8], level: i32) -> Result<Vec<u8>> {
        zstd::encode_all(data, level)
            .map_err(|e| BenchError::Codec(format!("zstd compression failed: {}", e)))
    }

    /// Decompress a zstd frame
    pub(crate) fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        zstd::decode_all(data)
            .map_err(|e| BenchError::Codec(format!("zstd decompression failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brotli_init_and_round_trip() {
        let engine = BrotliEngine::init().expect("brotli engine should initialize");
        let data: Vec<u8> = (0..8000).map(|i| (i % 64) as u8).collect();
        let packed = engine.compress(&data, 6).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(data, engine.decompress(&packed).unwrap());
    }

    #[test]
    fn test_brotli_quality_clamped() {
        let engine = BrotliEngine::init().unwrap();
        let data = vec![9u8; 1000];
        let packed = engine.compress(&data, 99).unwrap();
        assert_eq!(data, engine.decompress(&packed).unwrap());
    }

    #[test]
    fn test_zstd_init_and_round_trip() {
        let engine = ZstdEngine::init().expect("zstd engine should initialize");
        let data: Vec<u8> = (0..8000).map(|i| (i % 64) as u8).collect();
        let packed = engine.compress(&data, 5).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(data, engine.decompress(&packed).unwrap());
    }

    #[test]
    fn test_zstd_corrupt_input() {
        let engine = ZstdEngine::init().unwrap();
        assert!(engine.decompress(&[0x12, 0x34, 0x56]).is_err());
    }
}
