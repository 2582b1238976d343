//! Persistent run history with transparent payload compression
//!
//! Each completed run is stored as one record in a directory-backed
//! key/value store: the file name is the generated id, the content is a
//! one-byte tag followed by the payload. Entries are serialized to JSON
//! with their binary payloads stripped, then gzip-compressed through the
//! streaming codec; if compression fails for any reason the plain JSON is
//! stored instead, silently. Loading tolerates all three shapes - tagged
//! compressed, tagged plain, and legacy untagged JSON - and skips corrupted
//! records rather than failing the whole load.
//!
//! Retention: after every save, entries beyond [`MAX_ENTRIES`] are evicted
//! oldest-first. Ids are timestamp-prefixed, so their lexicographic order is
//! chronological.

use crate::error::Result;
use crate::provider::{Family, ProviderKind};
use crate::provider::stream;
use crate::runner::BenchmarkResult;
use crate::timing::TimingStats;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Prefix shared by all history record ids
pub const HISTORY_PREFIX: &str = "bench_";

/// Maximum number of retained entries; oldest evicted first
pub const MAX_ENTRIES: usize = 50;

/// Record tag: payload is plain JSON
const TAG_PLAIN: u8 = 0;

/// Record tag: payload is gzip-compressed JSON
const TAG_GZIP: u8 = 1;

/// Length of the random id suffix
const ID_SUFFIX_LEN: usize = 6;

/// Metadata describing the benchmarked input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// Original file name
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// Content type, e.g. `"application/octet-stream"`
    pub content_type: String,
    /// Hex digest of the file content
    pub digest: String,
}

/// Binary-stripped projection of a [`BenchmarkResult`]
///
/// This is the shape that persists; the compressed payload is deliberately
/// absent (it is reconstructable by re-running the benchmark).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub algorithm: String,
    pub family: Family,
    pub original_size: u64,
    pub compressed_size: u64,
    pub compression_ratio: f64,
    pub compression_loss_pct: f64,
    pub compress_time: TimingStats,
    pub decompress_time: TimingStats,
    pub throughput_compress: f64,
    pub throughput_decompress: f64,
    pub verified: bool,
    pub extension: String,
    pub level: Option<u32>,
    pub iterations: u32,
    pub provider: ProviderKind,
    pub provider_label: String,
}

impl From<&BenchmarkResult> for StoredResult {
    fn from(r: &BenchmarkResult) -> Self {
        Self {
            algorithm: r.algorithm.clone(),
            family: r.family,
            original_size: r.original_size,
            compressed_size: r.compressed_size,
            compression_ratio: r.compression_ratio,
            compression_loss_pct: r.compression_loss_pct,
            compress_time: r.compress_time,
            decompress_time: r.decompress_time,
            throughput_compress: r.throughput_compress,
            throughput_decompress: r.throughput_decompress,
            verified: r.verified,
            extension: r.extension.clone(),
            level: r.level,
            iterations: r.iterations,
            provider: r.provider,
            provider_label: r.provider_label.clone(),
        }
    }
}

/// One completed benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Generated record id (also the storage key)
    pub id: String,
    /// Save time, milliseconds since the Unix epoch
    pub timestamp_ms: u64,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub file_digest: String,
    /// Iteration count the run actually used
    pub iterations_used: u32,
    /// Results in execution order, payloads stripped
    pub results: Vec<StoredResult>,
}

/// Directory-backed history store
///
/// # Examples
///
/// ```no_run
/// use compress_bench::history::HistoryStore;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), compress_bench::BenchError> {
/// let store = HistoryStore::new(".compress-bench/history");
/// let entries = store.load().await?;
/// for entry in &entries {
///     println!("{}: {} ({} results)", entry.id, entry.file_name, entry.results.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    /// Create a store rooted at `dir` (created lazily on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist one completed run and return its generated id
    ///
    /// Strips payloads, serializes, compresses (with silent fallback to
    /// plain storage) and evicts entries beyond the retention cap.
    pub async fn save(
        &self,
        meta: &FileMeta,
        iterations_used: u32,
        results: &[BenchmarkResult],
    ) -> Result<String> {
        fs::create_dir_all(&self.dir)?;

        let timestamp_ms = unix_millis();
        let id = generate_id(timestamp_ms);
        let entry = HistoryEntry {
            id: id.clone(),
            timestamp_ms,
            file_name: meta.name.clone(),
            file_size: meta.size,
            file_type: meta.content_type.clone(),
            file_digest: meta.digest.clone(),
            iterations_used,
            results: results.iter().map(StoredResult::from).collect(),
        };

        let encoded = serde_json::to_vec(&entry)?;
        let record = match stream::compress(Family::Gzip, &encoded).await {
            Ok(packed) => {
                debug!(
                    id = %id,
                    plain = encoded.len(),
                    stored = packed.len(),
                    "history entry compressed"
                );
                tag_record(TAG_GZIP, &packed)
            }
            Err(e) => {
                warn!(id = %id, error = %e, "history compression failed, storing plain");
                tag_record(TAG_PLAIN, &encoded)
            }
        };

        fs::write(self.dir.join(&id), record)?;
        info!(id = %id, results = results.len(), "history entry saved");

        self.evict_excess()?;
        Ok(id)
    }

    /// Load all entries, newest first
    ///
    /// Corrupted or unreadable records are skipped with a warning; they
    /// never fail the load.
    pub async fn load(&self) -> Result<Vec<HistoryEntry>> {
        let mut entries = Vec::new();
        for id in self.record_ids()? {
            let raw = match fs::read(self.dir.join(&id)) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(id = %id, error = %e, "unreadable history record skipped");
                    continue;
                }
            };
            match decode_record(&raw).await {
                Some(entry) => entries.push(entry),
                None => warn!(id = %id, "corrupted history record skipped"),
            }
        }
        entries.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        Ok(entries)
    }

    /// Delete a single entry; missing ids are not an error
    pub fn delete(&self, id: &str) -> Result<()> {
        match fs::remove_file(self.dir.join(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete every stored entry
    pub fn clear_all(&self) -> Result<()> {
        for id in self.record_ids()? {
            self.delete(&id)?;
        }
        Ok(())
    }

    /// All record ids in this store, sorted ascending (chronological)
    fn record_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let read = match fs::read_dir(&self.dir) {
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(e) => return Err(e.into()),
        };
        for dirent in read {
            let dirent = dirent?;
            if let Some(name) = dirent.file_name().to_str() {
                if name.starts_with(HISTORY_PREFIX) {
                    ids.push(name.to_string());
                }
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    /// Drop the oldest entries until at most [`MAX_ENTRIES`] remain
    fn evict_excess(&self) -> Result<()> {
        let ids = self.record_ids()?;
        if ids.len() <= MAX_ENTRIES {
            return Ok(());
        }
        let excess = ids.len() - MAX_ENTRIES;
        for id in &ids[..excess] {
            info!(id = %id, "evicting history entry beyond retention cap");
            self.delete(id)?;
        }
        Ok(())
    }
}

/// Decode one raw record into an entry, tolerating every known layout
async fn decode_record(raw: &[u8]) -> Option<HistoryEntry> {
    let (tag, payload) = raw.split_first()?;
    match *tag {
        TAG_GZIP => {
            // Fall back to reading the payload as plain JSON when the gzip
            // layer is damaged but the content survived
            let json = match stream::decompress(Family::Gzip, payload).await {
                Ok(json) => json,
                Err(_) => payload.to_vec(),
            };
            serde_json::from_slice(&json).ok()
        }
        TAG_PLAIN => serde_json::from_slice(payload).ok(),
        // Legacy records were written without a tag byte
        b'{' => serde_json::from_slice(raw).ok(),
        _ => None,
    }
}

fn tag_record(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut record = Vec::with_capacity(payload.len() + 1);
    record.push(tag);
    record.extend_from_slice(payload);
    record
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Generate a record id: prefix, millisecond timestamp, random suffix
///
/// Not collision-proof; two saves in the same millisecond with a repeated
/// random draw would collide, which is accepted as negligible.
fn generate_id(timestamp_ms: u64) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect();
    format!("{}{}_{}", HISTORY_PREFIX, timestamp_ms, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id(1_700_000_000_123);
        assert!(id.starts_with("bench_1700000000123_"));
        assert_eq!(id.len(), HISTORY_PREFIX.len() + 13 + 1 + ID_SUFFIX_LEN);
    }

    #[test]
    fn test_ids_sort_chronologically() {
        let older = generate_id(1_700_000_000_000);
        let newer = generate_id(1_700_000_000_001);
        assert!(older < newer);
    }

    #[tokio::test]
    async fn test_decode_record_plain_tag() {
        let entry = HistoryEntry {
            id: "bench_1_aaaaaa".into(),
            timestamp_ms: 1,
            file_name: "f".into(),
            file_size: 0,
            file_type: "t".into(),
            file_digest: "d".into(),
            iterations_used: 3,
            results: vec![],
        };
        let json = serde_json::to_vec(&entry).unwrap();
        let record = tag_record(TAG_PLAIN, &json);
        assert_eq!(decode_record(&record).await.unwrap(), entry);
    }

    #[tokio::test]
    async fn test_decode_record_legacy_untagged() {
        let entry = HistoryEntry {
            id: "bench_2_bbbbbb".into(),
            timestamp_ms: 2,
            file_name: "f".into(),
            file_size: 0,
            file_type: "t".into(),
            file_digest: "d".into(),
            iterations_used: 1,
            results: vec![],
        };
        let json = serde_json::to_vec(&entry).unwrap();
        assert_eq!(decode_record(&json).await.unwrap(), entry);
    }

    #[tokio::test]
    async fn test_decode_record_garbage() {
        assert!(decode_record(&[0xff, 0x00, 0x12]).await.is_none());
        assert!(decode_record(&[]).await.is_none());
    }
}
