//! Transform cache for incremental builds.
//!
//! Re-encoding is the expensive part of the pipeline, so transformed bytes
//! are memoized in a single on-disk index keyed by source identity plus the
//! full directive.
//!
//! # Design
//!
//! ## Cache keys
//!
//! A [`CacheKey`] is the SHA-256 of the absolute source path, a canonical
//! serialization of the full query annotation, and the source file's stat
//! snapshot (size + mtime). Any change to the source bytes or the directive
//! changes the key; nothing else — not process run order, not machine state
//! — can. A changed source produces a *new* key, never a mutation of an
//! existing entry.
//!
//! ## Storage
//!
//! The index is one JSON file, `resize-index.json`, in the cache directory:
//! `{"version": N, "entries": {key: base64-bytes, ...}}`. [`ResizeCache::open`]
//! is tolerant — a missing file, unparsable JSON, or a version mismatch all
//! load as an empty index. [`ResizeCache::get`] treats an undecodable payload
//! as a miss, never an error: the worst a corrupt cache can do is cost one
//! re-encode.
//!
//! ## Durability
//!
//! `insert` mutates only the in-memory index; call [`ResizeCache::flush`]
//! after every insert, because the host build process may exit without a
//! clean shutdown hook. There is no locking across processes: two processes
//! racing to flush keep the last snapshot written. Within one process the
//! dispatcher serializes flushes behind a mutex.
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to the `process` command to start from an empty index
//! ([`ResizeCache::open_empty`]); fresh entries are still recorded and
//! flushed, so the next cached run starts warm.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Name of the cache index file within the cache directory.
const INDEX_FILENAME: &str = "resize-index.json";

/// Version of the cache index format. Bump this to invalidate all existing
/// caches when the format or key computation changes.
const INDEX_VERSION: u32 = 1;

/// Opaque identity of a (source file, directive) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a source path and its full query annotation.
    ///
    /// Exactly one stat call; an inaccessible file is the caller's failure
    /// to propagate, not something to retry here.
    pub fn for_source(path: &Path, query: &BTreeMap<String, String>) -> io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let mtime_nanos = meta
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(path.as_os_str().as_encoded_bytes());
        hasher.update(b"?");
        hasher.update(canonical_query(query).as_bytes());
        hasher.update(format!("&len={}&mtime={}", meta.len(), mtime_nanos).as_bytes());
        Ok(Self(format!("{:x}", hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Canonical serialization of a query map: `k=v` pairs joined with `&` in
/// sorted key order (which a `BTreeMap` iterates naturally).
fn canonical_query(query: &BTreeMap<String, String>) -> String {
    query
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Serialized shape of the on-disk index.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct CacheIndex {
    version: u32,
    /// key → base64-encoded transformed bytes.
    entries: HashMap<String, String>,
}

impl CacheIndex {
    fn empty() -> Self {
        Self {
            version: INDEX_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// Persistent key→bytes store backed by a single JSON index file.
///
/// Entries are created on first transform, never updated in place, never
/// individually deleted — the index grows monotonically unless the cache
/// directory is deleted out-of-band.
#[derive(Debug)]
pub struct ResizeCache {
    dir: PathBuf,
    index: CacheIndex,
}

impl ResizeCache {
    /// Load the index from `dir`. A missing file, unparsable JSON, or a
    /// version mismatch all yield an empty index.
    pub fn open(dir: &Path) -> Self {
        let index = match std::fs::read_to_string(index_path(dir)) {
            Ok(content) => match serde_json::from_str::<CacheIndex>(&content) {
                Ok(index) if index.version == INDEX_VERSION => index,
                _ => CacheIndex::empty(),
            },
            Err(_) => CacheIndex::empty(),
        };
        Self {
            dir: dir.to_path_buf(),
            index,
        }
    }

    /// Start from an empty index regardless of what's on disk (`--no-cache`).
    /// Fresh entries are still recorded and persisted on flush.
    pub fn open_empty(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            index: CacheIndex::empty(),
        }
    }

    /// Look up cached bytes. An absent key *or* an undecodable payload is a
    /// miss — corrupt entries never surface as errors.
    pub fn get(&self, key: &CacheKey) -> Option<Vec<u8>> {
        let payload = self.index.entries.get(key.as_str())?;
        BASE64.decode(payload).ok()
    }

    /// Record transformed bytes under a key. In-memory only; not durable
    /// until [`flush`](Self::flush).
    pub fn insert(&mut self, key: &CacheKey, bytes: &[u8]) {
        self.index
            .entries
            .insert(key.as_str().to_string(), BASE64.encode(bytes));
    }

    /// Serialize the whole index back to disk, creating the cache directory
    /// if needed.
    pub fn flush(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&self.index)?;
        std::fs::write(index_path(&self.dir), json)
    }

    /// Number of entries currently in the index.
    pub fn len(&self) -> usize {
        self.index.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.entries.is_empty()
    }
}

/// Resolve the index file path for a cache directory.
pub fn index_path(dir: &Path) -> PathBuf {
    dir.join(INDEX_FILENAME)
}
