//! Rendered feed storage.
//!
//! - `FileCache`: one JSON file per entry, named by the blake3 digest of
//!   the key, written to a temporary file and renamed into place
//! - `MemoryCache`: process-local map
//!
//! Entries are never mutated; a rebuild replaces the whole entry.

use crate::config::{CacheBackend, CacheConfig};
use crate::debug;
use crate::freshness::mtime::mtime_nanos;
use crate::utils::hash::digest_hex;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// Entry
// ============================================================================

/// A watched file and its mtime when the entry was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub path: PathBuf,
    /// `None` when the file was missing.
    pub mtime: Option<u64>,
}

impl Dependency {
    /// Snapshot the current mtime of `path`.
    pub fn observe(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            mtime: mtime_nanos(path),
        }
    }

    /// Whether the file changed since it was observed.
    pub fn changed(&self) -> bool {
        mtime_nanos(&self.path) != self.mtime
    }
}

/// One rendered feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    /// Unix seconds.
    pub stored_at: i64,
    /// Seconds the entry stays fresh.
    pub max_age: u64,
    pub dependencies: Vec<Dependency>,
    pub body: String,
}

impl CacheEntry {
    pub fn new(key: &str, body: String, deps: &[PathBuf], max_age: u64, now: i64) -> Self {
        Self {
            key: key.to_string(),
            stored_at: now,
            max_age,
            dependencies: deps.iter().map(|p| Dependency::observe(p)).collect(),
            body,
        }
    }

    /// Strong validator derived from the store time.
    pub fn etag(&self) -> String {
        format!("\"{}\"", digest_hex(&self.stored_at.to_string()))
    }
}

// ============================================================================
// Stores
// ============================================================================

/// Key -> entry storage shared by all requests.
pub trait CacheStore: Send + Sync {
    /// Stored entry for `key`. Unreadable or corrupt entries are misses.
    fn load(&self, key: &str) -> Option<CacheEntry>;

    /// Replace the entry for `entry.key`. Readers never see a partial write.
    fn store(&self, entry: &CacheEntry) -> io::Result<()>;

    /// Human-readable location of an entry (for diagnostics headers).
    fn location(&self, key: &str) -> String;
}

/// Store selected by `[cache].backend`.
pub fn open(config: &CacheConfig) -> Arc<dyn CacheStore> {
    match config.backend {
        CacheBackend::File => Arc::new(FileCache::new(&config.dir)),
        CacheBackend::Memory => Arc::new(MemoryCache::default()),
    }
}

/// Entries as JSON files in one directory.
#[derive(Debug)]
pub struct FileCache {
    dir: PathBuf,
    tmp_counter: AtomicU64,
}

impl FileCache {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            tmp_counter: AtomicU64::new(0),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", digest_hex(key)))
    }

    fn tmp_path(&self) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!(".tmp-{}-{}.json", std::process::id(), n))
    }
}

impl CacheStore for FileCache {
    fn load(&self, key: &str) -> Option<CacheEntry> {
        let path = self.path_for(key);
        let content = fs::read(&path).ok()?;
        match serde_json::from_slice::<CacheEntry>(&content) {
            Ok(entry) if entry.key == key => Some(entry),
            Ok(_) => {
                debug!("cache"; "key mismatch in {}", path.display());
                None
            }
            Err(e) => {
                debug!("cache"; "corrupt entry {}: {}", path.display(), e);
                None
            }
        }
    }

    fn store(&self, entry: &CacheEntry) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec(entry).map_err(io::Error::other)?;

        let tmp = self.tmp_path();
        if let Err(e) = fs::write(&tmp, json) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, self.path_for(&entry.key)).inspect_err(|_| {
            let _ = fs::remove_file(&tmp);
        })
    }

    fn location(&self, key: &str) -> String {
        self.path_for(key).display().to_string()
    }
}

/// Entries in a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
}

impl CacheStore for MemoryCache {
    fn load(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).map(|e| e.value().clone())
    }

    fn store(&self, entry: &CacheEntry) -> io::Result<()> {
        self.entries.insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("memory:{}", digest_hex(key))
    }
}
