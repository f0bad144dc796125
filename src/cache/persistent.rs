//! Persistent Store Module
//!
//! Durable cache tier behind a capability trait, with a disk-backed
//! implementation and a no-op fallback for environments without storage.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cache::entry::CacheEntry;
use crate::cache::STORAGE_PREFIX;

// == Store Info ==
/// Size snapshot of the persistent tier.
#[derive(Debug, Clone, Serialize)]
pub struct StoreInfo {
    /// Number of entries owned by this application
    pub size: usize,
    /// Total serialized size in bytes
    pub total_bytes: u64,
}

// == Persistent Store Trait ==
/// Durable key-value tier scoped to this application's prefix.
///
/// Implementations must never propagate storage or serialization
/// failures: they log and degrade to absent/no-op so the fetch path keeps
/// working on the memory tier alone.
pub trait PersistentStore: Send + Sync {
    /// Stores an entry under the key.
    fn set(&self, key: &str, entry: &CacheEntry);

    /// Returns the entry if present and not expired; expired entries are
    /// removed before returning absent.
    fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Raw read ignoring TTL; never deletes. Stale-fallback accessor.
    fn peek(&self, key: &str) -> Option<CacheEntry>;

    /// Removes an entry by key.
    fn delete(&self, key: &str);

    /// Removes every entry owned by this application, leaving unrelated
    /// data in the same storage scope untouched.
    fn clear(&self);

    /// All keys currently stored.
    fn keys(&self) -> Vec<String>;

    /// Returns the current size snapshot.
    fn info(&self) -> StoreInfo;
}

// == Persisted Record ==
/// On-disk record: the entry layout plus the exact cache key, so scans
/// never depend on decoding filenames.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedRecord {
    key: String,
    #[serde(flatten)]
    entry: CacheEntry,
}

// == Disk Store ==
/// File-per-entry store under a fixed directory.
///
/// Filenames carry the `spm_cache_` prefix so `clear` can identify this
/// application's files inside a shared directory. The directory may be
/// shared by several processes; there is no cross-process invalidation
/// signal, so staleness across processes is bounded only by TTL.
#[derive(Debug)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    // == Constructor ==
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(err) = fs::create_dir_all(&dir) {
            warn!(dir = %dir.display(), %err, "persistent cache dir unavailable");
        }
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{STORAGE_PREFIX}{}.json", sanitize_key(key)))
    }

    fn read_record(path: &Path) -> Option<PersistedRecord> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %path.display(), %err, "persistent cache read failed");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(path = %path.display(), %err, "discarding corrupt cache file");
                let _ = fs::remove_file(path);
                None
            }
        }
    }

    fn owned_files(&self) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %self.dir.display(), %err, "persistent cache scan failed");
                return Vec::new();
            }
        };
        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(STORAGE_PREFIX))
            })
            .collect()
    }
}

impl PersistentStore for DiskStore {
    fn set(&self, key: &str, entry: &CacheEntry) {
        let record = PersistedRecord {
            key: key.to_string(),
            entry: entry.clone(),
        };
        let encoded = match serde_json::to_vec(&record) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(key, %err, "persistent cache set failed");
                return;
            }
        };

        // Write through a temp file so readers never see partial records.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let written = fs::write(&tmp, &encoded).and_then(|()| fs::rename(&tmp, &path));
        if let Err(err) = written {
            warn!(key, %err, "persistent cache set failed");
            let _ = fs::remove_file(&tmp);
        }
    }

    fn get(&self, key: &str) -> Option<CacheEntry> {
        let path = self.path_for(key);
        let record = Self::read_record(&path)?;
        if record.entry.is_expired() {
            let _ = fs::remove_file(&path);
            return None;
        }
        Some(record.entry)
    }

    fn peek(&self, key: &str) -> Option<CacheEntry> {
        Self::read_record(&self.path_for(key)).map(|record| record.entry)
    }

    fn delete(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(err) = fs::remove_file(&path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(key, %err, "persistent cache delete failed");
            }
        }
    }

    fn clear(&self) {
        for path in self.owned_files() {
            if let Err(err) = fs::remove_file(&path) {
                warn!(path = %path.display(), %err, "persistent cache clear failed");
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        self.owned_files()
            .iter()
            .filter_map(|path| Self::read_record(path))
            .map(|record| record.key)
            .collect()
    }

    fn info(&self) -> StoreInfo {
        let files = self.owned_files();
        let total_bytes = files
            .iter()
            .filter_map(|path| fs::metadata(path).ok())
            .map(|meta| meta.len())
            .sum();
        StoreInfo {
            size: files.len(),
            total_bytes,
        }
    }
}

// == Null Store ==
/// No-op store for execution contexts without durable storage.
///
/// Every read returns absent and every write is dropped, leaving the
/// memory tier as the only cache.
#[derive(Debug, Default)]
pub struct NullStore;

impl PersistentStore for NullStore {
    fn set(&self, _key: &str, _entry: &CacheEntry) {}

    fn get(&self, _key: &str) -> Option<CacheEntry> {
        None
    }

    fn peek(&self, _key: &str) -> Option<CacheEntry> {
        None
    }

    fn delete(&self, _key: &str) {}

    fn clear(&self) {}

    fn keys(&self) -> Vec<String> {
        Vec::new()
    }

    fn info(&self) -> StoreInfo {
        StoreInfo {
            size: 0,
            total_bytes: 0,
        }
    }
}

// == Filename Sanitizer ==
/// Maps a cache key to a filesystem-safe name. `%` escapes keep distinct
/// keys distinct.
fn sanitize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for ch in key.chars() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '.' | '=' | '&' | '-' => out.push(ch),
            _ => {
                let mut buf = [0u8; 4];
                for byte in ch.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    out
}
