//! Key-value stores backing the response cache.
//!
//! [`FileStore`] keeps one JSON file per key on disk and is what the SDK uses
//! by default; [`MemoryStore`] lives only as long as the process. Both accept
//! an optional byte quota, past which writes fail the way a full browser
//! storage area would.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{PriceError, Result};

/// Minimal fallible string store.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

fn storage_err(context: &str, e: impl std::fmt::Display) -> PriceError {
    PriceError::Storage(format!("{}: {}", context, e))
}

fn quota_exceeded(needed: u64, quota: u64) -> PriceError {
    PriceError::Storage(format!(
        "quota exceeded: {} bytes needed, {} allowed",
        needed, quota
    ))
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

const FILE_SUFFIX: &str = ".json";

/// Stores each key as `<dir>/<percent-encoded key>.json`.
///
/// Writes go through a temp file in the same directory and are renamed into
/// place, so a reader never sees a half-written entry.
pub struct FileStore {
    dir: PathBuf,
    quota: Option<u64>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| storage_err("create cache dir", e))?;
        Ok(Self { dir, quota: None })
    }

    /// Limit the total size of stored values to `bytes`.
    pub fn with_quota(mut self, bytes: u64) -> Self {
        self.quota = Some(bytes);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", urlencoding::encode(key), FILE_SUFFIX))
    }

    fn used_bytes_except(&self, skip: &Path) -> Result<u64> {
        let mut total = 0;
        for entry in fs::read_dir(&self.dir).map_err(|e| storage_err("read cache dir", e))? {
            let entry = entry.map_err(|e| storage_err("read cache dir", e))?;
            let path = entry.path();
            if path == skip || !is_entry_file(&path) {
                continue;
            }
            total += entry
                .metadata()
                .map_err(|e| storage_err("stat cache entry", e))?
                .len();
        }
        Ok(total)
    }
}

fn is_entry_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(FILE_SUFFIX))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_err("read cache entry", e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_except(&path)? + value.len() as u64;
            if needed > quota {
                return Err(quota_exceeded(needed, quota));
            }
        }

        let mut tmp =
            NamedTempFile::new_in(&self.dir).map_err(|e| storage_err("create temp file", e))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| storage_err("write cache entry", e))?;
        tmp.persist(&path)
            .map_err(|e| storage_err("persist cache entry", e))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err("remove cache entry", e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(|e| storage_err("read cache dir", e))? {
            let entry = entry.map_err(|e| storage_err("read cache dir", e))?;
            let file_name = entry.file_name();
            let Some(encoded) = file_name
                .to_str()
                .and_then(|n| n.strip_suffix(FILE_SUFFIX))
            else {
                continue;
            };
            if let Ok(key) = urlencoding::decode(encoded) {
                keys.push(key.into_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store, mostly useful for tests and short-lived hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of stored values to `bytes`.
    pub fn with_quota(mut self, bytes: u64) -> Self {
        self.quota = Some(bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            let used: u64 = self
                .entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len() as u64)
                .sum();
            let needed = used + value.len() as u64;
            if needed > quota {
                return Err(quota_exceeded(needed, quota));
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_non_ascii_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path()).unwrap();
        store.set("eve_price_cache_伊甸币", "{\"a\":1}").unwrap();
        assert_eq!(
            store.get("eve_price_cache_伊甸币").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert_eq!(store.keys().unwrap(), ["eve_price_cache_伊甸币"]);
    }

    #[test]
    fn file_store_remove_missing_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path()).unwrap();
        store.remove("nope").unwrap();
        assert!(store.get("nope").unwrap().is_none());
    }

    #[test]
    fn file_store_quota_rejects_oversized_write() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path()).unwrap().with_quota(10);
        store.set("a", "12345").unwrap();
        // Overwriting the same key does not count its old value.
        store.set("a", "1234567890").unwrap();
        let err = store.set("b", "x").unwrap_err();
        assert!(matches!(err, PriceError::Storage(_)));
        assert!(store.get("b").unwrap().is_none());
    }

    #[test]
    fn memory_store_quota() {
        let mut store = MemoryStore::new().with_quota(4);
        store.set("a", "12").unwrap();
        assert!(store.set("b", "345").is_err());
        store.remove("a").unwrap();
        store.set("b", "345").unwrap();
        assert_eq!(store.keys().unwrap(), ["b"]);
    }
}
