use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::core::validate;
use crate::data::{CacheEntry, ResourceClass, ResourceKey};
use crate::error::{CacheError, Result};

/// Flat file-per-resource cache.
///
/// Each key maps to `<root>/<key>.json` holding the resource's validated
/// payload. The file's modification time is the authoritative freshness
/// timestamp; [`CacheStore::put`] stamps it to "now" on every successful
/// write, byte-identical payload or not.
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Open (creating if needed) the cache directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| CacheError::Write {
            path: root.clone(),
            source: e,
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &ResourceKey) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Look up the entry for `key`.
    ///
    /// `Ok(None)` means genuinely absent. A file that exists but cannot be
    /// read or decoded comes back as a typed error so the caller can log
    /// it and decide to treat it as a miss; it is never silently
    /// discarded here.
    pub fn get(&self, key: &ResourceKey) -> Result<Option<CacheEntry>> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Read { path, source: e }.into()),
        };
        let payload = serde_json::from_slice(&bytes).map_err(|e| CacheError::Malformed {
            path: path.clone(),
            source: e,
        })?;
        let last_refreshed = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| CacheError::Timestamp { path, source: e })?;
        Ok(Some(CacheEntry {
            payload,
            last_refreshed,
        }))
    }

    /// Validate `payload` for its resource class, then atomically replace
    /// the entry for `key`.
    ///
    /// The payload is staged into a temp file in the cache directory and
    /// renamed over the destination, so a concurrent reader sees either
    /// the old entry or the new one, never a partial write. The rename
    /// stamps a fresh modification time - freshness is a clock fact, not
    /// a content fact.
    pub fn put(&self, key: &ResourceKey, class: ResourceClass, payload: &Value) -> Result<()> {
        validate(class, payload)?;

        let path = self.path_for(key);
        let bytes = serde_json::to_vec_pretty(payload).map_err(|e| CacheError::Encode {
            path: path.clone(),
            source: e,
        })?;
        write_atomic(&self.root, &path, &bytes)?;
        debug!(key = %key, bytes = bytes.len(), "cache entry refreshed");
        Ok(())
    }
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> std::result::Result<(), CacheError> {
    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|e| CacheError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    staged.write_all(bytes).map_err(|e| CacheError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    staged.persist(path).map_err(|e| CacheError::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
