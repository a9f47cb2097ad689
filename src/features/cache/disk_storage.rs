//! Content-addressed disk backend for the storage port (§6 Persisted layout)
//!
//! Layout: `{directory}/entries/<hash-prefix>/<hash>.bin`, with writes
//! staged under `{directory}/tmp/` and atomically renamed into place so
//! readers never observe a partially written entry.

use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::ports::storage::Storage;

#[derive(Debug)]
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("entries"))?;
        fs::create_dir_all(root.join("tmp"))?;
        Ok(Self { root })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let prefix = &key[..key.len().min(2)];
        self.root.join("entries").join(prefix).join(format!("{key}.bin"))
    }
}

impl Storage for DiskStorage {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.entry_path(key)).ok()
    }

    fn put(&self, key: &str, bytes: Vec<u8>) {
        let final_path = self.entry_path(key);
        if let Some(parent) = final_path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let tmp_path = self.root.join("tmp").join(format!("{key}.tmp"));
        if fs::write(&tmp_path, &bytes).is_ok() {
            let _ = fs::rename(&tmp_path, &final_path);
        }
    }

    fn delete(&self, key: &str) {
        let _ = fs::remove_file(self.entry_path(key));
    }
}

/// Checks the directory's `CACHE_VERSION` marker; a missing marker is
/// treated as "not yet initialized" rather than a mismatch.
pub fn check_cache_version(root: &Path, expected: u32) -> bool {
    match fs::read_to_string(root.join("CACHE_VERSION")) {
        Ok(s) => s.trim().parse::<u32>() == Ok(expected),
        Err(_) => true,
    }
}

pub fn write_cache_version(root: &Path, version: u32) -> std::io::Result<()> {
    fs::write(root.join("CACHE_VERSION"), version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path()).unwrap();
        storage.put("abc123", vec![1, 2, 3]);
        assert_eq!(storage.get("abc123"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path()).unwrap();
        assert_eq!(storage.get("missing"), None);
    }

    #[test]
    fn version_marker_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        write_cache_version(dir.path(), 1).unwrap();
        assert!(check_cache_version(dir.path(), 1));
        assert!(!check_cache_version(dir.path(), 2));
    }

    #[test]
    fn missing_version_marker_is_treated_as_uninitialized_not_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_cache_version(dir.path(), 7));
    }
}
