//! Storage port (§6, consumed by C2)
//!
//! A narrow key-value-over-bytes capability. Concrete backends (disk,
//! Postgres, object storage) live outside this crate; here only the
//! interface and an in-memory test double.

use std::collections::HashMap;
use std::sync::Mutex;

pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn put(&self, key: &str, bytes: Vec<u8>);
    fn delete(&self, key: &str);
}

/// In-memory storage backend, atomic by construction (single process-wide
/// mutex); used for tests and as the default when no disk backend is wired.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl Storage for InMemoryStorage {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, bytes: Vec<u8>) {
        self.entries.lock().unwrap().insert(key.to_string(), bytes);
    }

    fn delete(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}
