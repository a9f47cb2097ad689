//! File-hash store port (§6, consumed by C1)

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub mtime_epoch_ms: u64,
    pub hash: String,
    pub size: Option<u64>,
}

/// A snapshot of a prior build's file state, used by C1 to classify the
/// current working tree without shelling out to git.
pub trait FileHashStore: Send + Sync {
    fn get_repo_state(&self, repo_id: &str) -> HashMap<String, FileMetadata>;
    fn get_file_metadata(&self, path: &str) -> Option<FileMetadata>;
}

/// An in-memory store, mainly for tests and the `Overlay` strategy.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileHashStore {
    pub state: HashMap<String, FileMetadata>,
}

impl FileHashStore for InMemoryFileHashStore {
    fn get_repo_state(&self, _repo_id: &str) -> HashMap<String, FileMetadata> {
        self.state.clone()
    }

    fn get_file_metadata(&self, path: &str) -> Option<FileMetadata> {
        self.state.get(path).cloned()
    }
}
