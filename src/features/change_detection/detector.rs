//! ChangeDetector (C1, §4.1)

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use super::similarity::find_renames;
use super::vcs::diff_against_revision;
use crate::features::cache::fingerprint::content_hash;
use crate::shared::models::ChangeSet;
use crate::shared::ports::file_hash_store::FileHashStore;

#[derive(Debug, Clone)]
pub struct ChangeDetectionOptions {
    pub use_vcs: bool,
    pub use_mtime: bool,
    pub use_hash: bool,
    pub enable_similarity: bool,
    pub threshold: f64,
}

impl Default for ChangeDetectionOptions {
    fn default() -> Self {
        Self {
            use_vcs: true,
            use_mtime: true,
            use_hash: true,
            enable_similarity: true,
            threshold: 0.5,
        }
    }
}

pub struct ChangeDetector<'a> {
    pub hash_store: Option<&'a dyn FileHashStore>,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(hash_store: Option<&'a dyn FileHashStore>) -> Self {
        Self { hash_store }
    }

    /// `detect(repo_path, repo_id, base_revision?, options) -> ChangeSet` (§4.1).
    /// No step is fatal: a VCS failure falls through to mtime/hash; a
    /// per-file hash failure is logged and the file treated as modified.
    pub fn detect(
        &self,
        repo_path: &str,
        repo_id: &str,
        base_revision: Option<&str>,
        opts: &ChangeDetectionOptions,
    ) -> ChangeSet {
        let mut changes = ChangeSet::new();
        let mut vcs_succeeded = false;

        if opts.use_vcs {
            match diff_against_revision(repo_path, base_revision) {
                Ok(vcs_changes) => {
                    changes = vcs_changes;
                    vcs_succeeded = true;
                }
                Err(e) => {
                    warn!(error = %e, "vcs diff failed, falling back to mtime/hash");
                }
            }
        }

        if !vcs_succeeded && (opts.use_mtime || opts.use_hash) {
            if let Some(store) = self.hash_store {
                self.detect_via_mtime_hash(repo_path, repo_id, store, opts, &mut changes);
            }
        }

        if !vcs_succeeded && opts.enable_similarity {
            let added: Vec<String> = changes.added.iter().cloned().collect();
            let deleted: Vec<String> = changes.deleted.iter().cloned().collect();
            let size_of = |p: &str| -> Option<u64> {
                self.hash_store
                    .and_then(|s| s.get_file_metadata(p))
                    .and_then(|m| m.size)
            };
            for candidate in find_renames(&added, &deleted, opts.threshold, size_of) {
                changes.mark_as_renamed(candidate.old_path, candidate.new_path);
            }
        }

        changes
    }

    fn detect_via_mtime_hash(
        &self,
        repo_path: &str,
        repo_id: &str,
        store: &dyn FileHashStore,
        opts: &ChangeDetectionOptions,
        changes: &mut ChangeSet,
    ) {
        let previous = store.get_repo_state(repo_id);
        let mut seen: HashMap<String, ()> = HashMap::new();

        for entry in walkdir::WalkDir::new(repo_path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let rel_path = entry
                .path()
                .strip_prefix(repo_path)
                .unwrap_or_else(|_| entry.path())
                .display()
                .to_string();
            seen.insert(rel_path.clone(), ());

            let prior = previous.get(&rel_path);
            let current_mtime = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);

            match prior {
                None => {
                    changes.mark_added(rel_path);
                }
                Some(prior_meta) => {
                    let mtime_newer = opts.use_mtime && current_mtime > prior_meta.mtime_epoch_ms;
                    if mtime_newer || opts.use_hash {
                        match std::fs::read(entry.path()) {
                            Ok(content) => {
                                let current_hash = content_hash(&content);
                                if current_hash != prior_meta.hash {
                                    changes.mark_modified(rel_path);
                                }
                            }
                            Err(e) => {
                                warn!(file = %rel_path, error = %e, "hash compute failed, treating as modified");
                                changes.mark_modified(rel_path);
                            }
                        }
                    }
                }
            }
        }

        for path in previous.keys() {
            if !seen.contains_key(path) && !Path::new(repo_path).join(path).exists() {
                changes.mark_deleted(path.clone());
            }
        }
    }
}
