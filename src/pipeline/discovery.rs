//! Repository file discovery (§4.9, feeding C9)
//!
//! Walks a repository root, keeping only files whose extension maps onto a
//! supported `Language`, and reads their bytes. Shares `walkdir` with C1's
//! change detector rather than rolling a second directory walker.

use std::path::Path;

use crate::errors::Result;
use crate::shared::ports::language::Language;

use super::orchestrator::SourceFile;

/// Enumerates every analyzable file under `repo_path`, relative to it.
pub fn discover_files(repo_path: &str) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(repo_path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let rel_path = entry
            .path()
            .strip_prefix(repo_path)
            .unwrap_or(entry.path())
            .display()
            .to_string();
        let Some(language) = Language::from_file_path(&rel_path) else {
            continue;
        };
        let bytes = std::fs::read(entry.path())?;
        files.push(SourceFile {
            file_path: rel_path,
            language,
            bytes,
            overlay: false,
        });
    }
    files.sort_by(|a, b| a.file_path.cmp(&b.file_path));
    Ok(files)
}

/// Replaces or appends overlay content over a discovered file set. Overlay
/// paths are relative to the same root `discover_files` used; a path not
/// already present is added as a new file, inferring its language from the
/// path (unknown extensions are dropped, matching discovery's own filter).
pub fn apply_overlay(files: &mut Vec<SourceFile>, overlay: &std::collections::HashMap<String, String>) {
    for (path, content) in overlay {
        let Some(language) = Language::from_file_path(path) else {
            continue;
        };
        let bytes = content.clone().into_bytes();
        match files.iter_mut().find(|f| &f.file_path == path) {
            Some(existing) => {
                existing.bytes = bytes;
                existing.overlay = true;
            }
            None => files.push(SourceFile {
                file_path: path.clone(),
                language,
                bytes,
                overlay: true,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_only_recognized_languages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.py"), "x = 1").unwrap();
        std::fs::write(dir.path().join("readme.md"), "hi").unwrap();

        let files = discover_files(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_path, "a.py");
        assert!(!files[0].overlay);
    }

    #[test]
    fn overlay_replaces_existing_file_and_adds_new_one() {
        let mut files = vec![SourceFile {
            file_path: "a.py".to_string(),
            language: Language::Python,
            bytes: b"old".to_vec(),
            overlay: false,
        }];
        let mut overlay = std::collections::HashMap::new();
        overlay.insert("a.py".to_string(), "new".to_string());
        overlay.insert("b.py".to_string(), "fresh".to_string());

        apply_overlay(&mut files, &overlay);

        let a = files.iter().find(|f| f.file_path == "a.py").unwrap();
        assert_eq!(a.bytes, b"new");
        assert!(a.overlay);
        let b = files.iter().find(|f| f.file_path == "b.py").unwrap();
        assert!(b.overlay);
    }
}
