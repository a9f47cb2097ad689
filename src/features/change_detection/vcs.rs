//! git2-backed diff name-status parsing (§4.1 step 1)

use crate::shared::models::ChangeSet;

/// Diffs `base_revision` against the working tree (or HEAD if `None`) using
/// `git2`, classifying each touched path the way `git diff --name-status
/// -M` would: A/M/D, plus R<score> collapsed into a rename.
pub fn diff_against_revision(
    repo_path: &str,
    base_revision: Option<&str>,
) -> Result<ChangeSet, git2::Error> {
    let repo = git2::Repository::open(repo_path)?;
    let mut changes = ChangeSet::new();

    let old_tree = match base_revision {
        Some(rev) => {
            let obj = repo.revparse_single(rev)?;
            Some(obj.peel_to_tree()?)
        }
        None => repo.head().ok().and_then(|h| h.peel_to_tree().ok()),
    };

    let mut diff_opts = git2::DiffOptions::new();
    diff_opts.include_untracked(true);

    let diff = repo.diff_tree_to_workdir_with_index(old_tree.as_ref(), Some(&mut diff_opts))?;

    let mut find_opts = git2::DiffFindOptions::new();
    find_opts.renames(true);
    let mut diff = diff;
    diff.find_similar(Some(&mut find_opts))?;

    for delta in diff.deltas() {
        let old_path = delta.old_file().path().map(|p| p.display().to_string());
        let new_path = delta.new_file().path().map(|p| p.display().to_string());

        match delta.status() {
            git2::Delta::Added | git2::Delta::Untracked => {
                if let Some(p) = new_path {
                    changes.mark_added(p);
                }
            }
            git2::Delta::Deleted => {
                if let Some(p) = old_path {
                    changes.mark_deleted(p);
                }
            }
            git2::Delta::Modified => {
                if let Some(p) = new_path {
                    changes.mark_modified(p);
                }
            }
            git2::Delta::Renamed => {
                if let (Some(old), Some(new)) = (old_path, new_path) {
                    changes.mark_as_renamed(old, new);
                }
            }
            _ => {}
        }
    }

    Ok(changes)
}
