//! Path-component Jaccard similarity for VCS-less rename detection (§4.1 step 3)

use std::collections::HashSet;

/// Splits a path into its component set (directories + stem + extension),
/// so `a/b/foo.py` and `a/b/foo_v2.py` share most of their components.
fn path_components(path: &str) -> HashSet<&str> {
    path.split(|c| c == '/' || c == '.' || c == '_' || c == '-')
        .filter(|s| !s.is_empty())
        .collect()
}

/// Jaccard similarity of two paths' component sets, in `[0, 1]`.
pub fn path_jaccard(a: &str, b: &str) -> f64 {
    let sa = path_components(a);
    let sb = path_components(b);
    if sa.is_empty() && sb.is_empty() {
        return 1.0;
    }
    let intersection = sa.intersection(&sb).count();
    let union = sa.union(&sb).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// A deleted/added pair considered for reclassification as a rename.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameCandidate {
    pub old_path: String,
    pub new_path: String,
    pub similarity: f64,
}

/// Groups `added`/`deleted` by file extension (§4.1: O(n)), then within each
/// group finds the best-scoring pairing whose similarity is ≥ `threshold`.
/// An optional `size_filter` restricts pairing to files within ±10% of each
/// other's size, when both sizes are known.
pub fn find_renames(
    added: &[String],
    deleted: &[String],
    threshold: f64,
    size_of: impl Fn(&str) -> Option<u64>,
) -> Vec<RenameCandidate> {
    fn extension(path: &str) -> &str {
        path.rsplit('.').next().unwrap_or("")
    }

    let mut by_ext_added: std::collections::HashMap<&str, Vec<&String>> = Default::default();
    for a in added {
        by_ext_added.entry(extension(a)).or_default().push(a);
    }
    let mut by_ext_deleted: std::collections::HashMap<&str, Vec<&String>> = Default::default();
    for d in deleted {
        by_ext_deleted.entry(extension(d)).or_default().push(d);
    }

    let mut used_added: HashSet<&String> = HashSet::new();
    let mut candidates = Vec::new();

    let mut extensions: Vec<&&str> = by_ext_deleted.keys().collect();
    extensions.sort();

    for ext in extensions {
        let deleted_group = &by_ext_deleted[ext];
        let added_group = match by_ext_added.get(ext) {
            Some(g) => g,
            None => continue,
        };

        for old in deleted_group {
            let old_size = size_of(old);
            let mut best: Option<(&String, f64)> = None;
            for new in added_group {
                if used_added.contains(*new) {
                    continue;
                }
                if let (Some(os), Some(ns)) = (old_size, size_of(new)) {
                    let low = os as f64 * 0.9;
                    let high = os as f64 * 1.1;
                    if (ns as f64) < low || (ns as f64) > high {
                        continue;
                    }
                }
                let sim = path_jaccard(old, new);
                if sim >= threshold && best.map(|(_, b)| sim > b).unwrap_or(true) {
                    best = Some((new, sim));
                }
            }
            if let Some((new, sim)) = best {
                used_added.insert(new);
                candidates.push(RenameCandidate {
                    old_path: (*old).clone(),
                    new_path: new.clone(),
                    similarity: sim,
                });
            }
        }
    }

    candidates
}
