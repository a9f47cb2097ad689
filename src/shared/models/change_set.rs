//! ChangeSet (§3, produced by C1)

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Classified delta of a repository between two states. `added ∩ deleted =
/// ∅` always holds; `mark_as_renamed` maintains the rename invariant:
/// afterwards `old ∉ deleted ∧ new ∉ added`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    pub added: HashSet<String>,
    pub modified: HashSet<String>,
    pub deleted: HashSet<String>,
    pub renamed: HashMap<String, String>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_added(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.deleted.remove(&path);
        self.purge_renames_touching(&path);
        self.added.insert(path);
    }

    pub fn mark_modified(&mut self, path: impl Into<String>) {
        self.modified.insert(path.into());
    }

    pub fn mark_deleted(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.added.remove(&path);
        self.purge_renames_touching(&path);
        self.deleted.insert(path);
    }

    /// Reclassifies `old → new` as a rename: removes `old` from `deleted`
    /// and `new` from `added`, then records the mapping. Idempotent.
    pub fn mark_as_renamed(&mut self, old: impl Into<String>, new: impl Into<String>) {
        let old = old.into();
        let new = new.into();
        self.deleted.remove(&old);
        self.added.remove(&new);
        self.renamed.insert(old, new);
    }

    /// Drops any existing rename mapping that mentions `path` on either
    /// side — a direct add/delete of a path supersedes whatever rename
    /// relationship it used to have, keeping the §3 rename invariant true
    /// under arbitrary operation orderings.
    fn purge_renames_touching(&mut self, path: &str) {
        self.renamed.retain(|old, new| old != path && new != path);
    }

    /// Every file this ChangeSet says is different from the baseline:
    /// added, modified, deleted, and both ends of every rename.
    pub fn all_changed(&self) -> HashSet<String> {
        let mut all = HashSet::new();
        all.extend(self.added.iter().cloned());
        all.extend(self.modified.iter().cloned());
        all.extend(self.deleted.iter().cloned());
        for (old, new) in &self.renamed {
            all.insert(old.clone());
            all.insert(new.clone());
        }
        all
    }

    /// §3/§8 invariant check: `added ∩ deleted = ∅`; no renamed `old` in
    /// `deleted`; no renamed `new` in `added`.
    pub fn check_invariants(&self) -> bool {
        if !self.added.is_disjoint(&self.deleted) {
            return false;
        }
        for (old, new) in &self.renamed {
            if self.deleted.contains(old) || self.added.contains(new) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rename_clears_delete_and_add() {
        let mut cs = ChangeSet::new();
        cs.mark_deleted("a/x.py");
        cs.mark_added("a/y.py");
        cs.mark_as_renamed("a/x.py", "a/y.py");

        assert!(!cs.deleted.contains("a/x.py"));
        assert!(!cs.added.contains("a/y.py"));
        assert_eq!(cs.renamed.get("a/x.py"), Some(&"a/y.py".to_string()));
        assert!(cs.check_invariants());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(String),
        Modify(String),
        Delete(String),
        Rename(String, String),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        let path = "[a-c]";
        prop_oneof![
            path.prop_map(|p| Op::Add(p.to_string())),
            path.prop_map(|p| Op::Modify(p.to_string())),
            path.prop_map(|p| Op::Delete(p.to_string())),
            (path, path).prop_map(|(a, b)| Op::Rename(a.to_string(), b.to_string())),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_after_arbitrary_ops(ops in prop::collection::vec(arb_op(), 0..50)) {
            let mut cs = ChangeSet::new();
            for op in ops {
                match op {
                    Op::Add(p) => cs.mark_added(p),
                    Op::Modify(p) => cs.mark_modified(p),
                    Op::Delete(p) => cs.mark_deleted(p),
                    Op::Rename(a, b) => cs.mark_as_renamed(a, b),
                }
                prop_assert!(cs.check_invariants());
            }
        }
    }
}
