//! ID generation utilities
//!
//! Generates stable, deterministic IDs for nodes using SHA256.

use sha2::{Digest, Sha256};

use crate::shared::models::node::NodeKind;
use crate::shared::models::Span;

/// Content-stable node id: `hash(kind, fqn, file_path, span_start)` (§3).
/// Deliberately excludes `span_end` so a node whose body grows/shrinks but
/// whose declaration line is untouched keeps the same id; excludes nothing
/// else, so a node that merely moves to a different file gets a new id (by
/// design — cross-file moves are modeled as delete+add, not a rename of the
/// node itself).
pub fn stable_node_id(kind: NodeKind, fqn: &str, file_path: &str, span: &Span) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_str().as_bytes());
    hasher.update(b"\0");
    hasher.update(fqn.as_bytes());
    hasher.update(b"\0");
    hasher.update(file_path.as_bytes());
    hasher.update(b"\0");
    hasher.update(span.start_line.to_le_bytes());
    hasher.update(span.start_col.to_le_bytes());
    let digest = hasher.finalize();
    digest[..16].iter().map(|b| format!("{:02x}", b)).collect()
}
