//! Utility modules shared across features
//!
//! - `id_generator`: stable id generation
//! - `tree_sitter`: tree-sitter AST traversal helpers

pub mod id_generator;
pub mod tree_sitter;

pub use id_generator::stable_node_id;
