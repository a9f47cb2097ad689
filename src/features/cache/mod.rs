//! Semantic Cache (C2, §4.2)

pub mod disk_storage;
pub mod error;
pub mod fingerprint;
pub mod store;

pub use disk_storage::DiskStorage;
pub use error::CacheError;
pub use fingerprint::{content_hash, struct_hash};
pub use store::{CacheStats, SemanticCache};
