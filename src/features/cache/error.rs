//! Cache error taxonomy (§7)

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache entry corrupted or truncated: {0}")]
    Corruption(String),

    #[error("storage backend unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<CacheError> for crate::errors::CodegraphError {
    fn from(e: CacheError) -> Self {
        crate::errors::CodegraphError::Cache(e.to_string())
    }
}
