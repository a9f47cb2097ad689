//! Crate-wide error type (§E1)
//!
//! Each component also carries its own narrow error enum (`CacheError`,
//! `TaintError`, `ResolutionError`, ...) that converts into this one at the
//! crate-API boundary via `#[from]`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("analysis error: {0}")]
    Analysis(String),

    #[error("pipeline error: {0}")]
    Pipeline(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("resolution error: {0}")]
    Resolution(String),

    #[error("taint engine error: {0}")]
    Taint(String),

    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl CodegraphError {
    pub fn parse_error(msg: impl Into<String>) -> Self {
        CodegraphError::Parse(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        CodegraphError::Analysis(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        CodegraphError::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CodegraphError>;
