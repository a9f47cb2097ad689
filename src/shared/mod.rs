//! Shared module - Common types and utilities
//!
//! Types and utilities used across every feature module.

#[macro_use]
pub mod macros;
pub mod constants;
pub mod models;
pub mod ports;
pub mod utils;

pub use models::*;
pub use ports::language::Language;
pub use utils::stable_node_id;
