//! Pipeline configuration shape (§E3)
//!
//! This module carries configuration *shape* only; loading from
//! TOML/JSON/env is a host-binary concern and out of scope here.

pub mod layer_toggles;
pub mod pipeline_config;
pub mod taint_config;
pub mod cache_config;

pub use cache_config::CacheConfig;
pub use layer_toggles::LayerToggles;
pub use pipeline_config::{PipelineConfig, Strategy};
pub use taint_config::TaintConfig;
