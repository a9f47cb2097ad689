//! Taint engine configuration (§4.8, §E3)

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::shared::models::TaintAtom;

/// Bounds and rule sets for the BFS-based taint engine (C8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaintConfig {
    /// Longest source→sink path the BFS will explore before giving up on
    /// that source.
    pub max_depth: usize,
    #[serde(with = "duration_millis")]
    pub timeout: Duration,
    pub atoms: Vec<TaintAtom>,
}

impl Default for TaintConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            timeout: Duration::from_secs(30),
            atoms: Vec::new(),
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_sane_bounds() {
        let cfg = TaintConfig::default();
        assert!(cfg.max_depth > 0);
        assert!(cfg.timeout > Duration::ZERO);
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = TaintConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: TaintConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_depth, cfg.max_depth);
        assert_eq!(back.timeout, cfg.timeout);
    }
}
