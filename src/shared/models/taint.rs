//! Taint atoms and paths (§3, consumed by C8)

use serde::{Deserialize, Serialize};

/// Which role a [`TaintAtom`] plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AtomKind {
    Source,
    Sink,
    Sanitizer,
    Propagator,
}

/// A single matching rule inside a [`TaintAtom`]. Exactly one of
/// `base_type`/`base_type_pattern` and one of `call`/`call_pattern` may be
/// set, matching §3's MatchRule description; validation lives in
/// [`MatchRule::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_type_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<u32>,
    /// Propagator only: which argument indices flow...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_args: Option<Vec<u32>>,
    /// ...to which target (an arg index or the return value, encoded as the
    /// sentinel value `u32::MAX`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<u32>,
    /// Sanitizer only: restricts which call scope the sanitizer applies
    /// within.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MatchRuleError {
    #[error("match rule has no base_type, base_type_pattern, call, call_pattern, or read predicate")]
    Empty,
    #[error("duplicate argument index {0}")]
    DuplicateArgIndex(u32),
    #[error("propagator rule requires both from_args and to")]
    PropagatorMissingFields,
}

impl MatchRule {
    pub fn validate(&self, kind: AtomKind) -> Result<(), MatchRuleError> {
        let has_predicate = self.base_type.is_some()
            || self.base_type_pattern.is_some()
            || self.call.is_some()
            || self.call_pattern.is_some()
            || self.read.is_some();
        if !has_predicate {
            return Err(MatchRuleError::Empty);
        }

        let mut seen = std::collections::HashSet::new();
        for &idx in &self.args {
            if !seen.insert(idx) {
                return Err(MatchRuleError::DuplicateArgIndex(idx));
            }
        }

        if kind == AtomKind::Propagator && (self.from_args.is_none() || self.to.is_none()) {
            return Err(MatchRuleError::PropagatorMissingFields);
        }

        Ok(())
    }
}

/// A declarative source/sink/sanitizer/propagator pattern (§3, §GLOSSARY).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaintAtom {
    pub id: String,
    pub kind: AtomKind,
    #[serde(default)]
    pub tags: Vec<String>,
    pub rules: Vec<MatchRule>,
    /// Sinks carry a severity; other kinds leave this `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_regex: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl TaintAtom {
    pub fn validate(&self) -> Result<(), MatchRuleError> {
        if self.rules.is_empty() {
            return Err(MatchRuleError::Empty);
        }
        for rule in &self.rules {
            rule.validate(self.kind)?;
        }
        Ok(())
    }
}

/// One source → … → sink path found by the taint engine (§4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaintPath {
    pub source_id: String,
    pub sink_id: String,
    pub nodes: Vec<String>,
    pub is_sanitized: bool,
    pub severity: Severity,
    pub sanitizers_used: Vec<String>,
    /// Confidence in [0, 1], derived from path length (§4.8).
    pub confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rule_rejected() {
        let rule = MatchRule::default();
        assert_eq!(rule.validate(AtomKind::Source), Err(MatchRuleError::Empty));
    }

    #[test]
    fn duplicate_arg_index_rejected() {
        let rule = MatchRule {
            call: Some("foo".into()),
            args: vec![0, 1, 0],
            ..Default::default()
        };
        assert_eq!(
            rule.validate(AtomKind::Sink),
            Err(MatchRuleError::DuplicateArgIndex(0))
        );
    }

    #[test]
    fn propagator_requires_from_args_and_to() {
        let rule = MatchRule {
            call: Some("foo".into()),
            ..Default::default()
        };
        assert_eq!(
            rule.validate(AtomKind::Propagator),
            Err(MatchRuleError::PropagatorMissingFields)
        );

        let ok = MatchRule {
            call: Some("foo".into()),
            from_args: Some(vec![0]),
            to: Some(1),
            ..Default::default()
        };
        assert!(ok.validate(AtomKind::Propagator).is_ok());
    }
}
