//! Taint Engine (C8, §4.8)
//!
//! BFS over a plain call graph, one pass per source, matching every visited
//! node's name against sanitizer and sink patterns. Deliberately not the
//! IFDS/IDE machinery a whole-program points-to analysis would use — a
//! source-bounded BFS over named calls is what the contract here asks for.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::{Duration, Instant};

use regex::Regex;
use tracing::warn;

use crate::shared::models::{MatchRule, Severity, TaintAtom, TaintPath};

/// One function in the call graph the BFS walks. `callees` are other nodes'
/// ids, not names — name matching happens against this node's own `name`.
#[derive(Debug, Clone)]
pub struct CallGraphNode {
    pub id: String,
    pub name: String,
    pub callees: Vec<String>,
}

pub struct TaintAnalysisInput<'a> {
    pub call_graph: &'a HashMap<String, CallGraphNode>,
    pub sources: &'a [TaintAtom],
    pub sinks: &'a [TaintAtom],
    pub sanitizers: &'a [TaintAtom],
    pub max_depth: usize,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AnalysisSummary {
    pub total_paths: usize,
    pub unsanitized_count: usize,
}

#[derive(Debug, Default)]
pub struct AnalysisResult {
    pub paths: Vec<TaintPath>,
    pub summary: AnalysisSummary,
    pub incomplete: bool,
}

/// Runs the BFS from every call graph node matching a source pattern.
/// Deterministic: sources and each node's callees are visited in ascending
/// id order (§4.8).
pub fn analyze(input: &TaintAnalysisInput) -> AnalysisResult {
    let deadline = input.timeout.map(|timeout| Instant::now() + timeout);

    let mut source_ids: Vec<&String> = input.call_graph.keys().collect();
    source_ids.sort();

    let mut paths = Vec::new();
    let mut incomplete = false;

    for node_id in source_ids {
        let node = &input.call_graph[node_id];
        if match_any(input.sources, &node.name).is_none() {
            continue;
        }

        let (mut found, ran_out_of_time) = bfs_from_source(input, node_id, deadline);
        incomplete |= ran_out_of_time;
        paths.append(&mut found);

        if ran_out_of_time {
            warn!(source = %node_id, max_depth = input.max_depth, "taint BFS hit its deadline before exhausting the call graph");
            break;
        }
    }

    let unsanitized_count = paths.iter().filter(|p| !p.is_sanitized).count();
    let total_paths = paths.len();
    AnalysisResult {
        paths,
        summary: AnalysisSummary { total_paths, unsanitized_count },
        incomplete,
    }
}

type Frontier = (String, Vec<String>, bool, Vec<String>, usize);

fn bfs_from_source(
    input: &TaintAnalysisInput,
    source_id: &str,
    deadline: Option<Instant>,
) -> (Vec<TaintPath>, bool) {
    let mut paths = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(source_id.to_string());

    let mut queue: VecDeque<Frontier> = VecDeque::new();
    queue.push_back((source_id.to_string(), vec![source_id.to_string()], false, Vec::new(), 0));

    while let Some((node_id, path, was_sanitized, sanitizers_used, depth)) = queue.pop_front() {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return (paths, true);
            }
        }

        let Some(node) = input.call_graph.get(&node_id) else { continue };

        let (is_sanitized, sanitizers_used) = match match_any(input.sanitizers, &node.name) {
            Some(atom) => {
                let mut used = sanitizers_used;
                used.push(atom.id.clone());
                (true, used)
            }
            None => (was_sanitized, sanitizers_used),
        };

        if node_id != source_id {
            if let Some(sink_atom) = match_any(input.sinks, &node.name) {
                paths.push(build_taint_path(source_id, &node_id, &path, is_sanitized, &sanitizers_used, sink_atom));
            }
        }

        if depth >= input.max_depth {
            warn!(source = %source_id, node = %node_id, max_depth = input.max_depth, "taint BFS stopped at max_depth without reaching a sink");
            continue;
        }

        let mut callees = node.callees.clone();
        callees.sort();
        for callee_id in callees {
            if !visited.insert(callee_id.clone()) {
                continue;
            }
            let mut next_path = path.clone();
            next_path.push(callee_id.clone());
            queue.push_back((callee_id, next_path, is_sanitized, sanitizers_used.clone(), depth + 1));
        }
    }

    (paths, false)
}

fn match_any<'a>(atoms: &'a [TaintAtom], name: &str) -> Option<&'a TaintAtom> {
    atoms.iter().find(|atom| atom.rules.iter().any(|rule| rule_matches(rule, name)))
}

/// Plain string equality for `call`, anchored regex for `call_pattern`
/// (§4.8).
fn rule_matches(rule: &MatchRule, name: &str) -> bool {
    if let Some(call) = &rule.call {
        if call == name {
            return true;
        }
    }
    if let Some(pattern) = &rule.call_pattern {
        let anchored = format!("^(?:{pattern})$");
        if Regex::new(&anchored).map(|re| re.is_match(name)).unwrap_or(false) {
            return true;
        }
    }
    false
}

/// Base confidence 0.8; short paths (≤3 nodes) are more trustworthy, long
/// ones (>10) less so (§4.8).
fn build_taint_path(
    source_id: &str,
    sink_id: &str,
    nodes: &[String],
    is_sanitized: bool,
    sanitizers_used: &[String],
    sink_atom: &TaintAtom,
) -> TaintPath {
    let mut confidence: f32 = 0.8;
    if nodes.len() <= 3 {
        confidence += 0.1;
    }
    if nodes.len() > 10 {
        confidence -= 0.1;
    }

    TaintPath {
        source_id: source_id.to_string(),
        sink_id: sink_id.to_string(),
        nodes: nodes.to_vec(),
        is_sanitized,
        severity: sink_atom.severity.unwrap_or(Severity::Low),
        sanitizers_used: sanitizers_used.to_vec(),
        confidence: confidence.clamp(0.0, 1.0),
    }
}
