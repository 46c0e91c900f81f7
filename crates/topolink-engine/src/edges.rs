//! Edge registrar: deduplicates bidirectional observations into canonical
//! undirected edges.

use std::collections::BTreeMap;
use topolink_model::{EdgeDetail, GraphEdge};

/// Canonical key for an undirected pair: sorted ids joined with `--`.
pub fn edge_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}--{b}")
    } else {
        format!("{b}--{a}")
    }
}

/// Register one observation of a link. The first occurrence of a pair
/// creates the edge (canonical orientation, status `unknown`); repeats
/// append their detail to the existing edge. Self-referential pairs are
/// discarded silently.
pub fn register_edge(
    edges: &mut BTreeMap<String, GraphEdge>,
    source: &str,
    target: &str,
    detail: Option<EdgeDetail>,
) {
    if source == target {
        tracing::debug!(node = source, "dropping self-referential link");
        return;
    }
    let (lo, hi) = if source <= target {
        (source, target)
    } else {
        (target, source)
    };
    let edge = edges.entry(edge_key(lo, hi)).or_insert_with(|| GraphEdge {
        source: lo.to_string(),
        target: hi.to_string(),
        status: "unknown".to_string(),
        details: Vec::new(),
    });
    if let Some(detail) = detail {
        edge.details.push(detail);
    }
}
