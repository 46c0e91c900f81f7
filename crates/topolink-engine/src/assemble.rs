//! Final assembly: status resolution and deterministic emission.

use std::collections::BTreeMap;
use topolink_model::{GraphEdge, GraphNode, StatusMap, TopologyGraph};

/// Merge the node/edge maps with the externally supplied status map.
///
/// Status fallback chain per node: status map by node id, else whatever
/// status was embedded when the node was created (the device record's own,
/// or the owning appliance's for port nodes), else `unknown`. Nodes and
/// links come out in sorted-key order so identical input yields identical
/// output regardless of observation order.
pub fn assemble(
    nodes: BTreeMap<String, GraphNode>,
    edges: BTreeMap<String, GraphEdge>,
    statuses: &StatusMap,
) -> TopologyGraph {
    let nodes = nodes
        .into_values()
        .map(|mut node| {
            if let Some(status) = statuses.get(&node.id) {
                node.status = status.clone();
            } else if node.status.trim().is_empty() {
                node.status = "unknown".to_string();
            }
            node
        })
        .collect();
    TopologyGraph {
        nodes,
        links: edges.into_values().collect(),
    }
}
