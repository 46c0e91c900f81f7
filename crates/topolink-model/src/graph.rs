//! The graph value the engine emits.
//!
//! This is the sole public contract of the reconstruction core: a plain
//! JSON-serializable `{nodes, links}` value consumed by rendering and
//! diagnostic tooling. Field names follow the consumer contract
//! (camelCase, absent fields omitted).

use serde::{Deserialize, Serialize};

use crate::observation::Protocol;

/// Node `type` value for neighbors that could not be matched to a known
/// device.
pub const NODE_TYPE_EXTERNAL: &str = "external";

/// Node `type` value for synthesized per-port appliance nodes.
pub const NODE_TYPE_APPLIANCE_PORT: &str = "appliance-port";

/// One graph node: a known device, a synthesized external neighbor, or a
/// per-port appliance expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    /// Two-letter model prefix for known devices, else `"external"` or
    /// `"appliance-port"`.
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    pub status: String,
    /// Port number on the closest known upstream device this node attaches
    /// to. Assigned at most once (first writer wins).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_port: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_port_raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_to_port: Option<String>,
    /// Set on appliance-port nodes only: the owning appliance's serial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appliance_serial: Option<String>,
    /// Set on appliance-port nodes only: extracted port number, or the raw
    /// identifier when it carried no digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_number: Option<String>,
}

/// Per-protocol annotation accumulated on an edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDetail {
    pub protocol: Protocol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_name: Option<String>,
}

/// One undirected physical link. `source`/`target` hold the canonical
/// (sorted) orientation; an empty `details` list is omitted entirely so
/// "no detail available" stays distinguishable from explicit empty detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<EdgeDetail>,
}

/// The reconstruction result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphEdge>,
}
