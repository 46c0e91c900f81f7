//! Topolink reconstruction core
//!
//! Given a caller-owned device list and the canonical observation streams
//! produced by `topolink-ingest`, build a deduplicated, labeled
//! connectivity graph:
//!
//! ```text
//!   DeviceRecord list ──► DeviceIndex (serial / mac / name)
//!                              │
//!   PairedLink stream ─────────┤   per-endpoint resolution
//!   NeighborObservation stream ┤   synthetic externals on miss
//!                              ▼
//!                  appliance-port synthesis ─► node map
//!                  attachment assignment      (BTreeMap)
//!                              │
//!                  edge registrar (canonical undirected keys)
//!                              ▼
//!                  assemble(status map) ─► TopologyGraph
//! ```
//!
//! The whole pipeline is pure and synchronous. All mutable state lives in a
//! run-scoped [`Reconstruction`] value — no process-wide caches — so
//! separate runs are independent and identical input yields identical
//! output. Malformed data never fails a run: the smallest possible unit
//! (one record, one link) is dropped and reconstruction continues.
//!
//! Processing order matters only for first-writer-wins attributes: paired
//! links are processed before per-device observations, each in input order.

pub mod appliance;
pub mod assemble;
pub mod edges;
pub mod index;
pub mod ports;
pub mod resolve;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use topolink_model::{
    classify_model, device_type, DeviceRecord, EdgeDetail, EndpointDescriptor, GraphEdge,
    GraphNode, LinkEnd, NeighborObservation, PairedLink, StatusMap, TopologyGraph,
    NODE_TYPE_EXTERNAL,
};

use crate::index::{normalize_mac, DeviceIndex};
use crate::resolve::{synthetic_cache_key, KeyContext, SyntheticIds};

fn field(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Run-scoped reconstruction context.
///
/// Owns every piece of mutable state one reconstruction needs (node map,
/// edge map, synthetic-id cache) and borrows the caller's device list
/// without mutating or retaining it.
pub struct Reconstruction<'a> {
    index: DeviceIndex<'a>,
    nodes: BTreeMap<String, GraphNode>,
    edges: BTreeMap<String, GraphEdge>,
    synthetic: SyntheticIds,
}

impl<'a> Reconstruction<'a> {
    pub fn new(devices: &'a [DeviceRecord]) -> Self {
        Self {
            index: DeviceIndex::build(devices),
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            synthetic: SyntheticIds::default(),
        }
    }

    /// Lower pre-aggregated links (link-layer topology exports).
    ///
    /// Both ends resolve through the full resolver. In a peer link neither
    /// device is the designated upstream, so attachment ports are assigned
    /// only to endpoints that are not known-device nodes (synthetic
    /// externals and appliance-port expansions), fed by the opposite end's
    /// discovered port.
    pub fn add_link_layer(&mut self, links: &[PairedLink]) {
        for link in links {
            self.add_paired_link(link);
        }
    }

    fn add_paired_link(&mut self, link: &PairedLink) {
        let [a, b] = &link.ends;
        let (id_a, known_a) = self.resolve_link_end(a);
        let (id_b, known_b) = self.resolve_link_end(b);
        if id_a == id_b {
            tracing::debug!(id = %id_a, "dropping link whose ends resolve to one node");
            return;
        }

        let (node_a, fixed_a) = self.effective_endpoint(&id_a, known_a, a.port_id.as_deref());
        let (node_b, fixed_b) = self.effective_endpoint(&id_b, known_b, b.port_id.as_deref());

        // fixed_* endpoints are plain known-device nodes; they self-report
        // and never take an attachment port from a peer link.
        if !fixed_a {
            if let (Some(port), Some(node)) = (b.port_id.as_deref(), self.nodes.get_mut(&node_a)) {
                ports::assign_attachment(node, port, a.port_id.as_deref());
            }
        }
        if !fixed_b {
            if let (Some(port), Some(node)) = (a.port_id.as_deref(), self.nodes.get_mut(&node_b)) {
                ports::assign_attachment(node, port, b.port_id.as_deref());
            }
        }

        let label_a = self.nodes.get(&node_a).map(|n| n.label.clone());
        let label_b = self.nodes.get(&node_b).map(|n| n.label.clone());
        edges::register_edge(
            &mut self.edges,
            &node_a,
            &node_b,
            Some(EdgeDetail {
                protocol: b.protocol,
                local_port: a.port_id.clone(),
                remote_port: b.port_id.clone(),
                remote_name: label_b,
            }),
        );
        edges::register_edge(
            &mut self.edges,
            &node_b,
            &node_a,
            Some(EdgeDetail {
                protocol: a.protocol,
                local_port: b.port_id.clone(),
                remote_port: a.port_id.clone(),
                remote_name: label_a,
            }),
        );
    }

    /// Consume directed observations (per-device discovery tables, flat
    /// neighbor lists). The local device is the upstream: a known remote
    /// attaches on `local_port`, and an appliance-class remote with a known
    /// port expands into its per-port node.
    pub fn add_observations(&mut self, observations: &[NeighborObservation]) {
        for obs in observations {
            self.add_observation(obs);
        }
    }

    fn add_observation(&mut self, obs: &NeighborObservation) {
        let local_ctx = KeyContext {
            local_id: obs.local.serial().unwrap_or(""),
            protocol: obs.protocol,
            local_port: None,
        };
        let (local_id, local_known) = self.resolve_endpoint(&obs.local, &local_ctx);
        if let Some(device) = local_known {
            self.ensure_device_node(device);
        }

        let local_port = field(&obs.local_port);
        let remote_ctx = KeyContext {
            local_id: &local_id,
            protocol: obs.protocol,
            local_port,
        };
        let (remote_id, remote_known) = self.resolve_endpoint(&obs.remote, &remote_ctx);
        if local_id == remote_id {
            tracing::debug!(id = %local_id, "dropping self-referential observation");
            return;
        }

        let remote_port = obs.remote.port_id();
        let (target_id, _) = self.effective_endpoint(&remote_id, remote_known, remote_port);

        if let (Some(port), Some(node)) = (local_port, self.nodes.get_mut(&target_id)) {
            ports::assign_attachment(node, port, remote_port);
        }

        let remote_name = obs
            .remote
            .best_label()
            .map(Into::into)
            .or_else(|| self.nodes.get(&target_id).map(|n| n.label.clone()));
        edges::register_edge(
            &mut self.edges,
            &local_id,
            &target_id,
            Some(EdgeDetail {
                protocol: obs.protocol,
                local_port: local_port.map(Into::into),
                remote_port: remote_port.map(Into::into),
                remote_name,
            }),
        );
    }

    /// Merge with the monitoring status map and emit the graph.
    pub fn finish(self, statuses: &StatusMap) -> TopologyGraph {
        assemble::assemble(self.nodes, self.edges, statuses)
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    fn resolve_link_end(&mut self, end: &LinkEnd) -> (String, Option<&'a DeviceRecord>) {
        let mut desc = end.device.clone();
        if desc.port_id.is_none() {
            desc.port_id = end.port_id.clone();
        }
        let ctx = KeyContext {
            local_id: "",
            protocol: end.protocol,
            local_port: None,
        };
        self.resolve_endpoint(&desc, &ctx)
    }

    /// Map a descriptor to a node id, creating the node on first touch.
    ///
    /// Join-key fallback chain: explicit serial / device id, then
    /// normalized hardware address (a mac-shaped chassis id counts), then
    /// lower-cased system name / name, then a synthesized external node.
    fn resolve_endpoint(
        &mut self,
        desc: &EndpointDescriptor,
        ctx: &KeyContext<'_>,
    ) -> (String, Option<&'a DeviceRecord>) {
        let known = desc
            .serial()
            .and_then(|s| self.index.by_serial(s))
            .or_else(|| field(&desc.device_id).and_then(|s| self.index.by_serial(s)))
            .or_else(|| field(&desc.mac).and_then(|m| self.index.by_mac(m)))
            .or_else(|| field(&desc.chassis_id).and_then(|m| self.index.by_mac(m)))
            .or_else(|| field(&desc.system_name).and_then(|n| self.index.by_name(n)))
            .or_else(|| field(&desc.name).and_then(|n| self.index.by_name(n)));
        if let Some(device) = known {
            // Node creation is deferred to `effective_endpoint`: an
            // appliance endpoint may be represented by a per-port node
            // instead of its own.
            return (device.serial.clone(), Some(device));
        }

        let key = synthetic_cache_key(desc, ctx);
        if let Some(id) = self.synthetic.get(&key) {
            return (id.to_string(), None);
        }
        let id = {
            let nodes = &self.nodes;
            let index = &self.index;
            self.synthetic
                .allocate(&key, |c| nodes.contains_key(c) || index.contains_serial(c))
        };
        tracing::debug!(id = %id, key = %key, "synthesized external neighbor node");
        self.nodes.insert(id.clone(), external_node(&id, desc));
        (id, None)
    }

    /// Materialize the node an endpoint actually links through.
    ///
    /// An appliance-class known device with a known port is substituted by
    /// its per-port node — the appliance's own device node is not created
    /// for this link. Every other endpoint gets its device node created on
    /// first touch. Returns the effective node id and whether the endpoint
    /// is a plain known-device node.
    fn effective_endpoint(
        &mut self,
        id: &str,
        known: Option<&'a DeviceRecord>,
        port: Option<&str>,
    ) -> (String, bool) {
        if let (Some(device), Some(port)) = (known, port) {
            let is_appliance = device
                .model
                .as_deref()
                .map(|m| classify_model(m).is_appliance())
                .unwrap_or(false);
            if is_appliance {
                let node = appliance::appliance_port_node(device, port);
                let port_id = node.id.clone();
                self.nodes.entry(port_id.clone()).or_insert(node);
                return (port_id, false);
            }
        }
        if let Some(device) = known {
            self.ensure_device_node(device);
        }
        (id.to_string(), known.is_some())
    }

    fn ensure_device_node(&mut self, device: &DeviceRecord) -> String {
        self.nodes
            .entry(device.serial.clone())
            .or_insert_with(|| GraphNode {
                id: device.serial.clone(),
                label: device.label().to_string(),
                node_type: device_type(device.model.as_deref()),
                model: device.model.clone(),
                mac: device.mac.clone(),
                status: device.status.clone().unwrap_or_default(),
                ..Default::default()
            });
        device.serial.clone()
    }
}

fn external_node(id: &str, desc: &EndpointDescriptor) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        label: desc.best_label().unwrap_or(id).to_string(),
        node_type: NODE_TYPE_EXTERNAL.to_string(),
        model: desc.platform.clone(),
        mac: field(&desc.mac).and_then(normalize_mac),
        status: String::new(),
        ..Default::default()
    }
}

/// One-shot convenience over [`Reconstruction`].
pub fn reconstruct(
    devices: &[DeviceRecord],
    links: &[PairedLink],
    observations: &[NeighborObservation],
    statuses: &StatusMap,
) -> TopologyGraph {
    let mut run = Reconstruction::new(devices);
    run.add_link_layer(links);
    run.add_observations(observations);
    run.finish(statuses)
}
