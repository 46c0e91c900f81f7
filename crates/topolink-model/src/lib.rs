//! Topolink canonical data model
//!
//! This crate defines the types the rest of the workspace agrees on:
//!
//! - the caller-owned inputs (`DeviceRecord`, `StatusMap`),
//! - the canonical neighbor-observation stream the ingest adapters produce
//!   (`NeighborObservation`, `PairedLink`),
//! - the graph value the engine emits (`TopologyGraph`), and
//! - the model-prefix → device-class capability table.
//!
//! Everything here is plain data: no IO, no lookup state, no engine logic.

pub mod class;
pub mod device;
pub mod graph;
pub mod observation;

pub use class::{classify_model, device_type, DeviceClass};
pub use device::{DeviceRecord, StatusMap};
pub use graph::{
    EdgeDetail, GraphEdge, GraphNode, TopologyGraph, NODE_TYPE_APPLIANCE_PORT, NODE_TYPE_EXTERNAL,
};
pub use observation::{EndpointDescriptor, LinkEnd, NeighborObservation, PairedLink, Protocol};
