//! Variant A: pre-built link-layer topology with paired link endpoints.
//!
//! Shape: `{ nodes?: [...], links: [{ ends: [{device, discovered: {lldp?,
//! cdp?}}, ...] }] }`. The optional `nodes` array acts as a side-table for
//! link ends that reference a node by bare id instead of carrying a full
//! device descriptor. Links without two device-bearing ends are dropped.

use serde_json::Value;
use std::collections::HashMap;
use topolink_model::{EndpointDescriptor, LinkEnd, PairedLink, Protocol};

use crate::{descriptor_from, get_str, scalar_string, IngestError};

pub fn parse_link_layer(value: &Value) -> Result<Vec<PairedLink>, IngestError> {
    let obj = value.as_object().ok_or(IngestError::UnexpectedShape {
        input: "link-layer topology",
        expected: "an object",
    })?;
    let links = obj
        .get("links")
        .and_then(Value::as_array)
        .ok_or(IngestError::UnexpectedShape {
            input: "link-layer topology",
            expected: "a links array",
        })?;

    let node_table = node_table(obj.get("nodes"));

    let mut out = Vec::new();
    for link in links {
        let ends = link
            .as_object()
            .and_then(|l| l.get("ends"))
            .and_then(Value::as_array);
        let Some(ends) = ends else {
            tracing::debug!("dropping link without ends");
            continue;
        };
        let mut parsed: Vec<LinkEnd> = ends
            .iter()
            .filter_map(|end| parse_end(end, &node_table))
            .collect();
        if parsed.len() < 2 {
            tracing::debug!("dropping link without two device-bearing ends");
            continue;
        }
        parsed.truncate(2);
        let Ok(ends) = <[LinkEnd; 2]>::try_from(parsed) else {
            continue;
        };
        out.push(PairedLink { ends });
    }
    Ok(out)
}

/// Side-table: node id → descriptor, from the optional `nodes` array.
fn node_table(nodes: Option<&Value>) -> HashMap<String, EndpointDescriptor> {
    let mut table = HashMap::new();
    let Some(nodes) = nodes.and_then(Value::as_array) else {
        return table;
    };
    for node in nodes {
        let Some(obj) = node.as_object() else {
            continue;
        };
        let Some(id) = get_str(obj, &["id", "nodeId"]) else {
            continue;
        };
        // Identity may sit on the node entry itself or under a nested
        // `device` object.
        let desc = match obj.get("device").and_then(Value::as_object) {
            Some(device) => descriptor_from(device),
            None => descriptor_from(obj),
        };
        table.insert(id, desc);
    }
    table
}

fn parse_end(value: &Value, table: &HashMap<String, EndpointDescriptor>) -> Option<LinkEnd> {
    let obj = value.as_object()?;
    let device = obj.get("device")?;
    let mut desc = match device {
        Value::Object(d) => {
            let mut desc = descriptor_from(d);
            if !desc.has_identity() {
                // A descriptor that only references a topology node.
                if let Some(mapped) = get_str(d, &["id", "nodeId"]).and_then(|id| table.get(&id)) {
                    desc = mapped.clone();
                }
            }
            desc
        }
        // A bare scalar is a node reference; fall back to treating it as a
        // serial so unknown references still resolve deterministically.
        other => {
            let id = scalar_string(other)?;
            table.get(&id).cloned().unwrap_or(EndpointDescriptor {
                serial: Some(id),
                ..Default::default()
            })
        }
    };
    if !desc.has_identity() {
        return None;
    }

    let discovered = obj.get("discovered").and_then(Value::as_object);
    let lldp = discovered.and_then(|d| d.get("lldp")).and_then(Value::as_object);
    let cdp = discovered.and_then(|d| d.get("cdp")).and_then(Value::as_object);

    let lldp_port = lldp.and_then(|l| get_str(l, &["portId"]));
    let cdp_port = cdp.and_then(|c| get_str(c, &["portId"]));
    let (protocol, port_id) = match (lldp_port, cdp_port) {
        (Some(port), _) => (Protocol::Lldp, Some(port)),
        (None, Some(port)) => (Protocol::Cdp, Some(port)),
        (None, None) if lldp.is_some() => (Protocol::Lldp, None),
        (None, None) if cdp.is_some() => (Protocol::Cdp, None),
        (None, None) => (Protocol::Unknown, None),
    };

    // The discovered sub-record is the authority for the port; identity
    // stays with the device descriptor.
    if desc.port_id.is_none() {
        desc.port_id = port_id.clone();
    }
    Some(LinkEnd {
        device: desc,
        protocol,
        port_id,
    })
}
