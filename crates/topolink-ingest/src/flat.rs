//! Variant C: flat discovery-by-device list.
//!
//! Lower-fidelity fallback without port-level detail: an array of
//! `{serial|deviceSerial|id|mac|name, neighbors|neighbours|adjacents}`
//! pairs. Produces observations without port metadata; identity-less
//! entries and neighbors are dropped.

use serde_json::Value;
use topolink_model::{EndpointDescriptor, NeighborObservation, Protocol};

use crate::{descriptor_from, get_str, IngestError};

const NEIGHBOR_SOURCES: &[&str] = &["neighbors", "neighbours", "adjacents"];

pub fn parse_flat_discovery(value: &Value) -> Result<Vec<NeighborObservation>, IngestError> {
    let entries = value.as_array().ok_or(IngestError::UnexpectedShape {
        input: "flat discovery list",
        expected: "an array",
    })?;

    let mut out = Vec::new();
    for entry in entries {
        let Some(entry) = entry.as_object() else {
            tracing::debug!("skipping non-object flat discovery entry");
            continue;
        };
        let local = EndpointDescriptor {
            serial: get_str(entry, &["serial", "deviceSerial", "id"]),
            mac: get_str(entry, &["mac"]),
            name: get_str(entry, &["name"]),
            ..Default::default()
        };
        if !local.has_identity() {
            tracing::debug!("skipping flat discovery entry without device identity");
            continue;
        }
        let Some(neighbors) = NEIGHBOR_SOURCES
            .iter()
            .find_map(|key| entry.get(*key).and_then(Value::as_array))
        else {
            continue;
        };
        for neighbor in neighbors {
            let (remote, protocol) = match neighbor {
                Value::Object(obj) => {
                    let protocol = get_str(obj, &["protocol"])
                        .map(|p| Protocol::parse(&p))
                        .unwrap_or_default();
                    (descriptor_from(obj), protocol)
                }
                // A bare string neighbor is a name.
                Value::String(name) if !name.trim().is_empty() => (
                    EndpointDescriptor {
                        name: Some(name.trim().to_string()),
                        ..Default::default()
                    },
                    Protocol::Unknown,
                ),
                _ => {
                    tracing::debug!("skipping malformed flat neighbor");
                    continue;
                }
            };
            if !remote.has_identity() {
                tracing::debug!("skipping flat neighbor without identity");
                continue;
            }
            out.push(NeighborObservation {
                protocol,
                local: local.clone(),
                local_port: None,
                remote,
            });
        }
    }
    Ok(out)
}
