//! Topolink input adapters
//!
//! Three vendor payload shapes describe (parts of) the same physical
//! topology, with overlapping and sometimes contradictory content:
//!
//! - a pre-built link-layer topology with paired link endpoints
//!   ([`link_layer`]),
//! - a per-device map of discovery-protocol port records
//!   ([`device_tables`]),
//! - a flat neighbor list without port-level detail ([`flat`]).
//!
//! Each adapter is one explicit parse step from `serde_json::Value` into
//! the canonical stream types of `topolink-model` — no speculative field
//! probing inside the engine. Error handling is deliberately lopsided:
//! a payload whose *top level* is the wrong shape is an [`IngestError`]
//! (the caller handed us the wrong document), while anything malformed
//! below that is best-effort — the record is dropped with a debug event
//! and parsing continues.

pub mod device_tables;
pub mod flat;
pub mod link_layer;

use serde_json::Value;
use thiserror::Error;
use topolink_model::{DeviceRecord, EndpointDescriptor, StatusMap};

pub use device_tables::parse_discovery_tables;
pub use flat::parse_flat_discovery;
pub use link_layer::parse_link_layer;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{input}: expected {expected} at the top level")]
    UnexpectedShape {
        input: &'static str,
        expected: &'static str,
    },
}

// ============================================================================
// Shared Value helpers
// ============================================================================

/// String view of a scalar: trimmed non-empty strings and numbers (port
/// identifiers and node ids arrive as either).
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First of `keys` holding a usable scalar.
fn get_str(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(scalar_string))
}

/// Read an endpoint identity bag from a vendor record.
fn descriptor_from(obj: &serde_json::Map<String, Value>) -> EndpointDescriptor {
    EndpointDescriptor {
        serial: get_str(obj, &["serial"]),
        system_name: get_str(obj, &["systemName"]),
        name: get_str(obj, &["name"]),
        device_id: get_str(obj, &["deviceId"]),
        chassis_id: get_str(obj, &["chassisId"]),
        mac: get_str(obj, &["mac"]),
        port_id: get_str(obj, &["portId"]),
        platform: get_str(obj, &["platform"]),
    }
}

// ============================================================================
// Device list / status map
// ============================================================================

/// Parse the known-device list. Entries without a non-empty serial are
/// skipped; nothing else is validated.
pub fn parse_device_list(value: &Value) -> Result<Vec<DeviceRecord>, IngestError> {
    let entries = value.as_array().ok_or(IngestError::UnexpectedShape {
        input: "device list",
        expected: "an array",
    })?;
    let mut devices = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(obj) = entry.as_object() else {
            tracing::debug!("skipping non-object device entry");
            continue;
        };
        let Some(serial) = get_str(obj, &["serial"]) else {
            tracing::debug!("skipping device record without serial");
            continue;
        };
        devices.push(DeviceRecord {
            serial,
            name: get_str(obj, &["name"]),
            model: get_str(obj, &["model"]),
            mac: get_str(obj, &["mac"]),
            status: get_str(obj, &["status"]),
        });
    }
    Ok(devices)
}

/// Parse the monitoring status map: either an object map `serial → status`
/// or an array of `{serial, status}` records.
pub fn parse_status_map(value: &Value) -> Result<StatusMap, IngestError> {
    let mut statuses = StatusMap::new();
    match value {
        Value::Object(obj) => {
            for (serial, status) in obj {
                if let Some(status) = scalar_string(status) {
                    statuses.insert(serial.clone(), status);
                }
            }
        }
        Value::Array(entries) => {
            for entry in entries {
                let Some(obj) = entry.as_object() else {
                    continue;
                };
                if let (Some(serial), Some(status)) =
                    (get_str(obj, &["serial"]), get_str(obj, &["status"]))
                {
                    statuses.insert(serial, status);
                }
            }
        }
        _ => {
            return Err(IngestError::UnexpectedShape {
                input: "status map",
                expected: "an object or an array",
            })
        }
    }
    Ok(statuses)
}
