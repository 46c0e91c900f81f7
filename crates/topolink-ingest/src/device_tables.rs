//! Variant B: per-device discovery tables.
//!
//! Shape: a map `serial → payload`, where port-level records may sit under
//! any of `ports`, `interfaces`, `entries`, or `neighbors` — all present
//! sources are merged into one record stream. A record carrying `lldp`
//! and/or `cdp` sub-objects yields one observation per sub-object; a
//! record with neither is itself the remote identity bag.

use serde_json::Value;
use topolink_model::{EndpointDescriptor, NeighborObservation, Protocol};

use crate::{descriptor_from, get_str, IngestError};

const RECORD_SOURCES: &[&str] = &["ports", "interfaces", "entries", "neighbors"];

pub fn parse_discovery_tables(value: &Value) -> Result<Vec<NeighborObservation>, IngestError> {
    let tables = value.as_object().ok_or(IngestError::UnexpectedShape {
        input: "discovery tables",
        expected: "an object map of serial to payload",
    })?;

    let mut out = Vec::new();
    for (serial, payload) in tables {
        let Some(payload) = payload.as_object() else {
            tracing::debug!(serial = %serial, "skipping non-object discovery payload");
            continue;
        };
        let local = EndpointDescriptor {
            serial: Some(serial.clone()),
            ..Default::default()
        };
        for source in RECORD_SOURCES {
            let Some(records) = payload.get(*source).and_then(Value::as_array) else {
                continue;
            };
            for record in records {
                record_observations(&local, record, &mut out);
            }
        }
    }
    Ok(out)
}

fn record_observations(
    local: &EndpointDescriptor,
    record: &Value,
    out: &mut Vec<NeighborObservation>,
) {
    let Some(record) = record.as_object() else {
        tracing::debug!("skipping non-object discovery record");
        return;
    };
    let lldp = record.get("lldp").and_then(Value::as_object);
    let cdp = record.get("cdp").and_then(Value::as_object);

    if lldp.is_some() || cdp.is_some() {
        let local_port = get_str(record, &["portId", "port", "localPort"]);
        if let Some(lldp) = lldp {
            out.push(NeighborObservation {
                protocol: Protocol::Lldp,
                local: local.clone(),
                local_port: local_port.clone(),
                remote: descriptor_from(lldp),
            });
        }
        if let Some(cdp) = cdp {
            out.push(NeighborObservation {
                protocol: Protocol::Cdp,
                local: local.clone(),
                local_port,
                remote: descriptor_from(cdp),
            });
        }
        return;
    }

    // No protocol sub-records: the record itself is the remote bag, so its
    // `portId` belongs to the remote and the local port can only come from
    // the remaining aliases.
    let remote = descriptor_from(record);
    if !remote.has_identity() {
        tracing::debug!("skipping discovery record without remote identity");
        return;
    }
    let protocol = get_str(record, &["protocol"])
        .map(|p| Protocol::parse(&p))
        .unwrap_or_default();
    out.push(NeighborObservation {
        protocol,
        local: local.clone(),
        local_port: get_str(record, &["port", "localPort"]),
        remote,
    });
}
