//! Per-port node synthesis for appliance-class neighbors.
//!
//! A single security/gateway appliance commonly terminates several distinct
//! physical links (multiple WAN/LAN ports). Linking everything to one
//! device node would collapse those links into one edge, so links into an
//! appliance with a known remote port land on a dedicated
//! `<serial>-port-<N>` node instead.

use crate::ports::port_number;
use topolink_model::{DeviceRecord, GraphNode, NODE_TYPE_APPLIANCE_PORT};

/// Derive the port-node id and its `portNumber` value from the raw remote
/// port identifier. The extracted number is used when present; otherwise
/// the raw identifier is embedded verbatim.
pub fn appliance_port_id(serial: &str, port_raw: &str) -> (String, String) {
    let number = match port_number(port_raw) {
        Some(n) => n.to_string(),
        None => port_raw.trim().to_string(),
    };
    (format!("{serial}-port-{number}"), number)
}

/// Build the node for one appliance port. Status/model/mac come from the
/// owning appliance's record so the assembly-time fallback chain applies
/// uniformly.
pub fn appliance_port_node(appliance: &DeviceRecord, port_raw: &str) -> GraphNode {
    let (id, number) = appliance_port_id(&appliance.serial, port_raw);
    GraphNode {
        id,
        label: format!("{} port {}", appliance.label(), number),
        node_type: NODE_TYPE_APPLIANCE_PORT.to_string(),
        model: appliance.model.clone(),
        mac: appliance.mac.clone(),
        status: appliance
            .status
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        appliance_serial: Some(appliance.serial.clone()),
        port_number: Some(number),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_uses_extracted_number() {
        let (id, number) = appliance_port_id("Q2AB-1", "Port 2");
        assert_eq!(id, "Q2AB-1-port-2");
        assert_eq!(number, "2");
    }

    #[test]
    fn id_falls_back_to_raw_identifier() {
        let (id, number) = appliance_port_id("Q2AB-1", "wan");
        assert_eq!(id, "Q2AB-1-port-wan");
        assert_eq!(number, "wan");
    }

    #[test]
    fn node_carries_appliance_metadata() {
        let appliance = DeviceRecord {
            serial: "Q2AB-1".into(),
            name: Some("branch-fw".into()),
            model: Some("MX84".into()),
            status: Some("online".into()),
            ..Default::default()
        };
        let node = appliance_port_node(&appliance, "Port 3");
        assert_eq!(node.id, "Q2AB-1-port-3");
        assert_eq!(node.label, "branch-fw port 3");
        assert_eq!(node.node_type, "appliance-port");
        assert_eq!(node.appliance_serial.as_deref(), Some("Q2AB-1"));
        assert_eq!(node.port_number.as_deref(), Some("3"));
        assert_eq!(node.status, "online");
    }
}
