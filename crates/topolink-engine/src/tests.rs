//! Engine-level behavior tests: the reconstruction properties the graph
//! consumers rely on.

use crate::{reconstruct, Reconstruction};
use topolink_model::{
    DeviceRecord, EndpointDescriptor, LinkEnd, NeighborObservation, PairedLink, Protocol,
    StatusMap,
};

fn device(serial: &str, model: &str, mac: &str) -> DeviceRecord {
    DeviceRecord {
        serial: serial.into(),
        model: Some(model.into()),
        mac: Some(mac.into()),
        ..Default::default()
    }
}

fn by_serial(desc_serial: &str) -> EndpointDescriptor {
    EndpointDescriptor {
        serial: Some(desc_serial.into()),
        ..Default::default()
    }
}

fn observation(
    local: &str,
    local_port: Option<&str>,
    remote: EndpointDescriptor,
) -> NeighborObservation {
    NeighborObservation {
        protocol: Protocol::Lldp,
        local: by_serial(local),
        local_port: local_port.map(Into::into),
        remote,
    }
}

fn paired(a: (&str, Option<&str>), b: (&str, Option<&str>)) -> PairedLink {
    PairedLink {
        ends: [
            LinkEnd {
                device: by_serial(a.0),
                protocol: Protocol::Lldp,
                port_id: a.1.map(Into::into),
            },
            LinkEnd {
                device: by_serial(b.0),
                protocol: Protocol::Lldp,
                port_id: b.1.map(Into::into),
            },
        ],
    }
}

// ============================================================================
// Empty input / determinism
// ============================================================================

#[test]
fn empty_input_yields_empty_graph() {
    let graph = reconstruct(&[], &[], &[], &StatusMap::new());
    assert!(graph.nodes.is_empty());
    assert!(graph.links.is_empty());
}

#[test]
fn identical_input_yields_identical_output() {
    let devices = vec![
        device("S1", "MS220-8P", "aa:bb:cc:00:00:01"),
        device("S2", "MX84", "aa:bb:cc:00:00:02"),
    ];
    let links = vec![paired(("S1", Some("Port 24")), ("S2", Some("Port 2")))];
    let observations = vec![observation(
        "S1",
        Some("3"),
        EndpointDescriptor {
            system_name: Some("printer-9".into()),
            ..Default::default()
        },
    )];
    let statuses = StatusMap::from([("S1".to_string(), "online".to_string())]);

    let first = reconstruct(&devices, &links, &observations, &statuses);
    let second = reconstruct(&devices, &links, &observations, &statuses);
    assert_eq!(first, second);
}

// ============================================================================
// Bidirectional dedup / self-loops
// ============================================================================

#[test]
fn bidirectional_observations_produce_one_edge() {
    let devices = vec![
        device("S1", "MS220-8P", "aa:bb:cc:00:00:01"),
        device("S2", "MS220-8P", "aa:bb:cc:00:00:02"),
    ];
    let observations = vec![
        observation("S1", Some("24"), by_serial("S2")),
        observation("S2", Some("1"), by_serial("S1")),
    ];
    let graph = reconstruct(&devices, &[], &observations, &StatusMap::new());

    assert_eq!(graph.links.len(), 1);
    let edge = &graph.links[0];
    assert_eq!((edge.source.as_str(), edge.target.as_str()), ("S1", "S2"));
    assert!(edge.details.len() >= 2);
}

#[test]
fn self_referential_observation_contributes_no_edge() {
    let devices = vec![device("S1", "MS220-8P", "aa:bb:cc:00:00:01")];
    // Same device reachable via serial and via mac: both resolve to S1.
    let observations = vec![observation(
        "S1",
        Some("24"),
        EndpointDescriptor {
            mac: Some("AA:BB:CC:00:00:01".into()),
            ..Default::default()
        },
    )];
    let graph = reconstruct(&devices, &[], &observations, &StatusMap::new());
    assert!(graph.links.is_empty());
}

#[test]
fn link_whose_ends_resolve_to_one_node_is_dropped() {
    let devices = vec![device("S1", "MS220-8P", "aa:bb:cc:00:00:01")];
    let links = vec![paired(("S1", Some("1")), ("S1", Some("2")))];
    let graph = reconstruct(&devices, &links, &[], &StatusMap::new());
    assert!(graph.links.is_empty());
}

// ============================================================================
// First-writer-wins attachment
// ============================================================================

#[test]
fn first_port_assignment_wins() {
    let devices = vec![
        device("S1", "MS220-8P", "aa:bb:cc:00:00:01"),
        device("S2", "MS220-8P", "aa:bb:cc:00:00:02"),
        device("AP", "MR33", "aa:bb:cc:00:00:03"),
    ];
    // Two different upstreams claim AP on different ports; the first
    // observation processed wins.
    let observations = vec![
        observation("S1", Some("Port 7"), by_serial("AP")),
        observation("S2", Some("Port 9"), by_serial("AP")),
    ];
    let graph = reconstruct(&devices, &[], &observations, &StatusMap::new());

    let ap = graph.nodes.iter().find(|n| n.id == "AP").unwrap();
    assert_eq!(ap.switch_port, Some(7));
    assert_eq!(ap.switch_port_raw.as_deref(), Some("Port 7"));
    assert_eq!(graph.links.len(), 2);
}

// ============================================================================
// Synthetic externals
// ============================================================================

#[test]
fn unresolved_neighbors_with_same_identity_share_a_node() {
    let devices = vec![
        device("S1", "MS220-8P", "aa:bb:cc:00:00:01"),
        device("S2", "MS220-8P", "aa:bb:cc:00:00:02"),
    ];
    let edge_router = EndpointDescriptor {
        system_name: Some("edge-router".into()),
        ..Default::default()
    };
    let observations = vec![
        observation("S1", Some("1"), edge_router.clone()),
        observation("S2", Some("2"), edge_router),
    ];
    let graph = reconstruct(&devices, &[], &observations, &StatusMap::new());

    let externals: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| n.node_type == "external")
        .collect();
    assert_eq!(externals.len(), 1);
    assert_eq!(externals[0].id, "ext-edge-router");
    assert_eq!(externals[0].label, "edge-router");
    assert_eq!(graph.links.len(), 2);
}

#[test]
fn distinct_identities_get_distinct_external_ids() {
    let devices = vec![device("S1", "MS220-8P", "aa:bb:cc:00:00:01")];
    let observations = vec![
        observation(
            "S1",
            Some("1"),
            EndpointDescriptor {
                system_name: Some("printer".into()),
                ..Default::default()
            },
        ),
        observation(
            "S1",
            Some("2"),
            EndpointDescriptor {
                system_name: Some("printer 2".into()),
                ..Default::default()
            },
        ),
    ];
    let graph = reconstruct(&devices, &[], &observations, &StatusMap::new());

    let mut ids: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| n.node_type == "external")
        .map(|n| n.id.clone())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["ext-printer", "ext-printer-2"]);
}

#[test]
fn external_nodes_get_attachment_ports() {
    let devices = vec![device("S1", "MS220-8P", "aa:bb:cc:00:00:01")];
    let observations = vec![observation(
        "S1",
        Some("Port 12"),
        EndpointDescriptor {
            system_name: Some("camera-lobby".into()),
            port_id: Some("eth0".into()),
            ..Default::default()
        },
    )];
    let graph = reconstruct(&devices, &[], &observations, &StatusMap::new());

    let ext = graph.nodes.iter().find(|n| n.id == "ext-camera-lobby").unwrap();
    assert_eq!(ext.switch_port, Some(12));
    assert_eq!(ext.switch_port_raw.as_deref(), Some("Port 12"));
    assert_eq!(ext.connected_to_port.as_deref(), Some("eth0"));
}

// ============================================================================
// Appliance-port synthesis
// ============================================================================

#[test]
fn two_links_into_one_appliance_stay_distinct() {
    let devices = vec![
        device("S1", "MS220-8P", "aa:bb:cc:00:00:01"),
        device("S2", "MS220-8P", "aa:bb:cc:00:00:02"),
        device("FW", "MX84", "aa:bb:cc:00:00:09"),
    ];
    let observations = vec![
        observation(
            "S1",
            Some("24"),
            EndpointDescriptor {
                serial: Some("FW".into()),
                port_id: Some("Port 2".into()),
                ..Default::default()
            },
        ),
        observation(
            "S2",
            Some("24"),
            EndpointDescriptor {
                serial: Some("FW".into()),
                port_id: Some("Port 3".into()),
                ..Default::default()
            },
        ),
    ];
    let graph = reconstruct(&devices, &[], &observations, &StatusMap::new());

    let port_nodes: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| n.node_type == "appliance-port")
        .collect();
    assert_eq!(port_nodes.len(), 2);
    for node in &port_nodes {
        assert_eq!(node.appliance_serial.as_deref(), Some("FW"));
    }
    assert_eq!(graph.links.len(), 2, "one edge per appliance port");
    assert!(graph.nodes.iter().all(|n| n.id != "FW"));
}

#[test]
fn non_appliance_neighbors_skip_port_synthesis() {
    let devices = vec![
        device("S1", "MS220-8P", "aa:bb:cc:00:00:01"),
        device("AP", "MR33", "aa:bb:cc:00:00:03"),
    ];
    let observations = vec![observation(
        "S1",
        Some("24"),
        EndpointDescriptor {
            serial: Some("AP".into()),
            port_id: Some("Port 0".into()),
            ..Default::default()
        },
    )];
    let graph = reconstruct(&devices, &[], &observations, &StatusMap::new());
    assert!(graph.nodes.iter().any(|n| n.id == "AP"));
    assert!(graph.nodes.iter().all(|n| n.node_type != "appliance-port"));
}

// ============================================================================
// Status fallback chain
// ============================================================================

#[test]
fn status_falls_back_map_then_record_then_unknown() {
    let mut with_status = device("S1", "MS220-8P", "aa:bb:cc:00:00:01");
    with_status.status = Some("offline".into());
    let devices = vec![
        with_status,
        device("S2", "MS220-8P", "aa:bb:cc:00:00:02"),
        device("S3", "MS220-8P", "aa:bb:cc:00:00:03"),
    ];
    let observations = vec![
        observation("S1", None, by_serial("S2")),
        observation("S2", None, by_serial("S3")),
    ];
    let statuses = StatusMap::from([("S2".to_string(), "alerting".to_string())]);
    let graph = reconstruct(&devices, &[], &observations, &statuses);

    let status = |id: &str| {
        graph
            .nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.status.clone())
            .unwrap()
    };
    assert_eq!(status("S1"), "offline"); // record status, no map entry
    assert_eq!(status("S2"), "alerting"); // map wins
    assert_eq!(status("S3"), "unknown"); // neither
}

// ============================================================================
// End-to-end: paired link into an appliance
// ============================================================================

#[test]
fn paired_link_into_appliance_end_to_end() {
    let devices = vec![
        device("S1", "MS1", "aa:bb:cc:00:00:01"),
        device("S2", "MX1", "aa:bb:cc:00:00:02"),
    ];
    let links = vec![paired(("S1", Some("Port 24")), ("S2", Some("Port 2")))];
    let graph = reconstruct(&devices, &links, &[], &StatusMap::new());

    let mut ids: Vec<_> = graph.nodes.iter().map(|n| n.id.clone()).collect();
    ids.sort();
    assert_eq!(ids, vec!["S1", "S2-port-2"]);

    let s1 = graph.nodes.iter().find(|n| n.id == "S1").unwrap();
    assert_eq!(s1.switch_port, None, "the upstream switch keeps no attachment port");

    let port_node = graph.nodes.iter().find(|n| n.id == "S2-port-2").unwrap();
    assert_eq!(port_node.port_number.as_deref(), Some("2"));
    assert_eq!(port_node.appliance_serial.as_deref(), Some("S2"));

    assert_eq!(graph.links.len(), 1);
    let edge = &graph.links[0];
    assert_eq!(
        (edge.source.as_str(), edge.target.as_str()),
        ("S1", "S2-port-2")
    );
    assert_eq!(edge.details.len(), 2);
}

// ============================================================================
// Incremental context reuse within one run
// ============================================================================

#[test]
fn sources_can_be_added_in_stages() {
    let devices = vec![
        device("S1", "MS220-8P", "aa:bb:cc:00:00:01"),
        device("S2", "MS220-8P", "aa:bb:cc:00:00:02"),
    ];
    let mut run = Reconstruction::new(&devices);
    run.add_link_layer(&[paired(("S1", Some("1")), ("S2", Some("49")))]);
    run.add_observations(&[observation("S1", Some("1"), by_serial("S2"))]);
    let graph = run.finish(&StatusMap::new());

    // Both sources describe the same physical link: one edge, merged detail.
    assert_eq!(graph.links.len(), 1);
    assert_eq!(graph.links[0].details.len(), 3);
}
