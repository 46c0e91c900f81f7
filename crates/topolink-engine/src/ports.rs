//! Port-identifier heuristics and attachment assignment.

use regex::Regex;
use std::sync::OnceLock;
use topolink_model::GraphNode;

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("static pattern"))
}

/// Extract a port number from a free-form vendor port identifier.
///
/// Takes the *first* run of digits, not the most specific one: `"Port 24"`
/// → 24, but `"Gi1/0/2"` → 1. Known approximation — chassis/slot/port
/// triples keep the chassis group. Returns `None` when the identifier has
/// no digits or the run overflows `u32`.
pub fn port_number(raw: &str) -> Option<u32> {
    digit_run().find(raw)?.as_str().parse().ok()
}

/// Record where a node attaches on its closest known upstream device.
///
/// First writer wins: once a node has a port assignment, later
/// observations never overwrite it. An identifier without digits is not a
/// successful assignment and leaves the slot open.
pub fn assign_attachment(node: &mut GraphNode, upstream_port: &str, own_port: Option<&str>) {
    if node.switch_port.is_some() {
        return;
    }
    let Some(number) = port_number(upstream_port) else {
        return;
    };
    node.switch_port = Some(number);
    node.switch_port_raw = Some(upstream_port.to_string());
    node.connected_to_port = own_port.map(Into::into);
}
