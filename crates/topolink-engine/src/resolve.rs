//! Synthetic-node identity: cache keys, slugs, collision-free ids.
//!
//! Neighbors that resolve to no known device still need stable graph nodes
//! so the topology keeps its shape. Two observations carrying the same
//! identity fields must land on the same node within a run, and ids must
//! come out identical across runs given identical input, so everything
//! here is a pure function of the observation plus run-local collision
//! state.

use ahash::AHashMap;
use topolink_model::{EndpointDescriptor, Protocol};

const SLUG_MAX: usize = 40;

/// Prefix on every synthesized external-node id.
pub const EXTERNAL_ID_PREFIX: &str = "ext-";

/// Lower-case, non-alphanumeric → `-`, runs collapsed, trimmed, truncated.
pub fn slugify(s: &str) -> String {
    let mut slug = String::new();
    let mut pending_sep = false;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            // Lowercase expansions can emit combining marks; keep only the
            // alphanumeric parts so slugs stay plain.
            slug.extend(c.to_lowercase().filter(|c| c.is_alphanumeric()));
        } else {
            pending_sep = true;
        }
        if slug.len() >= SLUG_MAX {
            break;
        }
    }
    slug
}

/// Everything the last-resort cache key can draw on when the remote
/// descriptor itself is empty.
pub struct KeyContext<'a> {
    pub local_id: &'a str,
    pub protocol: Protocol,
    pub local_port: Option<&'a str>,
}

/// Build the identity cache key for an unresolved neighbor.
///
/// Priority: first non-empty of systemName / name / deviceId / chassisId /
/// normalized mac, else `port:<portId>`, else a key scoped to the observing
/// device so repeated scans of the same port reuse one node.
pub fn synthetic_cache_key(remote: &EndpointDescriptor, ctx: &KeyContext<'_>) -> String {
    if let Some(field) = remote.best_label() {
        // best_label covers systemName/name/deviceId/chassisId/mac in the
        // required priority order; mac arrives raw, normalize for stability.
        return crate::index::normalize_mac(field).unwrap_or_else(|| field.to_string());
    }
    if let Some(port) = remote.port_id() {
        return format!("port:{port}");
    }
    format!(
        "serial:{}|{}|{}",
        ctx.local_id,
        ctx.protocol.as_str(),
        ctx.local_port.unwrap_or("")
    )
}

/// Run-scoped cache key → synthetic id table.
#[derive(Default)]
pub struct SyntheticIds {
    by_key: AHashMap<String, String>,
}

impl SyntheticIds {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    /// Allocate an id for a fresh cache key. `taken` must report every node
    /// id already in use this run (nodes created so far plus known serials);
    /// collisions get an incrementing numeric suffix.
    pub fn allocate(&mut self, key: &str, taken: impl Fn(&str) -> bool) -> String {
        let slug = slugify(key);
        let base = if slug.is_empty() {
            format!("{EXTERNAL_ID_PREFIX}neighbor")
        } else {
            format!("{EXTERNAL_ID_PREFIX}{slug}")
        };
        let mut candidate = base.clone();
        let mut suffix = 2;
        while taken(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        self.by_key.insert(key.to_string(), candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("Edge Router (rack 2)"), "edge-router-rack-2");
        assert_eq!(slugify("--Weird--"), "weird");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn slugify_truncates_long_labels() {
        let long = "x".repeat(200);
        assert!(slugify(&long).len() <= 40);
    }

    #[test]
    fn cache_key_prefers_identity_fields() {
        let remote = EndpointDescriptor {
            system_name: Some("edge-1".into()),
            port_id: Some("Gi0/1".into()),
            ..Default::default()
        };
        let ctx = KeyContext {
            local_id: "S1",
            protocol: Protocol::Lldp,
            local_port: Some("24"),
        };
        assert_eq!(synthetic_cache_key(&remote, &ctx), "edge-1");

        let remote = EndpointDescriptor {
            port_id: Some("Gi0/1".into()),
            ..Default::default()
        };
        assert_eq!(synthetic_cache_key(&remote, &ctx), "port:Gi0/1");

        let remote = EndpointDescriptor::default();
        assert_eq!(synthetic_cache_key(&remote, &ctx), "serial:S1|lldp|24");
    }

    #[test]
    fn mac_identity_is_normalized_in_key() {
        let remote = EndpointDescriptor {
            mac: Some("AA:BB:CC:00:00:09".into()),
            ..Default::default()
        };
        let ctx = KeyContext {
            local_id: "S1",
            protocol: Protocol::Cdp,
            local_port: None,
        };
        assert_eq!(synthetic_cache_key(&remote, &ctx), "aabbcc000009");
    }

    #[test]
    fn allocation_suffixes_on_collision() {
        let mut ids = SyntheticIds::default();
        let a = ids.allocate("printer", |_| false);
        assert_eq!(a, "ext-printer");
        let b = ids.allocate("Printer!", |id| id == "ext-printer");
        assert_eq!(b, "ext-printer-2");
        let c = ids.allocate("printer?", |id| id == "ext-printer" || id == "ext-printer-2");
        assert_eq!(c, "ext-printer-3");
    }
}
