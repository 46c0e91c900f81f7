//! Canonical neighbor-observation stream.
//!
//! The three vendor input shapes normalize into two stream element types:
//!
//! - [`NeighborObservation`] — one device heard one neighbor (per-device
//!   discovery tables, flat neighbor lists). `local_port` is a port *on the
//!   local device*, i.e. where the remote attaches.
//! - [`PairedLink`] — a pre-aggregated link with both endpoints already
//!   paired (link-layer topology exports). Each end's `port_id` is that
//!   end's own discovered interface; neither end is a designated upstream.
//!
//! Keeping the paired shape explicit (rather than splitting it into two
//! unidirectional observations at parse time) is what lets the engine treat
//! both endpoints symmetrically when it lowers the link.

use serde::{Deserialize, Serialize};

/// Link-layer discovery protocol that produced an observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Lldp,
    Cdp,
    #[default]
    Unknown,
}

impl Protocol {
    /// Case-insensitive parse; anything unrecognized is `Unknown`, never an
    /// error.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "lldp" => Self::Lldp,
            "cdp" => Self::Cdp,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lldp => "lldp",
            Self::Cdp => "cdp",
            Self::Unknown => "unknown",
        }
    }
}

/// Identity bag for one link endpoint, local or remote.
///
/// Every field is optional; vendor payloads fill in whatever subset they
/// have. The resolver decides which field wins (serial → mac → name).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chassis_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

fn nonempty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl EndpointDescriptor {
    /// True when at least one identity field (anything except `port_id` and
    /// `platform`) is present.
    pub fn has_identity(&self) -> bool {
        nonempty(&self.serial).is_some()
            || nonempty(&self.system_name).is_some()
            || nonempty(&self.name).is_some()
            || nonempty(&self.device_id).is_some()
            || nonempty(&self.chassis_id).is_some()
            || nonempty(&self.mac).is_some()
    }

    /// Most human-readable label available, in fixed priority order.
    pub fn best_label(&self) -> Option<&str> {
        nonempty(&self.system_name)
            .or_else(|| nonempty(&self.name))
            .or_else(|| nonempty(&self.device_id))
            .or_else(|| nonempty(&self.chassis_id))
            .or_else(|| nonempty(&self.mac))
    }

    pub fn serial(&self) -> Option<&str> {
        nonempty(&self.serial)
    }

    pub fn port_id(&self) -> Option<&str> {
        nonempty(&self.port_id)
    }
}

/// One directed observation: `local` heard `remote`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborObservation {
    pub protocol: Protocol,
    pub local: EndpointDescriptor,
    /// Port on the local device where the remote attaches, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_port: Option<String>,
    pub remote: EndpointDescriptor,
}

/// One end of a pre-aggregated link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEnd {
    pub device: EndpointDescriptor,
    pub protocol: Protocol,
    /// This end's own discovered interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_id: Option<String>,
}

/// A pre-aggregated undirected link between two endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedLink {
    pub ends: [LinkEnd; 2],
}
