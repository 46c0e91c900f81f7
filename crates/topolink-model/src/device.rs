//! Caller-owned inputs: the known-device list and the monitoring status map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One known device, as supplied by the upstream inventory.
///
/// `serial` is the primary key; everything else is optional and taken
/// as-is. The engine never mutates these records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub serial: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl DeviceRecord {
    /// Display label: the configured name when present, else the serial.
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.serial,
        }
    }
}

/// Serial → status, supplied by an external monitoring collaborator.
///
/// `BTreeMap` so anything derived from it stays deterministic.
pub type StatusMap = BTreeMap<String, String>;
