//! Device index: three lookup tables over the caller's device list.
//!
//! Read-only after construction. Records without a serial are skipped;
//! there is no other validation.

use ahash::AHashMap;
use topolink_model::DeviceRecord;

/// Lower-case a hardware address down to its hex digits.
///
/// Returns `None` unless exactly 12 hex digits remain, so mac-shaped
/// strings from any formatting convention (`aa:bb:..`, `aabb.ccdd.eeff`,
/// `AA-BB-..`) normalize to one join key and everything else is rejected.
pub fn normalize_mac(raw: &str) -> Option<String> {
    let hex: String = raw
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    (hex.len() == 12).then_some(hex)
}

pub struct DeviceIndex<'a> {
    by_serial: AHashMap<String, &'a DeviceRecord>,
    by_mac: AHashMap<String, &'a DeviceRecord>,
    by_lower_name: AHashMap<String, &'a DeviceRecord>,
}

impl<'a> DeviceIndex<'a> {
    pub fn build(devices: &'a [DeviceRecord]) -> Self {
        let mut by_serial = AHashMap::new();
        let mut by_mac = AHashMap::new();
        let mut by_lower_name = AHashMap::new();
        for device in devices {
            if device.serial.trim().is_empty() {
                continue;
            }
            by_serial.insert(device.serial.clone(), device);
            if let Some(mac) = device.mac.as_deref().and_then(normalize_mac) {
                by_mac.insert(mac, device);
            }
            if let Some(name) = device.name.as_deref() {
                let name = name.trim();
                if !name.is_empty() {
                    by_lower_name.insert(name.to_lowercase(), device);
                }
            }
        }
        Self {
            by_serial,
            by_mac,
            by_lower_name,
        }
    }

    pub fn by_serial(&self, serial: &str) -> Option<&'a DeviceRecord> {
        self.by_serial.get(serial.trim()).copied()
    }

    /// Lookup by hardware address in any formatting convention.
    pub fn by_mac(&self, raw: &str) -> Option<&'a DeviceRecord> {
        let mac = normalize_mac(raw)?;
        self.by_mac.get(&mac).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&'a DeviceRecord> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.by_lower_name.get(&name.to_lowercase()).copied()
    }

    pub fn contains_serial(&self, id: &str) -> bool {
        self.by_serial.contains_key(id)
    }
}
