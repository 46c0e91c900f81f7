//! Model-prefix → device-class capability table.
//!
//! Appliance detection drives per-port node synthesis in the engine, so the
//! allow-list lives here as an explicit table rather than ad hoc string
//! matching scattered through the algorithm.

/// Coarse device class, derived from the model string prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Security/gateway/UTM appliances. These commonly terminate several
    /// distinct physical links (WAN/LAN ports), so the engine expands them
    /// into per-port nodes.
    Appliance,
    Switch,
    Wireless,
    Camera,
    Sensor,
    Cellular,
    Unknown,
}

impl DeviceClass {
    pub fn is_appliance(self) -> bool {
        matches!(self, Self::Appliance)
    }
}

/// Longest-prefix-wins, case-insensitive. Order within the table does not
/// matter; `classify_model` scans for the longest matching prefix.
const MODEL_CLASSES: &[(&str, DeviceClass)] = &[
    ("MX", DeviceClass::Appliance),
    ("Z1", DeviceClass::Appliance),
    ("Z3", DeviceClass::Appliance),
    ("Z4", DeviceClass::Appliance),
    ("UTM", DeviceClass::Appliance),
    ("MS", DeviceClass::Switch),
    ("MR", DeviceClass::Wireless),
    ("CW", DeviceClass::Wireless),
    ("MV", DeviceClass::Camera),
    ("MT", DeviceClass::Sensor),
    ("MG", DeviceClass::Cellular),
];

/// Classify a device model string.
pub fn classify_model(model: &str) -> DeviceClass {
    let model = model.trim().to_ascii_uppercase();
    let mut best: Option<(&str, DeviceClass)> = None;
    for &(prefix, class) in MODEL_CLASSES {
        if model.starts_with(prefix) {
            match best {
                Some((p, _)) if p.len() >= prefix.len() => {}
                _ => best = Some((prefix, class)),
            }
        }
    }
    best.map(|(_, c)| c).unwrap_or(DeviceClass::Unknown)
}

/// Node `type` for a known device: the two-letter model prefix, lower-cased.
pub fn device_type(model: Option<&str>) -> String {
    let model = model.map(str::trim).unwrap_or("");
    if model.is_empty() {
        return "unknown".to_string();
    }
    model.chars().take(2).flat_map(char::to_lowercase).collect()
}
