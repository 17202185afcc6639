//! Collected external display facts

use serde::{Deserialize, Serialize};

/// An external monitor reported over EDID.
///
/// `model` may still carry the EDID vendor code (`"PHL 275V8"`); it is cleaned
/// during reconciliation. An empty or placeholder `serial` is replaced by a
/// synthesized identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectedMonitor {
    pub manufacturer: String,
    pub model: String,
    #[serde(alias = "serial_number")]
    pub serial: String,
    pub resolution: String,
    pub native_resolution: String,
    pub refresh_rate: String,
    pub connection_interface: String,
    pub bit_depth: String,
    #[serde(alias = "screen_size")]
    pub monitor_screen_size: String,
}

impl CollectedMonitor {
    /// Display attributes keyed by their configuration name, skipping values that
    /// carry no information (empty or `N/A`).
    pub fn attributes(&self) -> Vec<(&str, &str)> {
        [
            ("resolution", self.resolution.as_str()),
            ("native_resolution", self.native_resolution.as_str()),
            ("refresh_rate", self.refresh_rate.as_str()),
            ("connection_interface", self.connection_interface.as_str()),
            ("bit_depth", self.bit_depth.as_str()),
            ("monitor_screen_size", self.monitor_screen_size.as_str()),
        ]
        .into_iter()
        .map(|(key, value)| (key, value.trim()))
        .filter(|(_, value)| !value.is_empty() && !value.eq_ignore_ascii_case("n/a"))
        .collect()
    }
}
