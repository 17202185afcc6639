//! Collected computer facts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// SMBIOS chassis codes reported by portable machines.
const LAPTOP_CHASSIS: &[u32] = &[8, 9, 10, 11, 14, 30, 31, 32];
/// SMBIOS chassis codes reported by rack and server enclosures.
const SERVER_CHASSIS: &[u32] = &[17, 23, 24, 25];

/// Computer role, which selects the category and fieldset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Laptop,
    #[default]
    Desktop,
    Server,
}

impl AssetClass {
    /// Classify an SMBIOS chassis type. Unknown codes are desktops.
    pub fn from_chassis_type(chassis_type: u32) -> Self {
        if LAPTOP_CHASSIS.contains(&chassis_type) {
            AssetClass::Laptop
        } else if SERVER_CHASSIS.contains(&chassis_type) {
            AssetClass::Server
        } else {
            AssetClass::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Laptop => "laptop",
            AssetClass::Desktop => "desktop",
            AssetClass::Server => "server",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computer as observed by the local collector.
///
/// `custom_fields` is keyed by the field's display name (`"Operating System"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAsset")]
pub struct CollectedAsset {
    pub hostname: String,
    pub manufacturer: String,
    pub model: String,
    pub serial: String,
    pub class: AssetClass,
    pub custom_fields: BTreeMap<String, String>,
}

/// Wire shape accepted from collectors: the class may be given directly or as a
/// chassis code.
#[derive(Deserialize)]
struct RawAsset {
    hostname: String,
    #[serde(default)]
    manufacturer: String,
    #[serde(default)]
    model: String,
    #[serde(default, alias = "serial_number")]
    serial: String,
    #[serde(default, alias = "asset_type")]
    class: Option<AssetClass>,
    #[serde(default)]
    chassis_type: Option<u32>,
    #[serde(default)]
    custom_fields: BTreeMap<String, String>,
}

impl From<RawAsset> for CollectedAsset {
    fn from(raw: RawAsset) -> Self {
        let class = raw
            .class
            .or_else(|| raw.chassis_type.map(AssetClass::from_chassis_type))
            .unwrap_or_default();
        Self {
            hostname: raw.hostname.trim().to_string(),
            manufacturer: raw.manufacturer.trim().to_string(),
            model: raw.model.trim().to_string(),
            serial: raw.serial.trim().to_string(),
            class,
            custom_fields: raw.custom_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chassis_classification() {
        for code in [8, 9, 10, 11, 14, 30, 31, 32] {
            assert_eq!(AssetClass::from_chassis_type(code), AssetClass::Laptop);
        }
        for code in [17, 23, 24, 25] {
            assert_eq!(AssetClass::from_chassis_type(code), AssetClass::Server);
        }
        assert_eq!(AssetClass::from_chassis_type(3), AssetClass::Desktop);
        assert_eq!(AssetClass::from_chassis_type(0), AssetClass::Desktop);
    }

    #[test]
    fn test_asset_class_serde() {
        let json = serde_json::to_string(&AssetClass::Server).unwrap();
        assert_eq!(json, "\"server\"");
        let class: AssetClass = serde_json::from_str("\"laptop\"").unwrap();
        assert_eq!(class, AssetClass::Laptop);
    }

    #[test]
    fn test_collected_asset_from_chassis_type() {
        let json = r#"{
            "hostname": " LAMAD0150 ",
            "manufacturer": "Dell Inc.",
            "model": "Latitude 5420",
            "serial_number": "0123456789",
            "chassis_type": 10,
            "custom_fields": {"Operating System": "Windows 11 Pro"}
        }"#;
        let asset: CollectedAsset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.hostname, "LAMAD0150");
        assert_eq!(asset.serial, "0123456789");
        assert_eq!(asset.class, AssetClass::Laptop);
        assert_eq!(asset.custom_fields["Operating System"], "Windows 11 Pro");
    }

    #[test]
    fn test_explicit_class_wins_over_chassis() {
        let json = r#"{"hostname": "SRV01", "asset_type": "server", "chassis_type": 3}"#;
        let asset: CollectedAsset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.class, AssetClass::Server);
    }

    #[test]
    fn test_missing_class_defaults_to_desktop() {
        let asset: CollectedAsset = serde_json::from_str(r#"{"hostname": "PC01"}"#).unwrap();
        assert_eq!(asset.class, AssetClass::Desktop);
        assert!(asset.serial.is_empty());
    }
}
