//! Default reference ids and tag conventions for new records

use crate::inventory::AssetClass;
use serde::{Deserialize, Serialize};

/// Remote ids applied to records the agent creates, plus tag naming conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub status_id: u64,
    pub company_id: u64,
    pub laptop_category_id: u64,
    pub laptop_fieldset_id: u64,
    pub desktop_category_id: u64,
    pub desktop_fieldset_id: u64,
    pub server_category_id: u64,
    pub server_fieldset_id: u64,
    pub monitor_category_id: u64,
    pub monitor_fieldset_id: u64,
    /// Computer tag pattern, e.g. `IT-N`. Empty keeps the hostname as tag.
    pub naming_convention: String,
    /// Monitor tag pattern, e.g. `MIS-MON-2025-N`. Empty keeps the serial as tag.
    pub monitor_naming_convention: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            status_id: 2,
            company_id: 1,
            laptop_category_id: 2,
            laptop_fieldset_id: 1,
            desktop_category_id: 3,
            desktop_fieldset_id: 1,
            server_category_id: 4,
            server_fieldset_id: 1,
            monitor_category_id: 5,
            monitor_fieldset_id: 2,
            naming_convention: String::new(),
            monitor_naming_convention: String::new(),
        }
    }
}

impl DefaultsConfig {
    /// `(category_id, fieldset_id)` for a computer class.
    pub fn category_for(&self, class: AssetClass) -> (u64, u64) {
        match class {
            AssetClass::Laptop => (self.laptop_category_id, self.laptop_fieldset_id),
            AssetClass::Desktop => (self.desktop_category_id, self.desktop_fieldset_id),
            AssetClass::Server => (self.server_category_id, self.server_fieldset_id),
        }
    }

    /// `(category_id, fieldset_id)` for monitors.
    pub fn monitor_category(&self) -> (u64, u64) {
        (self.monitor_category_id, self.monitor_fieldset_id)
    }

    pub(crate) fn ids(&self) -> [(&'static str, u64); 10] {
        [
            ("status_id", self.status_id),
            ("company_id", self.company_id),
            ("laptop_category_id", self.laptop_category_id),
            ("laptop_fieldset_id", self.laptop_fieldset_id),
            ("desktop_category_id", self.desktop_category_id),
            ("desktop_fieldset_id", self.desktop_fieldset_id),
            ("server_category_id", self.server_category_id),
            ("server_fieldset_id", self.server_fieldset_id),
            ("monitor_category_id", self.monitor_category_id),
            ("monitor_fieldset_id", self.monitor_fieldset_id),
        ]
    }
}
