//! Custom field configuration
//!
//! Each entry ties a collector attribute (the table key) to a Snipe-IT custom field:
//! the human label shown in the UI and the `db_column` key used on the wire.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field keys that change on every run and never trigger an update by themselves.
pub const DEFAULT_VOLATILE_FIELDS: &[&str] = &["disk_space_used", "ram_usage"];

/// One custom field mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub display_name: String,
    pub db_column: String,
    /// Overrides the built-in volatile list for this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatile: Option<bool>,
}

fn default_enabled() -> bool {
    true
}

impl FieldConfig {
    pub fn new(display_name: impl Into<String>, db_column: impl Into<String>) -> Self {
        Self {
            enabled: true,
            display_name: display_name.into(),
            db_column: db_column.into(),
            volatile: None,
        }
    }

    /// Whether changes to this field are ignored by change detection.
    pub fn is_volatile(&self, key: &str) -> bool {
        self.volatile
            .unwrap_or_else(|| DEFAULT_VOLATILE_FIELDS.contains(&key))
    }
}

/// Computer custom fields, grouped as in the collector output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomFieldsConfig {
    pub basic_system_fields: BTreeMap<String, FieldConfig>,
    pub optional_fields: BTreeMap<String, FieldConfig>,
}

impl CustomFieldsConfig {
    /// All computer field entries, basic first.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldConfig)> {
        self.basic_system_fields
            .iter()
            .chain(self.optional_fields.iter())
    }
}
