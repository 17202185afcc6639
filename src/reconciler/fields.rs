//! Two-way custom field table.
//!
//! The collector speaks in display names (`"RAM Usage"`) or attribute keys
//! (`refresh_rate`); Snipe-IT stores values under database columns
//! (`_snipeit_ram_usage_11`). Payload building and change detection both go
//! through this table so the translation happens in one place.

use crate::config::{CustomFieldsConfig, FieldConfig};
use std::collections::BTreeMap;

/// One enabled custom field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Configuration key (collector attribute name)
    pub key: String,
    pub display_name: String,
    pub column: String,
    pub volatile: bool,
}

/// Display name / key ↔ column lookups over the enabled fields.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    entries: Vec<FieldEntry>,
}

impl FieldMap {
    pub fn new<'a>(fields: impl IntoIterator<Item = (&'a String, &'a FieldConfig)>) -> Self {
        let entries = fields
            .into_iter()
            .filter(|(_, field)| field.enabled && !field.db_column.trim().is_empty())
            .map(|(key, field)| FieldEntry {
                key: key.clone(),
                display_name: field.display_name.trim().to_string(),
                column: field.db_column.trim().to_string(),
                volatile: field.is_volatile(key),
            })
            .collect();
        Self { entries }
    }

    pub fn for_computers(config: &CustomFieldsConfig) -> Self {
        Self::new(config.iter())
    }

    pub fn for_monitors(fields: &BTreeMap<String, FieldConfig>) -> Self {
        Self::new(fields.iter())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    fn by_column(&self, column: &str) -> Option<&FieldEntry> {
        self.entries.iter().find(|e| e.column == column)
    }

    /// Column for a display name, ignoring case.
    pub fn column_for_display(&self, display_name: &str) -> Option<&str> {
        let display_name = display_name.trim();
        self.entries
            .iter()
            .find(|e| e.display_name.eq_ignore_ascii_case(display_name))
            .map(|e| e.column.as_str())
    }

    pub fn column_for_key(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.column.as_str())
    }

    pub fn display_for_column(&self, column: &str) -> Option<&str> {
        self.by_column(column).map(|e| e.display_name.as_str())
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.by_column(column).is_some()
    }

    pub fn is_volatile(&self, column: &str) -> bool {
        self.by_column(column).is_some_and(|e| e.volatile)
    }

    /// Translate `display name → value` into `column → value`, dropping unmapped labels.
    pub fn map_display_values(&self, values: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        values
            .iter()
            .filter_map(|(label, value)| match self.column_for_display(label) {
                Some(column) => Some((column.to_string(), value.trim().to_string())),
                None => {
                    tracing::debug!(field = %label, "No custom field mapping, skipping");
                    None
                }
            })
            .collect()
    }

    /// Translate `key → value` pairs into `column → value`, dropping unmapped keys.
    pub fn map_key_values<'a>(
        &self,
        values: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> BTreeMap<String, String> {
        values
            .into_iter()
            .filter_map(|(key, value)| {
                self.column_for_key(key)
                    .map(|column| (column.to_string(), value.trim().to_string()))
            })
            .collect()
    }
}
