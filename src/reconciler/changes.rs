//! Minimal change detection between a stored record and a fresh payload.

use super::fields::FieldMap;
use super::RecordKind;
use crate::snipeit::{AssetPayload, RemoteRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Before/after values of one changed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub old: String,
    pub new: String,
}

/// Ordered change descriptions plus a field → {old, new} detail map.
///
/// An empty set means the stored record already matches and no write is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    changes: Vec<String>,
    details: BTreeMap<String, FieldChange>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn descriptions(&self) -> &[String] {
        &self.changes
    }

    pub fn details(&self) -> &BTreeMap<String, FieldChange> {
        &self.details
    }

    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.details.get(field)
    }

    pub fn into_parts(self) -> (Vec<String>, BTreeMap<String, FieldChange>) {
        (self.changes, self.details)
    }

    fn record(&mut self, field: &str, label: &str, old: &str, new: &str) {
        self.changes
            .push(format!("{}: '{}' -> '{}'", label, old, new));
        self.details.insert(
            field.to_string(),
            FieldChange {
                old: old.to_string(),
                new: new.to_string(),
            },
        );
    }
}

/// Compare `remote` with the `payload` about to be written.
///
/// Rules fire independently: model, asset tag, serial, status (computers only),
/// and every mapped custom field by column. Values compare as trimmed strings.
/// Volatile fields and columns unknown to `fields` are ignored.
pub fn detect_changes(
    remote: &RemoteRecord,
    payload: &AssetPayload,
    new_model_id: u64,
    fields: &FieldMap,
    kind: RecordKind,
) -> ChangeSet {
    let mut changes = ChangeSet::default();

    if remote.model_id() != Some(new_model_id) {
        let old = remote
            .model_id()
            .map(|id| id.to_string())
            .unwrap_or_default();
        changes.record("model_id", "Model", &old, &new_model_id.to_string());
    }

    let old_tag = remote.asset_tag.trim();
    let new_tag = payload.asset_tag.trim();
    if old_tag != new_tag {
        changes.record("asset_tag", "Asset tag", old_tag, new_tag);
    }

    let old_serial = remote.serial.trim();
    let new_serial = payload.serial.trim();
    if old_serial != new_serial {
        changes.record("serial", "Serial", old_serial, new_serial);
    }

    if kind == RecordKind::Computer && remote.status_id() != Some(payload.status_id) {
        let old = remote
            .status_id()
            .map(|id| id.to_string())
            .unwrap_or_default();
        changes.record("status_id", "Status", &old, &payload.status_id.to_string());
    }

    for (column, value) in &payload.custom_fields {
        if !fields.contains_column(column) || fields.is_volatile(column) {
            continue;
        }
        let old = remote.custom_field_value(column).unwrap_or("").trim();
        let new = value.trim();
        if old != new {
            let label = fields.display_for_column(column).unwrap_or(column);
            changes.record(column, label, old, new);
        }
    }

    changes
}
