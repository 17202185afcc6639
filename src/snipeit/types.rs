//! Snipe-IT record shapes used by the reconcilers.
//!
//! Only the fields the agent reads are modelled. Snipe-IT returns `null` for unset
//! strings and `[]` for an empty custom field map, so those are normalized on the
//! way in.

use super::ApiError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// `{id, name}` reference to a related record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

/// Who or what an asset is checked out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentKind {
    User,
    Asset,
    Location,
    #[serde(other)]
    Other,
}

impl AssignmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentKind::User => "user",
            AssignmentKind::Asset => "asset",
            AssignmentKind::Location => "location",
            AssignmentKind::Other => "other",
        }
    }
}

/// Current checkout holder of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssignmentKind,
}

/// A custom field value as returned on a hardware record, keyed by its label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldValue {
    /// Database column, e.g. `_snipeit_ram_usage_11`
    pub field: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
}

/// A hardware record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub id: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub serial: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub asset_tag: String,
    #[serde(default)]
    pub model: Option<NamedRef>,
    #[serde(default)]
    pub manufacturer: Option<NamedRef>,
    #[serde(default)]
    pub category: Option<NamedRef>,
    #[serde(default)]
    pub status_label: Option<NamedRef>,
    #[serde(default)]
    pub company: Option<NamedRef>,
    #[serde(default)]
    pub assigned_to: Option<Assignment>,
    #[serde(default, deserialize_with = "custom_field_map")]
    pub custom_fields: BTreeMap<String, CustomFieldValue>,
}

impl RemoteRecord {
    pub fn model_id(&self) -> Option<u64> {
        self.model.as_ref().map(|m| m.id)
    }

    pub fn model_name(&self) -> &str {
        self.model.as_ref().map(|m| m.name.as_str()).unwrap_or("")
    }

    pub fn status_id(&self) -> Option<u64> {
        self.status_label.as_ref().map(|s| s.id)
    }

    /// Value of the custom field stored under `column`, whatever its label.
    pub fn custom_field_value(&self, column: &str) -> Option<&str> {
        self.custom_fields
            .values()
            .find(|f| f.field == column)
            .map(|f| f.value.as_str())
    }

    /// The user holding this asset, if it is checked out to a user.
    pub fn assigned_user(&self) -> Option<&Assignment> {
        self.assigned_to
            .as_ref()
            .filter(|a| a.kind == AssignmentKind::User)
    }
}

/// An asset model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteModel {
    pub id: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub model_number: String,
    #[serde(default)]
    pub manufacturer: Option<NamedRef>,
    #[serde(default)]
    pub category: Option<NamedRef>,
    #[serde(default)]
    pub fieldset: Option<NamedRef>,
}

impl RemoteModel {
    pub fn manufacturer_id(&self) -> Option<u64> {
        self.manufacturer.as_ref().map(|m| m.id)
    }

    pub fn category_id(&self) -> Option<u64> {
        self.category.as_ref().map(|c| c.id)
    }
}

/// Paged list envelope: `{"total": n, "rows": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub total: u64,
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
}

/// Write envelope: `{"status": "success"|"error", "messages": ..., "payload": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteResponse {
    pub status: String,
    #[serde(default)]
    pub messages: Value,
    #[serde(default)]
    pub payload: Option<Value>,
}

impl WriteResponse {
    /// Id of the written record, or `Rejected` when the service refused the write.
    pub fn into_result(self) -> Result<Option<u64>, ApiError> {
        if self.status != "success" {
            return Err(ApiError::Rejected(flatten_messages(&self.messages)));
        }
        Ok(self
            .payload
            .as_ref()
            .and_then(|p| p.get("id"))
            .and_then(Value::as_u64))
    }
}

/// Render Snipe-IT `messages` (a string or a field → [errors] map) as one line.
pub(crate) fn flatten_messages(messages: &Value) -> String {
    match messages {
        Value::Null => "unknown error".to_string(),
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .iter()
            .map(|(field, errors)| {
                let text = match errors {
                    Value::Array(items) => items
                        .iter()
                        .map(|i| i.as_str().map(str::to_string).unwrap_or_else(|| i.to_string()))
                        .collect::<Vec<_>>()
                        .join(", "),
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                format!("{}: {}", field, text)
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// Body for creating or updating a hardware record.
///
/// Custom fields are flattened in as `db_column: value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetPayload {
    pub name: String,
    pub serial: String,
    pub model_id: u64,
    pub status_id: u64,
    pub company_id: u64,
    pub asset_tag: String,
    #[serde(flatten)]
    pub custom_fields: BTreeMap<String, String>,
}

/// Body for creating a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelPayload {
    pub name: String,
    pub model_number: String,
    pub manufacturer_id: u64,
    pub category_id: u64,
    pub fieldset_id: u64,
}

/// Partial model update moving it to another category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelUpdate {
    pub category_id: u64,
    pub fieldset_id: u64,
}

/// Checkout destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutTarget {
    User(u64),
    Asset(u64),
    Location(u64),
}

impl CheckoutTarget {
    pub fn kind(&self) -> AssignmentKind {
        match self {
            CheckoutTarget::User(_) => AssignmentKind::User,
            CheckoutTarget::Asset(_) => AssignmentKind::Asset,
            CheckoutTarget::Location(_) => AssignmentKind::Location,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            CheckoutTarget::User(id) | CheckoutTarget::Asset(id) | CheckoutTarget::Location(id) => {
                *id
            }
        }
    }
}

/// Body for `POST /hardware/{id}/checkout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub target: CheckoutTarget,
    pub status_id: u64,
    pub note: Option<String>,
}

impl Serialize for CheckoutRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let assigned_field = match self.target {
            CheckoutTarget::User(_) => "assigned_user",
            CheckoutTarget::Asset(_) => "assigned_asset",
            CheckoutTarget::Location(_) => "assigned_location",
        };

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("checkout_to_type", self.target.kind().as_str())?;
        map.serialize_entry(assigned_field, &self.target.id())?;
        map.serialize_entry("status_id", &self.status_id)?;
        if let Some(note) = &self.note {
            map.serialize_entry("note", note)?;
        }
        map.end()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn custom_field_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, CustomFieldValue>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => {
            serde_json::from_value(Value::Object(map)).map_err(serde::de::Error::custom)
        }
        _ => Ok(BTreeMap::new()),
    }
}
