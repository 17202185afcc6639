//! Reconciliation engine
//!
//! Decides whether a locally observed computer or monitor already exists in the
//! asset service, and writes only what changed. Each record walks the same
//! state machine:
//!
//! `RESOLVE_MANUFACTURER → RESOLVE_MODEL → LOCATE_EXISTING → BUILD_PAYLOAD →
//! {CREATE | DIFF_THEN_UPDATE | NO_CHANGE} → VERIFY`
//!
//! Every await is sequential; records are never reconciled concurrently.

pub mod asset;
pub mod changes;
pub mod error;
pub mod fields;
pub mod monitor;
pub mod sync;

pub use asset::AssetReconciler;
pub use changes::{detect_changes, ChangeSet, FieldChange};
pub use error::{ReconcileError, SyncStage};
pub use fields::{FieldEntry, FieldMap};
pub use monitor::{CheckoutOutcome, MonitorReconciler, ParentAsset};
pub use sync::{SyncOutcome, SyncReport, SyncRunner};

use crate::snipeit::{ApiError, AssetService, RemoteRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Which reconciler produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Computer,
    Monitor,
}

/// What a successful reconciliation did to the remote record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Created,
    Updated,
    NoChange,
}

impl SyncAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Created => "created",
            SyncAction::Updated => "updated",
            SyncAction::NoChange => "no_change",
        }
    }
}

/// Post-write custom field coverage of the stored record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification {
    pub populated_fields: usize,
    pub total_fields: usize,
    /// Percentage of populated fields, 0 when the record has none.
    pub success_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Verification {
    pub fn from_record(record: &RemoteRecord) -> Self {
        let total_fields = record.custom_fields.len();
        let populated_fields = record
            .custom_fields
            .values()
            .filter(|f| !f.value.trim().is_empty())
            .count();
        let success_rate = if total_fields > 0 {
            populated_fields as f64 / total_fields as f64 * 100.0
        } else {
            0.0
        };
        Self {
            populated_fields,
            total_fields,
            success_rate,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            populated_fields: 0,
            total_fields: 0,
            success_rate: 0.0,
            error: Some(error.into()),
        }
    }
}

/// Outcome of one successfully reconciled record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileResult {
    pub asset_id: u64,
    pub name: String,
    pub kind: RecordKind,
    pub asset_tag: String,
    pub serial: String,
    pub action: SyncAction,
    pub changes: Vec<String>,
    pub detailed_changes: BTreeMap<String, FieldChange>,
    pub verification: Verification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout: Option<CheckoutOutcome>,
}

/// Re-fetch a written record and measure its custom field coverage.
///
/// Observational only: a failed fetch is reported in the verification.
pub(crate) async fn verify(service: &dyn AssetService, id: u64) -> Verification {
    match service.get_hardware_by_id(id).await {
        Ok(record) => {
            let verification = Verification::from_record(&record);
            tracing::debug!(
                asset_id = id,
                populated = verification.populated_fields,
                total = verification.total_fields,
                "Verified custom fields"
            );
            verification
        }
        Err(e) => {
            tracing::warn!(asset_id = id, error = %e, "Verification fetch failed");
            Verification::failed(e.to_string())
        }
    }
}

/// Asset tags currently in use by records matching `term`.
pub(crate) async fn existing_tags(
    service: &dyn AssetService,
    term: &str,
) -> Result<Vec<String>, ApiError> {
    Ok(service
        .search_hardware_all(term, None)
        .await?
        .into_iter()
        .map(|r| r.asset_tag)
        .filter(|tag| !tag.trim().is_empty())
        .collect())
}

/// `value` trimmed, or `fallback` when blank.
pub(crate) fn non_empty_or(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
