//! External monitor reconciliation.
//!
//! Monitors have no hostname, and EDID serials are noisy: readers disagree on zero
//! padding and some panels report nothing at all. Records are therefore located by
//! fuzzy serial match inside one manufacturer-scoped search, and a monitor is
//! handed to whichever user holds the computer it is plugged into.

use super::error::{AtStage, ReconcileError, SyncStage};
use super::fields::FieldMap;
use super::{
    detect_changes, existing_tags, non_empty_or, verify, FieldChange, ReconcileResult, RecordKind,
    SyncAction, Verification,
};
use crate::config::AgentConfig;
use crate::inventory::CollectedMonitor;
use crate::matching::{
    clean_model_name, is_placeholder_serial, model_name_matches, normalize_serial, serials_match,
};
use crate::snipeit::{
    AssetPayload, AssetService, Assignment, AssignmentKind, CheckoutRequest, CheckoutTarget,
    ModelPayload, RemoteRecord, SEARCH_LIMIT,
};
use crate::tagging::generate_or_preserve;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Prefix of serials synthesized for monitors that report none.
pub const SYNTHESIZED_SERIAL_PREFIX: &str = "N/A-";

/// Characters of manufacturer and model kept in a synthesized serial.
const SYNTHESIZED_PART_LEN: usize = 10;

/// The computer a monitor is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentAsset {
    pub id: u64,
    pub hostname: String,
}

/// What happened when assigning a monitor to its computer's user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    CheckedOut { user_id: u64, user_name: String },
    AlreadyAssigned { user_id: u64, user_name: String },
    /// The parent computer is not checked out to a user.
    SkippedNoUser,
    Failed { error: String },
}

/// Serial used for a monitor that reports an empty or placeholder one.
///
/// Built from the manufacturer and clean model, so two units of the same model on
/// different machines are told apart only by their checkout, never by the parent
/// hostname.
pub fn synthesized_serial(manufacturer: &str, clean_model: &str) -> String {
    format!(
        "{}{}-{}",
        SYNTHESIZED_SERIAL_PREFIX,
        synthesized_part(manufacturer),
        synthesized_part(clean_model)
    )
}

fn synthesized_part(value: &str) -> String {
    value
        .trim()
        .chars()
        .take(SYNTHESIZED_PART_LEN)
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// Whether a stored or collected serial cannot tell two units apart.
fn serial_unavailable(serial: &str) -> bool {
    is_placeholder_serial(serial) || serial.trim().starts_with(SYNTHESIZED_SERIAL_PREFIX)
}

/// Pick the record for this monitor out of a candidate set.
///
/// Exact serial equality wins, then a padding-only serial match, then a model-name
/// match on a record with no usable serial (created before one was known). When
/// this monitor's own serial could not be read, a model-name match against any
/// record is accepted last. Name matching is never used while both sides carry
/// real serials; it would fold identical models into one record.
fn find_match<'a>(
    candidates: &'a [RemoteRecord],
    serial: &str,
    asset_name: &str,
    clean_model: &str,
) -> Option<&'a RemoteRecord> {
    let wanted = normalize_serial(serial);
    let collected_unavailable = serial_unavailable(serial);
    candidates
        .iter()
        .find(|r| !r.serial.trim().is_empty() && normalize_serial(&r.serial) == wanted)
        .or_else(|| {
            candidates
                .iter()
                .find(|r| !collected_unavailable && serials_match(&r.serial, serial))
        })
        .or_else(|| {
            candidates.iter().find(|r| {
                serial_unavailable(&r.serial) && same_model(r, asset_name, clean_model)
            })
        })
        .or_else(|| {
            candidates
                .iter()
                .find(|r| collected_unavailable && same_model(r, asset_name, clean_model))
        })
}

fn same_model(record: &RemoteRecord, asset_name: &str, clean_model: &str) -> bool {
    model_name_matches(&record.name, asset_name)
        || model_name_matches(record.model_name(), clean_model)
}

/// Reconciles external monitors against the asset service.
pub struct MonitorReconciler {
    service: Arc<dyn AssetService>,
    config: Arc<AgentConfig>,
    fields: FieldMap,
}

impl MonitorReconciler {
    pub fn new(service: Arc<dyn AssetService>, config: Arc<AgentConfig>) -> Self {
        let fields = FieldMap::for_monitors(&config.monitor_custom_fields);
        Self {
            service,
            config,
            fields,
        }
    }

    pub fn field_map(&self) -> &FieldMap {
        &self.fields
    }

    /// Create, update or leave alone the record for `monitor`, then hand it to the
    /// user of `parent` when one is given.
    #[tracing::instrument(skip_all, fields(manufacturer = %monitor.manufacturer, model = %monitor.model))]
    pub async fn reconcile(
        &self,
        monitor: &CollectedMonitor,
        parent: Option<&ParentAsset>,
    ) -> Result<ReconcileResult, ReconcileError> {
        let service = self.service.as_ref();
        let defaults = &self.config.defaults;

        let manufacturer = non_empty_or(&monitor.manufacturer, "Unknown");
        let clean_model = non_empty_or(&clean_model_name(&manufacturer, &monitor.model), "Monitor");
        let asset_name = format!("{} {}", manufacturer, clean_model);

        let manufacturer_id = service
            .find_or_create_manufacturer(&manufacturer)
            .await
            .at(SyncStage::ResolveManufacturer)?;

        let (category_id, fieldset_id) = defaults.monitor_category();
        let model_id = service
            .find_or_create_model(&ModelPayload {
                name: clean_model.clone(),
                model_number: asset_name.clone(),
                manufacturer_id,
                category_id,
                fieldset_id,
            })
            .await
            .at(SyncStage::ResolveModel)?;
        tracing::debug!(model = %clean_model, model_id, "Resolved monitor model");

        let serial = if serial_unavailable(&monitor.serial) {
            let synthesized = synthesized_serial(&manufacturer, &clean_model);
            tracing::debug!(serial = %synthesized, "Monitor reports no serial, synthesized one");
            synthesized
        } else {
            monitor.serial.trim().to_string()
        };

        let existing = self
            .locate(&manufacturer, &serial, &asset_name, &clean_model, category_id)
            .await?;

        // An unreadable serial never overwrites a real one already on record.
        let serial = match &existing {
            Some(record) if serial_unavailable(&serial) && !serial_unavailable(&record.serial) => {
                tracing::debug!(
                    asset_id = record.id,
                    stored_serial = %record.serial,
                    "Serial unreadable, keeping stored serial"
                );
                record.serial.trim().to_string()
            }
            _ => serial,
        };

        let tag = generate_or_preserve(
            &defaults.monitor_naming_convention,
            &serial,
            existing.as_ref().map(|r| r.asset_tag.as_str()),
            |term| async move { existing_tags(service, &term).await },
        )
        .await
        .into_tag();

        let payload = AssetPayload {
            name: asset_name,
            serial,
            model_id,
            status_id: defaults.status_id,
            company_id: defaults.company_id,
            asset_tag: tag,
            custom_fields: self.fields.map_key_values(monitor.attributes()),
        };

        let (mut result, current_holder) = match existing {
            Some(record) => {
                let holder = record.assigned_to.clone();
                (self.update_existing(record, payload, model_id).await?, holder)
            }
            None => (self.create(payload).await?, None),
        };

        if let Some(parent) = parent {
            result.checkout = Some(
                self.checkout_to_parent_user(result.asset_id, current_holder.as_ref(), parent)
                    .await,
            );
        }

        Ok(result)
    }

    /// One manufacturer-scoped search reused for serial and name matching, then a
    /// search by asset name as a last resort.
    async fn locate(
        &self,
        manufacturer: &str,
        serial: &str,
        asset_name: &str,
        clean_model: &str,
        category_id: u64,
    ) -> Result<Option<RemoteRecord>, ReconcileError> {
        let service = self.service.as_ref();

        let candidates = service
            .search_hardware_all(manufacturer, Some(category_id))
            .await
            .at(SyncStage::LocateExisting)?;
        if let Some(record) = find_match(&candidates, serial, asset_name, clean_model) {
            tracing::debug!(
                asset_id = record.id,
                stored_serial = %record.serial,
                candidates = candidates.len(),
                "Matched monitor within manufacturer"
            );
            return Ok(Some(record.clone()));
        }

        let by_name = service
            .search_hardware(asset_name, SEARCH_LIMIT, Some(category_id))
            .await
            .at(SyncStage::LocateExisting)?;
        let found = find_match(&by_name, serial, asset_name, clean_model).cloned();
        if let Some(record) = &found {
            tracing::debug!(asset_id = record.id, "Matched monitor by name");
        }
        Ok(found)
    }

    async fn create(&self, payload: AssetPayload) -> Result<ReconcileResult, ReconcileError> {
        let service = self.service.as_ref();
        let id = service
            .create_hardware(&payload)
            .await
            .at(SyncStage::Create)?;
        tracing::info!(asset_id = id, serial = %payload.serial, "Created monitor");

        let verification = verify(service, id).await;
        Ok(result(id, payload, SyncAction::Created, Vec::new(), BTreeMap::new(), verification))
    }

    async fn update_existing(
        &self,
        record: RemoteRecord,
        payload: AssetPayload,
        model_id: u64,
    ) -> Result<ReconcileResult, ReconcileError> {
        let changes = detect_changes(&record, &payload, model_id, &self.fields, RecordKind::Monitor);
        if changes.is_empty() {
            tracing::info!(asset_id = record.id, "Monitor unchanged, skipping update");
            let verification = Verification::from_record(&record);
            return Ok(result(
                record.id,
                payload,
                SyncAction::NoChange,
                Vec::new(),
                BTreeMap::new(),
                verification,
            ));
        }

        let service = self.service.as_ref();
        service
            .update_hardware(record.id, &payload)
            .await
            .at(SyncStage::Update)?;
        if let Some(serial) = changes.get("serial") {
            tracing::info!(
                asset_id = record.id,
                old = %serial.old,
                new = %serial.new,
                "Normalized stored monitor serial"
            );
        }
        tracing::info!(asset_id = record.id, changes = changes.len(), "Updated monitor");

        let verification = verify(service, record.id).await;
        let (descriptions, details) = changes.into_parts();
        Ok(result(record.id, payload, SyncAction::Updated, descriptions, details, verification))
    }

    /// Check the monitor out to the user holding `parent`.
    ///
    /// Never fails the monitor: every error becomes `CheckoutOutcome::Failed`.
    async fn checkout_to_parent_user(
        &self,
        monitor_id: u64,
        current_holder: Option<&Assignment>,
        parent: &ParentAsset,
    ) -> CheckoutOutcome {
        let service = self.service.as_ref();

        let parent_record = match service.get_hardware_by_id(parent.id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(parent_id = parent.id, error = %e, "Could not read parent asset for checkout");
                return CheckoutOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        let Some(user) = parent_record.assigned_user() else {
            tracing::warn!(
                parent = %parent.hostname,
                "Parent asset is not assigned to a user, skipping monitor checkout"
            );
            return CheckoutOutcome::SkippedNoUser;
        };

        if let Some(holder) = current_holder {
            if holder.kind == AssignmentKind::User && holder.id == user.id {
                return CheckoutOutcome::AlreadyAssigned {
                    user_id: user.id,
                    user_name: user.name.clone(),
                };
            }

            let note = format!("Reassigning to the user of {}", parent.hostname);
            if let Err(e) = service.checkin_hardware(monitor_id, Some(&note)).await {
                tracing::warn!(asset_id = monitor_id, error = %e, "Monitor checkin failed");
                return CheckoutOutcome::Failed {
                    error: e.to_string(),
                };
            }
            tracing::debug!(asset_id = monitor_id, previous = %holder.name, "Checked in monitor");
        }

        let request = CheckoutRequest {
            target: CheckoutTarget::User(user.id),
            status_id: self.config.defaults.status_id,
            note: Some(format!(
                "Attached to {} (asset #{})",
                parent.hostname, parent.id
            )),
        };
        match service.checkout_hardware(monitor_id, &request).await {
            Ok(()) => {
                tracing::info!(asset_id = monitor_id, user = %user.name, "Checked out monitor");
                CheckoutOutcome::CheckedOut {
                    user_id: user.id,
                    user_name: user.name.clone(),
                }
            }
            Err(e) => {
                tracing::warn!(asset_id = monitor_id, error = %e, "Monitor checkout failed");
                CheckoutOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}

fn result(
    asset_id: u64,
    payload: AssetPayload,
    action: SyncAction,
    changes: Vec<String>,
    detailed_changes: BTreeMap<String, FieldChange>,
    verification: Verification,
) -> ReconcileResult {
    ReconcileResult {
        asset_id,
        name: payload.name,
        kind: RecordKind::Monitor,
        asset_tag: payload.asset_tag,
        serial: payload.serial,
        action,
        changes,
        detailed_changes,
        verification,
        checkout: None,
    }
}
