//! Computer reconciliation (laptops, desktops, servers).

use super::error::{AtStage, ReconcileError, SyncStage};
use super::fields::FieldMap;
use super::{
    detect_changes, existing_tags, non_empty_or, verify, ReconcileResult, RecordKind, SyncAction,
    Verification,
};
use crate::config::AgentConfig;
use crate::inventory::CollectedAsset;
use crate::matching::is_placeholder_serial;
use crate::snipeit::{AssetPayload, AssetService, ModelPayload, RemoteRecord};
use crate::tagging::{generate_or_preserve, TagDecision};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Reconciles one computer against the asset service.
///
/// Computers are located by exact hostname; hostnames are reliable identifiers
/// where BIOS serials often are not.
pub struct AssetReconciler {
    service: Arc<dyn AssetService>,
    config: Arc<AgentConfig>,
    fields: FieldMap,
}

impl AssetReconciler {
    pub fn new(service: Arc<dyn AssetService>, config: Arc<AgentConfig>) -> Self {
        let fields = FieldMap::for_computers(&config.custom_fields);
        Self {
            service,
            config,
            fields,
        }
    }

    pub fn field_map(&self) -> &FieldMap {
        &self.fields
    }

    /// Serial to store: the collected one, or the hostname when it is a placeholder.
    pub fn effective_serial(asset: &CollectedAsset) -> String {
        if is_placeholder_serial(&asset.serial) {
            asset.hostname.clone()
        } else {
            asset.serial.trim().to_string()
        }
    }

    pub fn build_payload(
        &self,
        asset: &CollectedAsset,
        model_id: u64,
        asset_tag: String,
    ) -> AssetPayload {
        AssetPayload {
            name: asset.hostname.clone(),
            serial: Self::effective_serial(asset),
            model_id,
            status_id: self.config.defaults.status_id,
            company_id: self.config.defaults.company_id,
            asset_tag,
            custom_fields: self.fields.map_display_values(&asset.custom_fields),
        }
    }

    /// Create, update or leave alone the record for `asset`.
    #[tracing::instrument(skip_all, fields(hostname = %asset.hostname, class = %asset.class))]
    pub async fn reconcile(&self, asset: &CollectedAsset) -> Result<ReconcileResult, ReconcileError> {
        let service = self.service.as_ref();
        let defaults = &self.config.defaults;

        let manufacturer = non_empty_or(&asset.manufacturer, "Unknown");
        let manufacturer_id = service
            .find_or_create_manufacturer(&manufacturer)
            .await
            .at(SyncStage::ResolveManufacturer)?;
        tracing::debug!(%manufacturer, manufacturer_id, "Resolved manufacturer");

        let model = non_empty_or(&asset.model, "Unknown");
        let (category_id, fieldset_id) = defaults.category_for(asset.class);
        let model_id = service
            .find_or_create_model(&ModelPayload {
                name: model.clone(),
                model_number: model.clone(),
                manufacturer_id,
                category_id,
                fieldset_id,
            })
            .await
            .at(SyncStage::ResolveModel)?;
        tracing::debug!(%model, model_id, "Resolved model");

        let existing = match service
            .find_hardware_by_hostname(&asset.hostname)
            .await
            .at(SyncStage::LocateExisting)?
        {
            Some(id) => Some(
                service
                    .get_hardware_by_id(id)
                    .await
                    .at(SyncStage::LocateExisting)?,
            ),
            None => None,
        };

        let tag = generate_or_preserve(
            &defaults.naming_convention,
            &asset.hostname,
            existing.as_ref().map(|r| r.asset_tag.as_str()),
            |term| async move { existing_tags(service, &term).await },
        )
        .await;
        if let TagDecision::Generated(ref tag) = tag {
            tracing::info!(asset_tag = %tag, "Allocated asset tag");
        }

        let payload = self.build_payload(asset, model_id, tag.into_tag());

        match existing {
            Some(record) => self.update_existing(record, payload, model_id).await,
            None => self.create(payload).await,
        }
    }

    async fn create(&self, payload: AssetPayload) -> Result<ReconcileResult, ReconcileError> {
        let service = self.service.as_ref();
        let id = service
            .create_hardware(&payload)
            .await
            .at(SyncStage::Create)?;
        tracing::info!(asset_id = id, asset_tag = %payload.asset_tag, "Created asset");

        let verification = verify(service, id).await;
        Ok(result(id, payload, SyncAction::Created, Vec::new(), BTreeMap::new(), verification))
    }

    async fn update_existing(
        &self,
        record: RemoteRecord,
        payload: AssetPayload,
        model_id: u64,
    ) -> Result<ReconcileResult, ReconcileError> {
        let changes = detect_changes(&record, &payload, model_id, &self.fields, RecordKind::Computer);
        if changes.is_empty() {
            tracing::info!(asset_id = record.id, "Asset unchanged, skipping update");
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
        tracing::info!(asset_id = record.id, changes = changes.len(), "Updated asset");
        for change in changes.descriptions() {
            tracing::debug!(asset_id = record.id, %change, "Field changed");
        }

        let verification = verify(service, record.id).await;
        let (descriptions, details) = changes.into_parts();
        Ok(result(record.id, payload, SyncAction::Updated, descriptions, details, verification))
    }
}

fn result(
    asset_id: u64,
    payload: AssetPayload,
    action: SyncAction,
    changes: Vec<String>,
    detailed_changes: BTreeMap<String, super::FieldChange>,
    verification: Verification,
) -> ReconcileResult {
    ReconcileResult {
        asset_id,
        name: payload.name,
        kind: RecordKind::Computer,
        asset_tag: payload.asset_tag,
        serial: payload.serial,
        action,
        changes,
        detailed_changes,
        verification,
        checkout: None,
    }
}
