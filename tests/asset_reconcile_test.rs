//! Computer reconciliation against an in-memory asset service.

mod common;

use common::{Call, FakeAssetService, DESKTOP_CATEGORY, LAPTOP_CATEGORY};
use sniper::inventory::{AssetClass, CollectedAsset};
use sniper::reconciler::{AssetReconciler, SyncAction, SyncStage};
use sniper::snipeit::{AssetService, ModelUpdate, RemoteRecord};
use std::collections::BTreeMap;
use std::sync::Arc;

fn lamad0150() -> CollectedAsset {
    let mut custom_fields = BTreeMap::new();
    custom_fields.insert("Operating System".to_string(), "Windows 11 Pro".to_string());
    custom_fields.insert("Memory / RAM".to_string(), "16 GB".to_string());
    custom_fields.insert("RAM Usage".to_string(), "41%".to_string());
    CollectedAsset {
        hostname: "LAMAD0150".to_string(),
        manufacturer: "Dell".to_string(),
        model: "Latitude 5420".to_string(),
        serial: "0123456789".to_string(),
        class: AssetClass::Laptop,
        custom_fields,
    }
}

fn reconciler(fake: &Arc<FakeAssetService>) -> AssetReconciler {
    let service: Arc<dyn AssetService> = fake.clone();
    AssetReconciler::new(service, Arc::new(common::test_config()))
}

#[tokio::test]
async fn test_new_laptop_with_placeholder_serial_is_created() {
    let fake = Arc::new(FakeAssetService::new());
    let result = reconciler(&fake).reconcile(&lamad0150()).await.unwrap();

    assert_eq!(result.action, SyncAction::Created);
    assert_eq!(result.asset_tag, "IT-0001");
    assert_eq!(result.serial, "LAMAD0150");
    assert!(result.changes.is_empty());

    let stored = fake.hardware(result.asset_id).unwrap();
    assert_eq!(stored.name, "LAMAD0150");
    assert_eq!(stored.serial, "LAMAD0150");
    assert_eq!(stored.category.as_ref().map(|c| c.id), Some(LAPTOP_CATEGORY));
    assert_eq!(
        stored.custom_field_value("_snipeit_operating_system_3"),
        Some("Windows 11 Pro")
    );

    assert_eq!(result.verification.populated_fields, 3);
    assert_eq!(result.verification.total_fields, 3);
    assert_eq!(result.verification.success_rate, 100.0);
}

#[tokio::test]
async fn test_tag_continues_after_highest_existing() {
    let fake = Arc::new(FakeAssetService::new());
    for (name, tag) in [("PC-A", "IT-0007"), ("PC-B", "IT-0012"), ("PC-C", "OLD-99")] {
        fake.add_hardware(RemoteRecord {
            name: name.to_string(),
            asset_tag: tag.to_string(),
            ..Default::default()
        });
    }

    let result = reconciler(&fake).reconcile(&lamad0150()).await.unwrap();
    assert_eq!(result.action, SyncAction::Created);
    assert_eq!(result.asset_tag, "IT-0013");
}

#[tokio::test]
async fn test_second_run_is_no_change_without_writes() {
    let fake = Arc::new(FakeAssetService::new());
    let reconciler = reconciler(&fake);
    let first = reconciler.reconcile(&lamad0150()).await.unwrap();
    fake.clear_calls();

    let second = reconciler.reconcile(&lamad0150()).await.unwrap();

    assert_eq!(second.action, SyncAction::NoChange);
    assert_eq!(second.asset_id, first.asset_id);
    assert_eq!(second.asset_tag, "IT-0001");
    assert!(fake.calls().is_empty(), "unexpected writes: {:?}", fake.calls());
    assert_eq!(second.verification.populated_fields, 3);
}

#[tokio::test]
async fn test_volatile_field_change_alone_does_not_update() {
    let fake = Arc::new(FakeAssetService::new());
    let reconciler = reconciler(&fake);
    reconciler.reconcile(&lamad0150()).await.unwrap();
    fake.clear_calls();

    let mut asset = lamad0150();
    asset
        .custom_fields
        .insert("RAM Usage".to_string(), "87%".to_string());
    let result = reconciler.reconcile(&asset).await.unwrap();

    assert_eq!(result.action, SyncAction::NoChange);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_changed_field_updates_and_describes_change() {
    let fake = Arc::new(FakeAssetService::new());
    let reconciler = reconciler(&fake);
    let first = reconciler.reconcile(&lamad0150()).await.unwrap();
    fake.clear_calls();

    let mut asset = lamad0150();
    asset.custom_fields.insert(
        "Operating System".to_string(),
        "Windows 11 Enterprise".to_string(),
    );
    asset
        .custom_fields
        .insert("RAM Usage".to_string(), "87%".to_string());
    let result = reconciler.reconcile(&asset).await.unwrap();

    assert_eq!(result.action, SyncAction::Updated);
    assert_eq!(
        result.changes,
        vec!["Operating System: 'Windows 11 Pro' -> 'Windows 11 Enterprise'".to_string()]
    );
    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        Call::UpdateHardware(id, payload) => {
            assert_eq!(*id, first.asset_id);
            // The whole payload is sent, volatile fields included.
            assert_eq!(
                payload.custom_fields.get("_snipeit_ram_usage_11").map(String::as_str),
                Some("87%")
            );
        }
        other => panic!("Expected UpdateHardware, got {:?}", other),
    }
}

#[tokio::test]
async fn test_model_in_wrong_category_is_moved() {
    let fake = Arc::new(FakeAssetService::new());
    let dell = fake.add_manufacturer("Dell");
    let model_id = fake.add_model("Latitude 5420", dell, DESKTOP_CATEGORY);

    let result = reconciler(&fake).reconcile(&lamad0150()).await.unwrap();

    assert_eq!(result.action, SyncAction::Created);
    let calls = fake.calls();
    assert!(calls.contains(&Call::UpdateModel(
        model_id,
        ModelUpdate {
            category_id: LAPTOP_CATEGORY,
            fieldset_id: 1,
        }
    )));
    assert!(!calls.iter().any(|c| matches!(c, Call::CreateModel(_))));
    assert!(!calls.iter().any(|c| matches!(c, Call::CreateManufacturer(_))));
}

#[tokio::test]
async fn test_foreign_tag_is_replaced() {
    let fake = Arc::new(FakeAssetService::new());
    let existing = fake.add_hardware(RemoteRecord {
        name: "lamad0150".to_string(),
        serial: "LAMAD0150".to_string(),
        asset_tag: "LEGACY-17".to_string(),
        ..Default::default()
    });

    let result = reconciler(&fake).reconcile(&lamad0150()).await.unwrap();

    assert_eq!(result.asset_id, existing);
    assert_eq!(result.action, SyncAction::Updated);
    assert_eq!(result.asset_tag, "IT-0001");
    let change = result.detailed_changes.get("asset_tag").unwrap();
    assert_eq!(change.old, "LEGACY-17");
    assert_eq!(change.new, "IT-0001");
}

#[tokio::test]
async fn test_empty_naming_convention_uses_hostname() {
    let fake = Arc::new(FakeAssetService::new());
    let mut config = common::test_config();
    config.defaults.naming_convention.clear();
    let service: Arc<dyn AssetService> = fake.clone();
    let reconciler = AssetReconciler::new(service, Arc::new(config));

    let result = reconciler.reconcile(&lamad0150()).await.unwrap();
    assert_eq!(result.asset_tag, "LAMAD0150");
}

#[tokio::test]
async fn test_rejected_create_reports_stage() {
    let fake = Arc::new(FakeAssetService::new());
    fake.reject_create_of("LAMAD0150");

    let err = reconciler(&fake).reconcile(&lamad0150()).await.unwrap_err();
    assert_eq!(err.stage(), SyncStage::Create);
    assert!(err.to_string().contains("asset tag must be unique"));
    assert_eq!(fake.hardware_count(), 0);
}

#[tokio::test]
async fn test_tag_sequence_reads_every_page() {
    let fake = Arc::new(FakeAssetService::new());
    for n in 1..=520 {
        fake.add_hardware(RemoteRecord {
            name: format!("PC-{:04}", n),
            asset_tag: format!("IT-{:04}", n),
            ..Default::default()
        });
    }

    let result = reconciler(&fake).reconcile(&lamad0150()).await.unwrap();
    assert_eq!(result.asset_tag, "IT-0521");
}

#[tokio::test]
async fn test_tag_lookup_failure_falls_back_to_hostname() {
    let fake = Arc::new(FakeAssetService::new());
    fake.fail_search_for("IT-");

    let result = reconciler(&fake).reconcile(&lamad0150()).await.unwrap();

    assert_eq!(result.action, SyncAction::Created);
    assert_eq!(result.asset_tag, "LAMAD0150");
    assert_eq!(fake.hardware(result.asset_id).unwrap().asset_tag, "LAMAD0150");
}

#[tokio::test]
async fn test_failed_verification_does_not_fail_asset() {
    let fake = Arc::new(FakeAssetService::new());
    fake.fail_fetches();

    let result = reconciler(&fake).reconcile(&lamad0150()).await.unwrap();

    assert_eq!(result.action, SyncAction::Created);
    assert!(fake.hardware(result.asset_id).is_some());
    let error = result.verification.error.as_deref().unwrap();
    assert!(error.contains("timeout"), "unexpected error: {}", error);
    assert_eq!(result.verification.total_fields, 0);
}
