//! One sync run: the computer first, then each attached monitor in order.

use super::{
    AssetReconciler, MonitorReconciler, ParentAsset, ReconcileError, ReconcileResult, RecordKind,
    SyncAction, SyncStage,
};
use crate::config::AgentConfig;
use crate::inventory::Inventory;
use crate::snipeit::AssetService;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Per-record outcome. A failure never stops the rest of the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    Synced(ReconcileResult),
    Failed {
        name: String,
        kind: RecordKind,
        stage: SyncStage,
        error: String,
    },
}

impl SyncOutcome {
    fn from_result(
        result: Result<ReconcileResult, ReconcileError>,
        name: &str,
        kind: RecordKind,
    ) -> Self {
        match result {
            Ok(result) => SyncOutcome::Synced(result),
            Err(e) => {
                tracing::error!(name, stage = %e.stage(), error = %e, "Reconciliation failed");
                SyncOutcome::Failed {
                    name: name.to_string(),
                    kind,
                    stage: e.stage(),
                    error: e.to_string(),
                }
            }
        }
    }

    pub fn result(&self) -> Option<&ReconcileResult> {
        match self {
            SyncOutcome::Synced(result) => Some(result),
            SyncOutcome::Failed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Synced(_))
    }

    pub fn name(&self) -> &str {
        match self {
            SyncOutcome::Synced(result) => &result.name,
            SyncOutcome::Failed { name, .. } => name,
        }
    }
}

/// Summary of a sync run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub asset: SyncOutcome,
    pub monitors: Vec<SyncOutcome>,
}

impl SyncReport {
    /// Whether the computer record was reconciled. Drives the process exit code.
    pub fn asset_succeeded(&self) -> bool {
        self.asset.is_success()
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &SyncOutcome> {
        std::iter::once(&self.asset).chain(self.monitors.iter())
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes().filter(|o| !o.is_success()).count()
    }

    pub fn count(&self, action: SyncAction) -> usize {
        self.outcomes()
            .filter_map(SyncOutcome::result)
            .filter(|r| r.action == action)
            .count()
    }
}

/// Runs the reconcilers over one inventory document.
pub struct SyncRunner {
    assets: AssetReconciler,
    monitors: MonitorReconciler,
}

impl SyncRunner {
    pub fn new(service: Arc<dyn AssetService>, config: Arc<AgentConfig>) -> Self {
        Self {
            assets: AssetReconciler::new(Arc::clone(&service), Arc::clone(&config)),
            monitors: MonitorReconciler::new(service, config),
        }
    }

    pub async fn run(&self, inventory: &Inventory) -> SyncReport {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("sync", %run_id, hostname = %inventory.asset.hostname);
        self.run_inner(run_id, inventory).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, inventory: &Inventory) -> SyncReport {
        let started_at = Utc::now();
        let start = Instant::now();
        tracing::info!(monitors = inventory.monitors.len(), "Sync started");

        let asset = SyncOutcome::from_result(
            self.assets.reconcile(&inventory.asset).await,
            &inventory.asset.hostname,
            RecordKind::Computer,
        );

        let parent = asset.result().map(|r| ParentAsset {
            id: r.asset_id,
            hostname: r.name.clone(),
        });
        if parent.is_none() && !inventory.monitors.is_empty() {
            tracing::warn!("Computer sync failed, monitors will not be checked out");
        }

        let mut monitors = Vec::with_capacity(inventory.monitors.len());
        for monitor in &inventory.monitors {
            let name = format!("{} {}", monitor.manufacturer.trim(), monitor.model.trim());
            let result = self.monitors.reconcile(monitor, parent.as_ref()).await;
            monitors.push(SyncOutcome::from_result(result, &name, RecordKind::Monitor));
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let report = SyncReport {
            run_id,
            started_at,
            elapsed_ms,
            asset,
            monitors,
        };
        tracing::info!(
            elapsed_ms,
            failed = report.failed_count(),
            "Sync finished"
        );
        report
    }
}
