//! Sync command implementation

use crate::cli::{load_config, output, SyncArgs};
use crate::config::LoggingConfig;
use crate::inventory::Inventory;
use crate::logging::init_tracing;
use crate::reconciler::SyncRunner;
use crate::snipeit::{AssetService, SnipeItClient};
use anyhow::{bail, Context};
use std::sync::Arc;

/// Handle `sniper sync` command
///
/// Fails when the computer record could not be reconciled; monitor failures
/// are reported but do not change the exit status.
pub async fn handle_sync(args: &SyncArgs) -> anyhow::Result<()> {
    if args.dry_run {
        return dry_run(args);
    }

    let mut config = load_config(&args.config, args.insecure)?;
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging)?;

    let inventory = Inventory::load(&args.inventory)
        .with_context(|| format!("Failed to read inventory {}", args.inventory.display()))?;

    let client = SnipeItClient::new(&config.server)?;
    let total = client
        .test_connection()
        .await
        .with_context(|| format!("Cannot reach Snipe-IT at {}", client.base_url()))?;
    tracing::info!(url = %client.base_url(), assets = total, "Connected to Snipe-IT");

    let service: Arc<dyn AssetService> = Arc::new(client);
    let runner = SyncRunner::new(service, Arc::new(config));
    let report = runner.run(&inventory).await;

    if args.json {
        println!("{}", output::format_report_json(&report)?);
    } else {
        println!("{}", output::format_report_table(&report));
        let details = output::format_report_details(&report);
        if !details.is_empty() {
            println!("{}", details);
        }
        println!("{}", output::format_summary(&report));
    }

    if !report.asset_succeeded() {
        bail!("Asset {} failed to sync", inventory.asset.hostname);
    }
    Ok(())
}

/// Print what would be sent without loading server settings.
fn dry_run(args: &SyncArgs) -> anyhow::Result<()> {
    let mut logging = LoggingConfig::default();
    if let Some(ref level) = args.log_level {
        logging.level = level.clone();
    }
    init_tracing(&logging)?;

    let inventory = Inventory::load(&args.inventory)
        .with_context(|| format!("Failed to read inventory {}", args.inventory.display()))?;
    tracing::info!(
        hostname = %inventory.asset.hostname,
        monitors = inventory.monitors.len(),
        "Dry run, nothing will be sent"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inventory)?);
    } else {
        println!("{}", output::format_inventory(&inventory));
    }
    Ok(())
}
