//! Check command implementation

use crate::cli::{load_config, CheckArgs};
use crate::snipeit::{AssetService, SnipeItClient};
use anyhow::Context;
use colored::Colorize;

/// Handle `sniper check` command
pub async fn handle_check(args: &CheckArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config, args.insecure)?;
    let client = SnipeItClient::new(&config.server)?;

    let total = client
        .test_connection()
        .await
        .with_context(|| format!("Cannot reach Snipe-IT at {}", client.base_url()))?;

    println!(
        "{} Connected to {} ({} assets)",
        "✓".green(),
        client.base_url(),
        total
    );
    if !config.server.verify_ssl {
        println!("  {}", "TLS certificate verification is disabled".yellow());
    }
    Ok(())
}
