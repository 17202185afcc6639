//! Output formatting helpers for CLI commands

use crate::inventory::Inventory;
use crate::reconciler::{CheckoutOutcome, SyncAction, SyncOutcome, SyncReport};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

fn action_label(action: SyncAction) -> String {
    match action {
        SyncAction::Created => "Created".green().to_string(),
        SyncAction::Updated => "Updated".yellow().to_string(),
        SyncAction::NoChange => "No change".dimmed().to_string(),
    }
}

fn checkout_label(checkout: Option<&CheckoutOutcome>) -> String {
    match checkout {
        None => "-".to_string(),
        Some(CheckoutOutcome::CheckedOut { user_name, .. }) => {
            format!("→ {}", user_name).green().to_string()
        }
        Some(CheckoutOutcome::AlreadyAssigned { user_name, .. }) => user_name.clone(),
        Some(CheckoutOutcome::SkippedNoUser) => "no user".dimmed().to_string(),
        Some(CheckoutOutcome::Failed { .. }) => "failed".red().to_string(),
    }
}

/// Format one row per reconciled record.
pub fn format_report_table(report: &SyncReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Kind", "Name", "Asset Tag", "ID", "Action", "Changes", "Fields", "Checkout",
    ]);

    for outcome in report.outcomes() {
        match outcome {
            SyncOutcome::Synced(r) => {
                let fields = match &r.verification.error {
                    Some(_) => "?".to_string(),
                    None => format!(
                        "{}/{}",
                        r.verification.populated_fields, r.verification.total_fields
                    ),
                };
                table.add_row(vec![
                    Cell::new(format!("{:?}", r.kind)),
                    Cell::new(&r.name),
                    Cell::new(&r.asset_tag),
                    Cell::new(r.asset_id),
                    Cell::new(action_label(r.action)),
                    Cell::new(r.changes.len()),
                    Cell::new(fields),
                    Cell::new(checkout_label(r.checkout.as_ref())),
                ]);
            }
            SyncOutcome::Failed {
                name,
                kind,
                stage,
                ..
            } => {
                table.add_row(vec![
                    Cell::new(format!("{:?}", kind)),
                    Cell::new(name),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new(format!("Failed ({})", stage).red().to_string()),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                ]);
            }
        }
    }

    table.to_string()
}

/// Change descriptions and failure messages below the table.
pub fn format_report_details(report: &SyncReport) -> String {
    let mut lines = Vec::new();
    for outcome in report.outcomes() {
        match outcome {
            SyncOutcome::Synced(r) if !r.changes.is_empty() => {
                lines.push(format!("{}:", r.name.bold()));
                for change in &r.changes {
                    lines.push(format!("  • {}", change));
                }
            }
            SyncOutcome::Synced(r) => {
                if let Some(CheckoutOutcome::Failed { error }) = &r.checkout {
                    lines.push(format!("{}: checkout failed: {}", r.name.bold(), error));
                }
            }
            SyncOutcome::Failed { name, error, .. } => {
                lines.push(format!("{} {}: {}", "✗".red(), name.bold(), error));
            }
        }
    }
    lines.join("\n")
}

/// One-line summary with counts, average field coverage and elapsed time.
pub fn format_summary(report: &SyncReport) -> String {
    let synced: Vec<_> = report.outcomes().filter_map(SyncOutcome::result).collect();
    let verified: Vec<_> = synced
        .iter()
        .filter(|r| r.verification.error.is_none() && r.verification.total_fields > 0)
        .collect();
    let coverage = if verified.is_empty() {
        "n/a".to_string()
    } else {
        let total: f64 = verified.iter().map(|r| r.verification.success_rate).sum();
        format!("{:.1}%", total / verified.len() as f64)
    };

    let failed = report.failed_count();
    let failed_str = if failed > 0 {
        format!("{} failed", failed).red().to_string()
    } else {
        "0 failed".to_string()
    };

    format!(
        "{} created, {} updated, {} unchanged, {} · field coverage {} · {:.2}s",
        report.count(SyncAction::Created),
        report.count(SyncAction::Updated),
        report.count(SyncAction::NoChange),
        failed_str,
        coverage,
        report.elapsed_ms as f64 / 1000.0
    )
}

/// Format the sync report as JSON
pub fn format_report_json(report: &SyncReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Human-readable dump of a collected inventory for `--dry-run`.
pub fn format_inventory(inventory: &Inventory) -> String {
    let asset = &inventory.asset;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Hostname", asset.hostname.as_str()]);
    table.add_row(vec!["Manufacturer", asset.manufacturer.as_str()]);
    table.add_row(vec!["Model", asset.model.as_str()]);
    table.add_row(vec!["Serial", asset.serial.as_str()]);
    table.add_row(vec!["Class", asset.class.as_str()]);
    for (name, value) in &asset.custom_fields {
        table.add_row(vec![name.as_str(), value.as_str()]);
    }

    let mut out = table.to_string();
    if !inventory.monitors.is_empty() {
        let mut monitors = Table::new();
        monitors.load_preset(UTF8_FULL);
        monitors.set_content_arrangement(ContentArrangement::Dynamic);
        monitors.set_header(vec!["Manufacturer", "Model", "Serial", "Resolution"]);
        for m in &inventory.monitors {
            monitors.add_row(vec![
                m.manufacturer.as_str(),
                m.model.as_str(),
                m.serial.as_str(),
                m.resolution.as_str(),
            ]);
        }
        out.push('\n');
        out.push_str(&monitors.to_string());
    }
    out
}
