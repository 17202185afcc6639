//! CLI module for Sniper
//!
//! Command-line interface definitions and handlers for the asset sync agent.
//!
//! # Commands
//!
//! - `sync` - Reconcile a collected inventory with Snipe-IT
//! - `check` - Test the Snipe-IT connection
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Preview what the collector found without touching the server
//! sniper sync -i inventory.json --dry-run
//!
//! # Sync and emit a machine-readable report
//! sniper sync -c sniper.toml -i inventory.json --json
//! ```

pub mod check;
pub mod completions;
pub mod config;
pub mod output;
pub mod sync;

pub use check::handle_check;
pub use completions::handle_completions;
pub use config::handle_config_init;
pub use sync::handle_sync;

use crate::config::{AgentConfig, DEFAULT_CONFIG_FILE};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Sniper - Snipe-IT asset sync agent
#[derive(Parser, Debug)]
#[command(
    name = "sniper",
    version,
    about = "Synchronize computer and monitor inventory into Snipe-IT"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile a collected inventory with Snipe-IT
    Sync(SyncArgs),
    /// Test the Snipe-IT connection
    Check(CheckArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Inventory document written by the collector
    #[arg(short, long, default_value = "inventory.json")]
    pub inventory: PathBuf,

    /// Show the collected inventory without contacting the server
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Accept invalid TLS certificates
    #[arg(long)]
    pub insecure: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SNIPER_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Accept invalid TLS certificates
    #[arg(long)]
    pub insecure: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration with environment and CLI overrides, then validate it.
pub fn load_config(path: &Path, insecure: bool) -> anyhow::Result<AgentConfig> {
    let mut config = AgentConfig::load(Some(path))
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        .with_env_overrides();

    if insecure {
        config.server.verify_ssl = false;
    }

    config.validate()?;
    Ok(config)
}
