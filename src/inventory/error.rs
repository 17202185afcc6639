//! Inventory document errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading the collector's inventory document
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Inventory file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse inventory: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Inventory is missing '{0}'")]
    MissingField(&'static str),
}
