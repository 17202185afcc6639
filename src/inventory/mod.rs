//! Collector inventory document
//!
//! OS-specific collection runs outside this crate and writes a JSON document
//! with one computer and its external monitors:
//!
//! ```json
//! {
//!   "asset": {
//!     "hostname": "LAMAD0150",
//!     "manufacturer": "Dell Inc.",
//!     "model": "Latitude 5420",
//!     "serial": "0123456789",
//!     "chassis_type": 10,
//!     "custom_fields": { "Operating System": "Windows 11 Pro" }
//!   },
//!   "monitors": [
//!     { "manufacturer": "HP", "model": "HP M24fe FHD", "serial": "3CM2233B068" }
//!   ]
//! }
//! ```

mod asset;
mod error;
mod monitor;

pub use asset::{AssetClass, CollectedAsset};
pub use error::InventoryError;
pub use monitor::CollectedMonitor;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One collection run: a computer and the displays attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub asset: CollectedAsset,
    #[serde(default)]
    pub monitors: Vec<CollectedMonitor>,
}

impl Inventory {
    /// Read and parse an inventory document.
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        if !path.exists() {
            return Err(InventoryError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, InventoryError> {
        let inventory: Inventory = serde_json::from_str(content)?;
        if inventory.asset.hostname.is_empty() {
            return Err(InventoryError::MissingField("asset.hostname"));
        }
        Ok(inventory)
    }
}
