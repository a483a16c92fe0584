//! Inventory read from a JSON export of the uninstall catalogs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{InventoryError, InventoryLocation, InventoryRecord, InventorySource};

/// On-disk layout of an inventory export.
///
/// ```json
/// {
///   "native":  [{ "key_name": "{...}", "display_name": "App" }],
///   "wow6432": []
/// }
/// ```
///
/// A catalog that is absent (as opposed to empty) is reported unreadable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub native: Option<Vec<InventoryRecord>>,
    #[serde(default)]
    pub wow6432: Option<Vec<InventoryRecord>>,
}

#[derive(Debug, Clone)]
pub struct SnapshotInventory {
    path: PathBuf,
    snapshot: InventorySnapshot,
}

impl SnapshotInventory {
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| InventoryError::SnapshotRead {
                path: path.to_path_buf(),
                source,
            })?;
        let snapshot =
            serde_json::from_str(&content).map_err(|source| InventoryError::SnapshotParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            snapshot,
        })
    }

    pub fn from_snapshot(path: impl Into<PathBuf>, snapshot: InventorySnapshot) -> Self {
        Self {
            path: path.into(),
            snapshot,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InventorySource for SnapshotInventory {
    fn read_location(
        &self,
        location: InventoryLocation,
    ) -> Result<Vec<InventoryRecord>, InventoryError> {
        let records = match location {
            InventoryLocation::Native => &self.snapshot.native,
            InventoryLocation::Wow6432 => &self.snapshot.wow6432,
        };
        records.clone().ok_or_else(|| InventoryError::Unreadable {
            location,
            reason: format!("catalog missing from snapshot {}", self.path.display()),
        })
    }
}
