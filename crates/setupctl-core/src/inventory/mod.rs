//! Installed-software inventory lookup.
//!
//! An [`InventorySource`] only reads raw records from the software catalogs;
//! [`scan_inventory`] applies the name pattern, keeps records whose key is a
//! well-formed product code, and reports catalogs that could not be read.

mod reg_query;
mod snapshot;

use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::path::PathBuf;
use std::sync::LazyLock;

use glob::{MatchOptions, Pattern};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use reg_query::{RegQueryInventory, parse_reg_query_output};
pub use snapshot::{InventorySnapshot, SnapshotInventory};

static PRODUCT_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\{[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}\}$",
    )
    .expect("product code pattern is valid")
});

/// A braced GUID identifying an installed product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    /// Parse a product code. Returns `None` unless `value` is a braced GUID.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        PRODUCT_CODE_RE
            .is_match(value)
            .then(|| Self(value.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the two software catalogs on a 64-bit system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryLocation {
    /// 64-bit (native) catalog
    Native,
    /// 32-bit catalog under WOW6432Node
    Wow6432,
}

impl InventoryLocation {
    pub const ALL: [InventoryLocation; 2] = [InventoryLocation::Native, InventoryLocation::Wow6432];

    pub fn key_path(self) -> &'static str {
        match self {
            InventoryLocation::Native => {
                r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall"
            }
            InventoryLocation::Wow6432 => {
                r"HKLM\SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall"
            }
        }
    }
}

impl fmt::Display for InventoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_path())
    }
}

/// Raw catalog entry as read from a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Name of the catalog key; a product code for MSI-installed software
    pub key_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A product eligible for removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UninstallCandidate {
    pub product_code: ProductCode,
    pub display_name: String,
    pub location: InventoryLocation,
}

/// A record whose display name matched but whose key is not a product code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedRecord {
    pub key_name: String,
    pub display_name: String,
    pub location: InventoryLocation,
}

/// A catalog that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadableLocation {
    pub location: InventoryLocation,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Could not read {location}: {reason}")]
    Unreadable {
        location: InventoryLocation,
        reason: String,
    },

    #[error("Failed to read inventory snapshot {}: {source}", .path.display())]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid inventory snapshot {}: {source}", .path.display())]
    SnapshotParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid name pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Reads raw records from software catalogs.
pub trait InventorySource: Debug {
    /// Catalogs to scan, in scan order.
    fn locations(&self) -> Vec<InventoryLocation> {
        InventoryLocation::ALL.to_vec()
    }

    /// Read every record of one catalog.
    fn read_location(
        &self,
        location: InventoryLocation,
    ) -> Result<Vec<InventoryRecord>, InventoryError>;
}

/// Result of matching a name pattern against every catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub candidates: Vec<UninstallCandidate>,
    pub malformed: Vec<MalformedRecord>,
    pub unreadable: Vec<UnreadableLocation>,
    pub locations_scanned: usize,
}

impl ScanReport {
    /// True when at least one catalog was attempted and none could be read.
    pub fn all_locations_unreadable(&self) -> bool {
        self.locations_scanned > 0 && self.unreadable.len() == self.locations_scanned
    }
}

/// Case-insensitive display-name pattern.
///
/// `*` and `?` are wildcards; a pattern without wildcards matches any
/// display name containing it.
#[derive(Debug, Clone)]
pub struct NamePattern {
    pattern: Pattern,
}

impl NamePattern {
    pub fn new(raw: &str) -> Result<Self, InventoryError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(InventoryError::InvalidPattern {
                pattern: raw.to_string(),
                reason: "pattern is empty".to_string(),
            });
        }

        let source = if raw.contains(['*', '?']) {
            raw.to_string()
        } else {
            format!("*{}*", Pattern::escape(raw))
        };

        let pattern = Pattern::new(&source).map_err(|e| InventoryError::InvalidPattern {
            pattern: raw.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { pattern })
    }

    pub fn matches(&self, display_name: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: false,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        self.pattern.matches_with(display_name, options)
    }
}

/// Find every uninstall candidate whose display name matches `pattern`.
///
/// Unreadable catalogs are recorded and skipped. Records without a valid
/// product code are recorded as malformed, not returned. A product code seen
/// in more than one catalog is returned once.
pub fn scan_inventory(
    source: &dyn InventorySource,
    pattern: &str,
) -> Result<ScanReport, InventoryError> {
    let pattern = NamePattern::new(pattern)?;
    let mut report = ScanReport::default();
    let mut seen = HashSet::new();

    for location in source.locations() {
        report.locations_scanned += 1;

        let records = match source.read_location(location) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(%location, error = %err, "inventory location unreadable");
                report.unreadable.push(UnreadableLocation {
                    location,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        for record in records {
            let Some(display_name) = record.display_name.as_deref() else {
                continue;
            };
            if !pattern.matches(display_name) {
                continue;
            }

            match ProductCode::parse(&record.key_name) {
                Some(code) => {
                    if seen.insert(code.clone()) {
                        report.candidates.push(UninstallCandidate {
                            product_code: code,
                            display_name: display_name.to_string(),
                            location,
                        });
                    }
                }
                None => report.malformed.push(MalformedRecord {
                    key_name: record.key_name.clone(),
                    display_name: display_name.to_string(),
                    location,
                }),
            }
        }
    }

    tracing::debug!(
        candidates = report.candidates.len(),
        malformed = report.malformed.len(),
        unreadable = report.unreadable.len(),
        "inventory scan complete"
    );
    Ok(report)
}
