//! Exit-code classification.
//!
//! Installer exit codes are interpreted through a [`ClassificationTable`]
//! rather than a hardcoded branch list, so deployments can register
//! product-specific success or retry codes without touching orchestration.
//!
//! | Code | Default classification     |
//! |------|----------------------------|
//! | 0    | `Success`                  |
//! | 1614 | `Success` (nothing to do)  |
//! | 1707 | `Success` (legacy code)    |
//! | 1641 | `SuccessRebootInitiated`   |
//! | 3010 | `SuccessRebootPending`     |
//! | *    | `Failure`                  |

mod descriptions;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use descriptions::describe;

/// Well-known installer exit codes.
pub mod codes {
    pub const SUCCESS: i32 = 0;
    pub const UNKNOWN_PRODUCT: i32 = 1605;
    pub const PRODUCT_UNINSTALLED: i32 = 1614;
    pub const INSTALL_ALREADY_RUNNING: i32 = 1618;
    pub const SUCCESS_REBOOT_INITIATED: i32 = 1641;
    pub const INSTALL_SUCCESS: i32 = 1707;
    pub const SUCCESS_REBOOT_REQUIRED: i32 = 3010;
}

/// Semantic outcome of an installer exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    Success,
    SuccessRebootPending,
    SuccessRebootInitiated,
    Retryable,
    Failure,
}

impl Classification {
    /// True for every success variant, reboot or not.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Classification::Success
                | Classification::SuccessRebootPending
                | Classification::SuccessRebootInitiated
        )
    }

    /// True when a restart is required or already under way.
    pub fn requires_reboot(self) -> bool {
        matches!(
            self,
            Classification::SuccessRebootPending | Classification::SuccessRebootInitiated
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Success => "success",
            Classification::SuccessRebootPending => "success-reboot-pending",
            Classification::SuccessRebootInitiated => "success-reboot-initiated",
            Classification::Retryable => "retryable",
            Classification::Failure => "failure",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Classification {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Classification::Success),
            "success-reboot-pending" => Ok(Classification::SuccessRebootPending),
            "success-reboot-initiated" => Ok(Classification::SuccessRebootInitiated),
            "retryable" => Ok(Classification::Retryable),
            "failure" => Ok(Classification::Failure),
            other => anyhow::bail!(
                "Unknown classification '{}'. Use success, success-reboot-pending, \
                 success-reboot-initiated, retryable or failure",
                other
            ),
        }
    }
}

/// Mapping from exit code to classification.
///
/// Each code maps to exactly one classification; codes absent from the
/// table classify as [`Classification::Failure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationTable {
    entries: BTreeMap<i32, Classification>,
}

impl ClassificationTable {
    /// A table with no entries: every code is a failure.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The default acceptable-success table.
    pub fn defaults() -> Self {
        Self::empty()
            .with(codes::SUCCESS, Classification::Success)
            .with(codes::PRODUCT_UNINSTALLED, Classification::Success)
            .with(codes::INSTALL_SUCCESS, Classification::Success)
            .with(
                codes::SUCCESS_REBOOT_INITIATED,
                Classification::SuccessRebootInitiated,
            )
            .with(
                codes::SUCCESS_REBOOT_REQUIRED,
                Classification::SuccessRebootPending,
            )
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, code: i32, classification: Classification) -> Self {
        self.insert(code, classification);
        self
    }

    /// Map `code` to `classification`, returning the replaced entry.
    pub fn insert(&mut self, code: i32, classification: Classification) -> Option<Classification> {
        self.entries.insert(code, classification)
    }

    /// Copy of this table with every entry of `overrides` applied on top.
    pub fn merged(&self, overrides: &ClassificationTable) -> Self {
        let mut merged = self.clone();
        for (code, classification) in overrides.iter() {
            merged.insert(code, classification);
        }
        merged
    }

    pub fn get(&self, code: i32) -> Option<Classification> {
        self.entries.get(&code).copied()
    }

    pub fn contains(&self, code: i32) -> bool {
        self.entries.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, Classification)> + '_ {
        self.entries.iter().map(|(code, class)| (*code, *class))
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self::defaults()
    }
}

impl FromIterator<(i32, Classification)> for ClassificationTable {
    fn from_iter<T: IntoIterator<Item = (i32, Classification)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Classify a raw exit code against a table.
pub fn classify(code: i32, table: &ClassificationTable) -> Classification {
    table.get(code).unwrap_or(Classification::Failure)
}

/// A classified exit code. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitOutcome {
    pub raw_code: i32,
    pub classification: Classification,
    pub message: String,
}

impl ExitOutcome {
    pub fn from_code(code: i32, table: &ClassificationTable) -> Self {
        let classification = classify(code, table);
        let message = match describe(code) {
            Some(text) => text.to_string(),
            None => format!("exit code {}", code),
        };
        Self {
            raw_code: code,
            classification,
            message,
        }
    }

    pub fn is_success(&self) -> bool {
        self.classification.is_success()
    }
}
