//! setupctl Core Library
//!
//! Provides installer orchestration for managed endpoints: launching the
//! installer executable, classifying its exit code, logging the outcome and
//! deciding whether the caller should continue.

pub mod classify;
pub mod config;
pub mod context;
pub mod exit;
pub mod inventory;
pub mod logging;
pub mod orchestration;
pub mod process;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Classification
    pub use crate::classify::{Classification, ClassificationTable, ExitOutcome, classify};

    // Configuration
    pub use crate::config::{ConfigStore, SetupConfig};

    // Logging
    pub use crate::logging::{Channel, ColorHint, LogEntry, ResultLogger};

    // Process
    pub use crate::process::{ProcessRunner, RunnerError, SystemRunner};

    // Inventory
    pub use crate::inventory::{
        InventoryLocation, InventorySource, ProductCode, ScanReport, UninstallCandidate,
        scan_inventory,
    };

    // Orchestration
    pub use crate::orchestration::{
        BulkUninstallReport, InstallOrchestrator, OperationReport, OperationState,
        OrchestratorError,
    };

    // Operations
    pub use crate::types::{Operation, OperationKind};
}
