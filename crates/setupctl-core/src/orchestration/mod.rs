//! Install/patch/uninstall orchestration over the installer executable.

pub mod args;
mod blocking;
pub mod bulk;
pub mod orchestrator;

pub use args::{InstallerSettings, build_arguments};
pub use bulk::{BulkUninstallReport, CandidateOutcome, CandidateResult};
pub use orchestrator::{
    BlockingProcesses, InstallOrchestrator, OperationReport, OperationState, OrchestratorError,
    OrchestratorSettings,
};
