//! Install, patch and uninstall orchestration.

use std::path::PathBuf;

use serde::Serialize;

use crate::classify::{Classification, ClassificationTable, ExitOutcome, codes};
use crate::exit::{self, Fault};
use crate::inventory::InventoryError;
use crate::logging::{Channel, ColorHint, ResultLogger};
use crate::orchestration::args::{InstallerSettings, build_arguments};
use crate::process::{ProcessRunner, RunnerError, display_command};
use crate::types::{Operation, OperationKind};

/// Lifecycle of one operation: `Pending -> Running -> {Succeeded, SucceededRebootPending, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationState {
    Pending,
    Running,
    Succeeded,
    SucceededRebootPending,
    Failed,
}

impl OperationState {
    fn settled(classification: Classification) -> Self {
        match classification {
            Classification::Success => OperationState::Succeeded,
            Classification::SuccessRebootPending | Classification::SuccessRebootInitiated => {
                OperationState::SucceededRebootPending
            }
            Classification::Retryable | Classification::Failure => OperationState::Failed,
        }
    }
}

/// Normalized result of one installer run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    pub kind: OperationKind,
    pub target: String,
    pub arguments: Vec<String>,
    pub outcome: ExitOutcome,
    pub state: OperationState,
}

impl OperationReport {
    pub fn classification(&self) -> Classification {
        self.outcome.classification
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Process exit code to surface for this report.
    pub fn exit_code(&self) -> i32 {
        exit::exit_code_for(&self.outcome)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("{kind} of {target} could not run: {source}")]
    Runner {
        kind: OperationKind,
        target: String,
        #[source]
        source: RunnerError,
    },

    #[error(
        "{} of {} failed with exit code {}: {}",
        .report.kind,
        .report.target,
        .report.outcome.raw_code,
        .report.outcome.message
    )]
    Aborted { report: Box<OperationReport> },

    #[error("Could not terminate blocking process {image}: {reason}")]
    BlockingProcess { image: String, reason: String },

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

impl OrchestratorError {
    /// Report of the failed run, when the installer ran at all.
    pub fn report(&self) -> Option<&OperationReport> {
        match self {
            OrchestratorError::Aborted { report } => Some(report.as_ref()),
            _ => None,
        }
    }

    /// Process exit code to surface for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            OrchestratorError::Runner { source, .. } => {
                if source.is_launch_failure() {
                    Fault::LaunchFailed.code()
                } else {
                    Fault::ProcessTerminated.code()
                }
            }
            OrchestratorError::Aborted { report } => report.exit_code(),
            OrchestratorError::BlockingProcess { .. } => Fault::BlockingProcess.code(),
            OrchestratorError::Inventory(InventoryError::InvalidPattern { .. }) => {
                Fault::ConfigInvalid.code()
            }
            OrchestratorError::Inventory(_) => Fault::InventoryUnreadable.code(),
        }
    }
}

/// Processes to stop before an install or patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockingProcesses {
    pub terminator: PathBuf,
    pub images: Vec<String>,
}

impl Default for BlockingProcesses {
    fn default() -> Self {
        Self {
            terminator: PathBuf::from("taskkill.exe"),
            images: Vec::new(),
        }
    }
}

/// Everything the orchestrator needs besides its collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrchestratorSettings {
    pub installer: InstallerSettings,
    pub table: ClassificationTable,
    pub blocking: BlockingProcesses,
}

/// Composes process execution, exit-code classification and result logging.
#[derive(Debug)]
pub struct InstallOrchestrator {
    runner: Box<dyn ProcessRunner>,
    logger: ResultLogger,
    settings: OrchestratorSettings,
}

impl InstallOrchestrator {
    pub fn new(
        runner: Box<dyn ProcessRunner>,
        logger: ResultLogger,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            runner,
            logger,
            settings,
        }
    }

    pub fn logger(&self) -> &ResultLogger {
        &self.logger
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    pub(crate) fn runner(&self) -> &dyn ProcessRunner {
        self.runner.as_ref()
    }

    /// Install a package, aborting on failure.
    pub fn install(
        &self,
        path: &str,
        extra_args: &[String],
    ) -> Result<OperationReport, OrchestratorError> {
        self.execute(&Operation::install(path).with_extra_args(extra_args.iter().cloned()))
    }

    /// Apply an update package, aborting on failure.
    pub fn patch(
        &self,
        path: &str,
        extra_args: &[String],
    ) -> Result<OperationReport, OrchestratorError> {
        self.execute(&Operation::patch(path).with_extra_args(extra_args.iter().cloned()))
    }

    /// Remove one product by identifier, aborting on failure.
    pub fn uninstall(
        &self,
        product_code: &str,
        extra_args: &[String],
    ) -> Result<OperationReport, OrchestratorError> {
        self.execute(&Operation::uninstall(product_code).with_extra_args(extra_args.iter().cloned()))
    }

    /// Table used to classify results of `kind`.
    ///
    /// Patch runs also accept "unknown product", which removal flows report
    /// when the patch target is already gone.
    pub fn table_for(&self, kind: OperationKind) -> ClassificationTable {
        match kind {
            OperationKind::Patch => {
                let mut table = self.settings.table.clone();
                if !table.contains(codes::UNKNOWN_PRODUCT) {
                    table.insert(codes::UNKNOWN_PRODUCT, Classification::Success);
                }
                table
            }
            OperationKind::Install | OperationKind::Uninstall => self.settings.table.clone(),
        }
    }

    /// Run one operation end to end.
    ///
    /// Every outcome is logged before the continue-or-abort decision. A
    /// failed or retryable result is returned as `Ok` when the operation
    /// allows continuing and as [`OrchestratorError::Aborted`] otherwise.
    pub fn execute(&self, operation: &Operation) -> Result<OperationReport, OrchestratorError> {
        if matches!(operation.kind, OperationKind::Install | OperationKind::Patch) {
            self.stop_blocking_processes()?;
        }

        let mut state = OperationState::Pending;
        let arguments = build_arguments(&self.settings.installer, operation);
        let executable = &self.settings.installer.executable;
        tracing::debug!(kind = %operation.kind, target = %operation.target, ?state, "operation created");

        self.record(
            Channel::Verbose,
            &format!("Running: {}", display_command(executable, &arguments)),
            None,
        );
        state = OperationState::Running;
        tracing::debug!(?state, "launching installer");

        let code = match self.runner.run(executable, &arguments) {
            Ok(code) => code,
            Err(source) => {
                self.record(
                    Channel::Error,
                    &format!(
                        "{} of {} could not run: {}",
                        operation.kind, operation.target, source
                    ),
                    None,
                );
                return Err(OrchestratorError::Runner {
                    kind: operation.kind,
                    target: operation.target.clone(),
                    source,
                });
            }
        };

        let outcome = ExitOutcome::from_code(code, &self.table_for(operation.kind));
        state = OperationState::settled(outcome.classification);
        tracing::info!(
            kind = %operation.kind,
            target = %operation.target,
            code,
            classification = %outcome.classification,
            ?state,
            "operation finished"
        );

        let report = OperationReport {
            kind: operation.kind,
            target: operation.target.clone(),
            arguments,
            outcome,
            state,
        };
        self.log_outcome(&report);

        if report.is_success() || operation.allow_continue_on_failure {
            return Ok(report);
        }

        self.record(
            Channel::Error,
            &format!(
                "Aborting after {} of {} (exit code {})",
                report.kind, report.target, report.outcome.raw_code
            ),
            None,
        );
        Err(OrchestratorError::Aborted {
            report: Box::new(report),
        })
    }

    fn log_outcome(&self, report: &OperationReport) {
        let outcome = &report.outcome;
        match outcome.classification {
            Classification::Success => self.record(
                Channel::Host,
                &format!(
                    "{} of {} succeeded (exit code {})",
                    report.kind, report.target, outcome.raw_code
                ),
                Some(ColorHint::Green),
            ),
            Classification::SuccessRebootPending | Classification::SuccessRebootInitiated => self
                .record(
                    Channel::Host,
                    &format!(
                        "{} of {} succeeded, restart required (exit code {}): {}",
                        report.kind, report.target, outcome.raw_code, outcome.message
                    ),
                    Some(ColorHint::Yellow),
                ),
            Classification::Retryable => self.record(
                Channel::Warning,
                &format!(
                    "{} of {} can be retried (exit code {}): {}",
                    report.kind, report.target, outcome.raw_code, outcome.message
                ),
                None,
            ),
            Classification::Failure => self.record(
                Channel::Warning,
                &format!(
                    "{} of {} failed (exit code {}): {}",
                    report.kind, report.target, outcome.raw_code, outcome.message
                ),
                None,
            ),
        }
    }

    /// Log through the result logger. A log-file failure never changes the
    /// operation's outcome; it is counted by the logger and traced here.
    pub(crate) fn record(&self, channel: Channel, message: &str, color: Option<ColorHint>) {
        if let Err(err) = self.logger.log(message, channel, None, color) {
            tracing::warn!(error = %err, "result log write failed");
        }
    }
}
