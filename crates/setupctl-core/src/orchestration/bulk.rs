//! Bulk uninstall of every product matching a display-name pattern.

use serde::Serialize;

use crate::exit::{self, Fault};
use crate::inventory::{InventorySource, ScanReport, UninstallCandidate, scan_inventory};
use crate::logging::{Channel, ColorHint};
use crate::types::Operation;

use super::orchestrator::{InstallOrchestrator, OperationReport, OrchestratorError};

/// Per-candidate result. Each candidate is attempted independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum CandidateResult {
    /// The installer ran; the report carries its classification
    Completed { report: OperationReport },
    /// The installer could not be run for this candidate
    NotRun { error: String, exit_code: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateOutcome {
    pub candidate: UninstallCandidate,
    pub result: CandidateResult,
}

impl CandidateOutcome {
    pub fn is_success(&self) -> bool {
        match &self.result {
            CandidateResult::Completed { report } => report.is_success(),
            CandidateResult::NotRun { .. } => false,
        }
    }
}

/// Aggregate of a bulk uninstall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkUninstallReport {
    pub pattern: String,
    pub scan: ScanReport,
    pub outcomes: Vec<CandidateOutcome>,
}

impl BulkUninstallReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    /// Code of the first failed candidate, else the first reboot code, else
    /// 0. When every catalog was unreadable the inventory fault is returned.
    pub fn exit_code(&self) -> i32 {
        if self.scan.all_locations_unreadable() {
            return Fault::InventoryUnreadable.code();
        }

        let mut reboot = None;
        for outcome in &self.outcomes {
            match &outcome.result {
                CandidateResult::NotRun { exit_code, .. } => return *exit_code,
                CandidateResult::Completed { report } => {
                    if !report.is_success() {
                        return report.exit_code();
                    }
                    if reboot.is_none() && report.classification().requires_reboot() {
                        reboot = Some(report.exit_code());
                    }
                }
            }
        }
        reboot.unwrap_or(exit::SUCCESS)
    }
}

impl InstallOrchestrator {
    /// Scan for products matching `pattern` without uninstalling anything.
    pub fn find_candidates(
        &self,
        source: &dyn InventorySource,
        pattern: &str,
    ) -> Result<ScanReport, OrchestratorError> {
        let scan = scan_inventory(source, pattern)?;

        for gap in &scan.unreadable {
            self.record(
                Channel::Warning,
                &format!("Skipping inventory {}: {}", gap.location, gap.reason),
                None,
            );
        }
        for record in &scan.malformed {
            self.record(
                Channel::Verbose,
                &format!(
                    "Skipping '{}' in {}: '{}' is not a product code",
                    record.display_name, record.location, record.key_name
                ),
                None,
            );
        }

        Ok(scan)
    }

    /// Uninstall every product matching `pattern`.
    ///
    /// Each candidate runs with continue-on-failure, so one failure never
    /// stops the batch. Only an invalid pattern is returned as an error.
    pub fn uninstall_by_pattern(
        &self,
        source: &dyn InventorySource,
        pattern: &str,
    ) -> Result<BulkUninstallReport, OrchestratorError> {
        let scan = self.find_candidates(source, pattern)?;
        Ok(self.uninstall_candidates(pattern, scan))
    }

    /// Uninstall the candidates of an existing scan.
    pub fn uninstall_candidates(&self, pattern: &str, scan: ScanReport) -> BulkUninstallReport {
        if scan.candidates.is_empty() {
            self.record(
                Channel::Host,
                &format!("No installed products match '{}'", pattern),
                None,
            );
        }

        let mut outcomes = Vec::with_capacity(scan.candidates.len());
        for candidate in &scan.candidates {
            self.record(
                Channel::Host,
                &format!(
                    "Uninstalling {} {}",
                    candidate.display_name, candidate.product_code
                ),
                Some(ColorHint::Cyan),
            );

            let operation =
                Operation::uninstall(candidate.product_code.as_str()).with_continue_on_failure(true);
            let result = match self.execute(&operation) {
                Ok(report) => CandidateResult::Completed { report },
                Err(err) => CandidateResult::NotRun {
                    exit_code: err.exit_code(),
                    error: err.to_string(),
                },
            };

            outcomes.push(CandidateOutcome {
                candidate: candidate.clone(),
                result,
            });
        }

        let report = BulkUninstallReport {
            pattern: pattern.to_string(),
            scan,
            outcomes,
        };
        let failures = report.failures();
        if failures > 0 {
            self.record(
                Channel::Warning,
                &format!(
                    "{} of {} uninstalls matching '{}' failed",
                    failures,
                    report.outcomes.len(),
                    pattern
                ),
                None,
            );
        }
        report
    }
}
