//! Result printing for each output format.

use anyhow::Result;
use console::style;

use setupctl_core::classify::{ClassificationTable, ExitOutcome, describe};
use setupctl_core::exit;
use setupctl_core::orchestration::{
    BulkUninstallReport, CandidateResult, OperationReport, OrchestratorError,
};

use crate::OutputFormat;

pub fn print_report(report: &OperationReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let marker = if report.is_success() {
                style("✓").green()
            } else {
                style("✗").red()
            };
            println!(
                "{} {} {}: {} ({})",
                marker,
                report.kind,
                report.target,
                report.classification(),
                report.outcome.raw_code
            );
            if report.classification().requires_reboot() {
                println!("  {}", style("A restart is required to finish.").yellow());
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "report": report,
                "exit_code": report.exit_code(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

pub fn print_error(err: &OrchestratorError, format: OutputFormat) -> Result<()> {
    let code = err.exit_code();
    match format {
        OutputFormat::Table => {
            eprintln!("{} {}", style("✗").red(), err);
            if let Some(phase) = exit::phase_of(code) {
                eprintln!("  {:?} fault, exit code {}", phase, code);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "error": err.to_string(),
                "report": err.report(),
                "phase": exit::phase_of(code),
                "exit_code": code,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

pub fn print_bulk_report(report: &BulkUninstallReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for outcome in &report.outcomes {
                let name = &outcome.candidate.display_name;
                match &outcome.result {
                    CandidateResult::Completed { report } if report.is_success() => {
                        println!("{} {}: {}", style("✓").green(), name, report.classification());
                    }
                    CandidateResult::Completed { report } => {
                        println!(
                            "{} {}: {} ({})",
                            style("✗").red(),
                            name,
                            report.outcome.message,
                            report.outcome.raw_code
                        );
                    }
                    CandidateResult::NotRun { error, .. } => {
                        println!("{} {}: {}", style("✗").red(), name, error);
                    }
                }
            }

            let failures = report.failures();
            if report.outcomes.is_empty() {
                println!("No products matching '{}'", report.pattern);
            } else if failures == 0 {
                println!("Summary: {} uninstalled", report.outcomes.len());
            } else {
                println!(
                    "Summary: {} uninstalled, {} failed",
                    report.outcomes.len() - failures,
                    failures
                );
            }
            if !report.scan.malformed.is_empty() {
                println!(
                    "  {} matching entries skipped (no product code)",
                    report.scan.malformed.len()
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "pattern": report.pattern,
                "outcomes": report.outcomes,
                "malformed": report.scan.malformed,
                "unreadable": report.scan.unreadable,
                "failures": report.failures(),
                "exit_code": report.exit_code(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

/// `classify` exits 0 once this succeeds; the classification is the output.
pub fn print_classification(
    code: i32,
    table: &ClassificationTable,
    format: OutputFormat,
) -> Result<()> {
    let outcome = ExitOutcome::from_code(code, table);
    match format {
        OutputFormat::Table => {
            println!("{}: {}", code, outcome.classification);
            if let Some(text) = describe(code) {
                println!("  {}", text);
            }
            println!("  exit code surfaced: {}", exit::exit_code_for(&outcome));
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "code": code,
                "classification": outcome.classification,
                "description": describe(code),
                "exit_code": exit::exit_code_for(&outcome),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => println!("{}", outcome.classification),
    }
    Ok(())
}
