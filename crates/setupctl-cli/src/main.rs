//! setupctl - installer orchestration for managed endpoints
//!
//! Usage:
//!   setupctl install app.msi -- TRANSFORMS=site.mst
//!   setupctl patch hotfix.msp
//!   setupctl uninstall {GUID}
//!   setupctl uninstall-matching "Java*" --yes
//!   setupctl classify 3010
//!
//! The process exits with the installer's code (0 for plain success) or a
//! reserved fault code when setupctl itself could not do its job.

mod confirm;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use setupctl_core::config::ConfigStore;
use setupctl_core::context::{AppContext, ContextOverrides};
use setupctl_core::exit::{self, Fault};
use setupctl_core::logging::{ConsoleSink, StderrSink, TerminalSink};
use setupctl_core::orchestration::{InstallOrchestrator, OrchestratorError};
use setupctl_core::types::Operation;

use crate::confirm::ConfirmPrompt;

#[derive(Parser)]
#[command(name = "setupctl")]
#[command(about = "Run Windows Installer operations and report their outcome", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/setupctl/setupctl.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Append result lines to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Installer executable (default: msiexec.exe)
    #[arg(long, global = true)]
    installer: Option<PathBuf>,

    /// Read installed products from a JSON snapshot instead of the registry
    #[arg(long, global = true)]
    inventory_snapshot: Option<PathBuf>,

    /// Report a failed result instead of aborting
    #[arg(long, global = true)]
    continue_on_failure: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a package (.msi)
    Install {
        /// Package path
        package: String,
        /// Extra installer arguments, after `--`
        #[arg(last = true)]
        extra: Vec<String>,
    },

    /// Apply an update package (.msp)
    Patch {
        /// Update package path
        package: String,
        /// Extra installer arguments, after `--`
        #[arg(last = true)]
        extra: Vec<String>,
    },

    /// Remove one product by product code or package path
    #[command(alias = "rm")]
    Uninstall {
        /// Product code such as {12345678-1234-1234-1234-123456789012}
        product: String,
        /// Extra installer arguments, after `--`
        #[arg(last = true)]
        extra: Vec<String>,
    },

    /// Remove every installed product whose display name matches
    UninstallMatching {
        /// Display-name pattern; `*` and `?` are wildcards, otherwise substring
        pattern: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show how an installer exit code is classified
    Classify {
        /// Installer exit code
        #[arg(allow_negative_numbers = true)]
        code: i32,
    },
}

#[derive(Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Human-readable summary
    #[default]
    Table,
    /// Machine-readable JSON on stdout
    Json,
    /// No summary; only the exit code
    Quiet,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "setupctl=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let code = run(cli);
    tracing::debug!(code, "exiting");
    std::process::exit(code);
}

fn run(cli: Cli) -> i32 {
    let context = match load_context(&cli) {
        Ok(context) => context,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return Fault::ConfigInvalid.code();
        }
    };

    let console: Box<dyn ConsoleSink> = match cli.format {
        OutputFormat::Table => Box::new(TerminalSink::new()),
        OutputFormat::Json | OutputFormat::Quiet => Box::new(StderrSink),
    };
    let orchestrator = match context.orchestrator_with_console(console) {
        Ok(orchestrator) => orchestrator,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return Fault::ConfigInvalid.code();
        }
    };

    let code = match cli.command {
        Commands::Install { package, extra } => run_single(
            &orchestrator,
            Operation::install(package).with_extra_args(extra),
            cli.continue_on_failure,
            cli.format,
        ),
        Commands::Patch { package, extra } => run_single(
            &orchestrator,
            Operation::patch(package).with_extra_args(extra),
            cli.continue_on_failure,
            cli.format,
        ),
        Commands::Uninstall { product, extra } => run_single(
            &orchestrator,
            Operation::uninstall(product).with_extra_args(extra),
            cli.continue_on_failure,
            cli.format,
        ),
        Commands::UninstallMatching { pattern, yes } => {
            run_uninstall_matching(&context, &orchestrator, &pattern, yes, cli.format)
        }
        Commands::Classify { code } => {
            let printed =
                output::print_classification(code, &orchestrator.settings().table, cli.format);
            with_output(printed, exit::SUCCESS)
        }
    };

    let logger = orchestrator.logger();
    let settled = exit::settle(code, logger.write_failures(), logger.errors_reported());
    if settled != code {
        tracing::warn!(
            write_failures = logger.write_failures(),
            errors_reported = logger.errors_reported(),
            code = settled,
            "run succeeded but the result log reports problems"
        );
    }
    settled
}

/// `code` once its result has been printed. A print failure replaces only a
/// successful code; an installer failure stays visible.
fn with_output(printed: Result<()>, code: i32) -> i32 {
    match printed {
        Ok(()) => code,
        Err(err) => {
            eprintln!("Error: could not write output: {:#}", err);
            if code == exit::SUCCESS {
                Fault::OutputFailed.code()
            } else {
                code
            }
        }
    }
}

fn load_context(cli: &Cli) -> Result<AppContext> {
    let store = match &cli.config {
        Some(path) => ConfigStore::from_path(path),
        None => ConfigStore::from_default()?,
    };

    let mut overrides = ContextOverrides::default();
    if let Some(path) = &cli.log_file {
        overrides = overrides.with_log_file(path);
    }
    if let Some(path) = &cli.installer {
        overrides = overrides.with_installer(path);
    }
    if let Some(path) = &cli.inventory_snapshot {
        overrides = overrides.with_inventory_snapshot(path);
    }

    AppContext::load(&store, overrides)
}

fn run_single(
    orchestrator: &InstallOrchestrator,
    operation: Operation,
    continue_on_failure: bool,
    format: OutputFormat,
) -> i32 {
    let operation = operation.with_continue_on_failure(continue_on_failure);
    match orchestrator.execute(&operation) {
        Ok(report) => with_output(output::print_report(&report, format), report.exit_code()),
        Err(err) => with_output(output::print_error(&err, format), err.exit_code()),
    }
}

fn run_uninstall_matching(
    context: &AppContext,
    orchestrator: &InstallOrchestrator,
    pattern: &str,
    yes: bool,
    format: OutputFormat,
) -> i32 {
    let source = match context.inventory_source() {
        Ok(source) => source,
        Err(err) => {
            let err = OrchestratorError::from(err);
            return with_output(output::print_error(&err, format), err.exit_code());
        }
    };

    let scan = match orchestrator.find_candidates(source.as_ref(), pattern) {
        Ok(scan) => scan,
        Err(err) => return with_output(output::print_error(&err, format), err.exit_code()),
    };

    if !scan.candidates.is_empty() {
        // Listing and prompt go to stderr so JSON output stays parseable.
        let mut prompt = ConfirmPrompt::new(std::io::stderr(), yes)
            .with_interactive(console::Term::stderr().is_term());
        match prompt.confirm(pattern, &scan.candidates) {
            Ok(true) => {}
            Ok(false) => {
                eprintln!("Cancelled");
                return exit::SUCCESS;
            }
            Err(err) => {
                eprintln!("Error: {:#}", err);
                return Fault::PromptUnavailable.code();
            }
        }
    }

    let report = orchestrator.uninstall_candidates(pattern, scan);
    with_output(output::print_bulk_report(&report, format), report.exit_code())
}
