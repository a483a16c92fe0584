//! Shared fakes for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use setupctl_core::inventory::{InventoryError, InventoryLocation, InventoryRecord, InventorySource};
use setupctl_core::logging::{Channel, ConsoleSink, LogEntry, ResultLogger};
use setupctl_core::orchestration::{InstallOrchestrator, OrchestratorSettings};
use setupctl_core::process::{CapturedOutput, ProcessRunner, RunnerError};

// =========================================================================
// Process runner
// =========================================================================

/// What a scripted invocation returns.
#[derive(Debug, Clone)]
pub enum Reply {
    Exit(i32),
    NotFound,
    Terminated,
    Output(CapturedOutput),
}

#[derive(Debug, Default)]
struct RunnerState {
    replies: Vec<(String, Reply)>,
    fallback: Option<Reply>,
    calls: Vec<(PathBuf, Vec<String>)>,
}

/// Runner returning scripted replies. The first rule whose needle occurs in
/// the joined argument list wins; clones share state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    state: Arc<Mutex<RunnerState>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every unmatched invocation exits with `code`.
    pub fn exiting(code: i32) -> Self {
        let runner = Self::new();
        runner.state.lock().unwrap().fallback = Some(Reply::Exit(code));
        runner
    }

    pub fn on(self, needle: &str, reply: Reply) -> Self {
        self.state
            .lock()
            .unwrap()
            .replies
            .push((needle.to_string(), reply));
        self
    }

    pub fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Argument lists of calls made to `executable`.
    pub fn calls_to(&self, executable: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|(exe, _)| exe == Path::new(executable))
            .map(|(_, args)| args)
            .collect()
    }

    fn reply(&self, executable: &Path, args: &[String]) -> Reply {
        let mut state = self.state.lock().unwrap();
        state.calls.push((executable.to_path_buf(), args.to_vec()));
        let joined = args.join(" ");
        state
            .replies
            .iter()
            .find(|(needle, _)| joined.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .or_else(|| state.fallback.clone())
            .unwrap_or(Reply::Exit(0))
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, executable: &Path, args: &[String]) -> Result<i32, RunnerError> {
        match self.reply(executable, args) {
            Reply::Exit(code) => Ok(code),
            Reply::Output(output) => Ok(output.exit_code),
            Reply::NotFound => Err(RunnerError::NotFound {
                executable: executable.to_path_buf(),
            }),
            Reply::Terminated => Err(RunnerError::Terminated {
                executable: executable.to_path_buf(),
            }),
        }
    }

    fn capture(&self, executable: &Path, args: &[String]) -> Result<CapturedOutput, RunnerError> {
        match self.reply(executable, args) {
            Reply::Output(output) => Ok(output),
            Reply::Exit(code) => Ok(CapturedOutput {
                exit_code: code,
                stdout: String::new(),
                stderr: String::new(),
            }),
            Reply::NotFound => Err(RunnerError::NotFound {
                executable: executable.to_path_buf(),
            }),
            Reply::Terminated => Err(RunnerError::Terminated {
                executable: executable.to_path_buf(),
            }),
        }
    }
}

// =========================================================================
// Console sink
// =========================================================================

/// Sink that records every entry instead of printing it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn texts_on(&self, channel: Channel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.channel == channel)
            .map(|e| e.text)
            .collect()
    }

    pub fn any_on(&self, channel: Channel, needle: &str) -> bool {
        self.texts_on(channel).iter().any(|t| t.contains(needle))
    }
}

impl ConsoleSink for RecordingSink {
    fn emit(&self, entry: &LogEntry, _line: &str) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// =========================================================================
// Inventory
// =========================================================================

/// In-memory catalogs; a location mapped to `None` fails to read.
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    catalogs: HashMap<InventoryLocation, Option<Vec<InventoryRecord>>>,
}

impl StaticInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: InventoryLocation, records: &[(&str, &str)]) -> Self {
        let records = records
            .iter()
            .map(|(key, name)| InventoryRecord {
                key_name: key.to_string(),
                display_name: Some(name.to_string()),
            })
            .collect();
        self.catalogs.insert(location, Some(records));
        self
    }

    pub fn unreadable(mut self, location: InventoryLocation) -> Self {
        self.catalogs.insert(location, None);
        self
    }
}

impl InventorySource for StaticInventory {
    fn read_location(
        &self,
        location: InventoryLocation,
    ) -> Result<Vec<InventoryRecord>, InventoryError> {
        match self.catalogs.get(&location) {
            Some(Some(records)) => Ok(records.clone()),
            Some(None) => Err(InventoryError::Unreadable {
                location,
                reason: "access denied".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

// =========================================================================
// Orchestrator
// =========================================================================

pub const INSTALLER: &str = "msiexec.exe";

/// Orchestrator wired to fakes, with default settings.
pub fn orchestrator(runner: &ScriptedRunner) -> (InstallOrchestrator, RecordingSink) {
    orchestrator_with(runner, OrchestratorSettings::default(), None)
}

pub fn orchestrator_with(
    runner: &ScriptedRunner,
    settings: OrchestratorSettings,
    log_path: Option<PathBuf>,
) -> (InstallOrchestrator, RecordingSink) {
    let sink = RecordingSink::new();
    let logger = ResultLogger::with_sink(log_path, Box::new(sink.clone()));
    let orchestrator = InstallOrchestrator::new(Box::new(runner.clone()), logger, settings);
    (orchestrator, sink)
}
