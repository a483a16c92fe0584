//! External process execution.
//!
//! Installers are launched directly with an argument vector, never through a
//! shell, so the exit code returned is the target process's own code and not
//! that of a wrapping interpreter.

mod system;

use std::fmt::Debug;
use std::path::{Path, PathBuf};

pub use system::SystemRunner;

/// Output of a process run in capture mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Process launch and wait failures. None of these carry an exit code.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Executable not found: {}", .executable.display())]
    NotFound { executable: PathBuf },

    #[error("Permission denied launching {}", .executable.display())]
    PermissionDenied { executable: PathBuf },

    #[error("Failed to launch {}: {source}", .executable.display())]
    Launch {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} terminated without an exit code", .executable.display())]
    Terminated { executable: PathBuf },
}

impl RunnerError {
    pub(crate) fn from_spawn(executable: &Path, source: std::io::Error) -> Self {
        let executable = executable.to_path_buf();
        match source.kind() {
            std::io::ErrorKind::NotFound => RunnerError::NotFound { executable },
            std::io::ErrorKind::PermissionDenied => RunnerError::PermissionDenied { executable },
            _ => RunnerError::Launch { executable, source },
        }
    }

    /// True when the process never started.
    pub fn is_launch_failure(&self) -> bool {
        !matches!(self, RunnerError::Terminated { .. })
    }
}

/// Launches an executable and blocks until it exits.
pub trait ProcessRunner: Debug {
    /// Run `executable` with `args` and return its exit code.
    fn run(&self, executable: &Path, args: &[String]) -> Result<i32, RunnerError>;

    /// Run `executable` with `args`, capturing stdout and stderr.
    fn capture(&self, executable: &Path, args: &[String]) -> Result<CapturedOutput, RunnerError>;
}

/// Render a command line for logs. Arguments containing whitespace are quoted;
/// installer properties are shown as [`msi_property_argument`] renders them.
pub fn display_command(executable: &Path, args: &[String]) -> String {
    let mut parts = vec![quote_for_display(&executable.to_string_lossy())];
    parts.extend(
        args.iter()
            .map(|arg| msi_property_argument(arg).unwrap_or_else(|| quote_for_display(arg))),
    );
    parts.join(" ")
}

/// Command-line text for a `KEY=value` installer property whose value needs
/// quoting, or `None` when the argument can be passed as-is.
///
/// msiexec parses its own command line and wants the quotes around the value
/// only (`INSTALLDIR="C:\Program Files\App"`); a value that is already
/// quoted is kept, and embedded quotes are doubled.
pub fn msi_property_argument(arg: &str) -> Option<String> {
    let (key, value) = arg.split_once('=')?;
    let is_property_name = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if !is_property_name {
        return None;
    }

    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .filter(|v| !v.contains('"'));
    if inner.is_some() {
        return Some(arg.to_string());
    }
    if !value.contains('"') && !value.chars().any(char::is_whitespace) {
        return None;
    }
    Some(format!("{}=\"{}\"", key, value.replace('"', "\"\"")))
}

fn quote_for_display(value: &str) -> String {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}
