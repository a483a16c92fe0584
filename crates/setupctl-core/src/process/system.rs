//! Runner backed by `std::process::Command`.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use super::{CapturedOutput, ProcessRunner, RunnerError};

fn command(executable: &Path, args: &[String]) -> Command {
    let mut command = Command::new(executable);
    for arg in args {
        push_arg(&mut command, arg);
    }
    command.stdin(Stdio::null());
    command
}

/// Installer properties bypass the runtime's whole-argument quoting.
#[cfg(windows)]
fn push_arg(command: &mut Command, arg: &str) {
    use std::os::windows::process::CommandExt;

    match super::msi_property_argument(arg) {
        Some(raw) => command.raw_arg(raw),
        None => command.arg(arg),
    };
}

#[cfg(not(windows))]
fn push_arg(command: &mut Command, arg: &str) {
    command.arg(arg);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, executable: &Path, args: &[String]) -> Result<i32, RunnerError> {
        tracing::debug!(executable = %executable.display(), ?args, "launching process");

        let status = command(executable, args)
            .status()
            .map_err(|e| RunnerError::from_spawn(executable, e))?;

        let code = exit_code(executable, status)?;
        tracing::debug!(executable = %executable.display(), code, "process exited");
        Ok(code)
    }

    fn capture(&self, executable: &Path, args: &[String]) -> Result<CapturedOutput, RunnerError> {
        tracing::debug!(executable = %executable.display(), ?args, "launching process (captured)");

        let output = command(executable, args)
            .output()
            .map_err(|e| RunnerError::from_spawn(executable, e))?;

        Ok(CapturedOutput {
            exit_code: exit_code(executable, output.status)?,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn exit_code(executable: &Path, status: ExitStatus) -> Result<i32, RunnerError> {
    status.code().ok_or_else(|| RunnerError::Terminated {
        executable: executable.to_path_buf(),
    })
}
