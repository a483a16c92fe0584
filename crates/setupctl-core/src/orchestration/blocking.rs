//! Pre-operation termination of processes that hold installer files open.

use crate::logging::Channel;

use super::orchestrator::{InstallOrchestrator, OrchestratorError};

/// Terminator exit code when the image was not running.
const NOT_RUNNING: i32 = 128;

impl InstallOrchestrator {
    /// Force-stop every configured blocking process.
    ///
    /// Runs `<terminator> /F /IM <image>` for each image. Exit codes 0
    /// (terminated) and 128 (not running) are accepted; anything else stops
    /// the operation before the installer is launched.
    pub fn stop_blocking_processes(&self) -> Result<(), OrchestratorError> {
        let blocking = &self.settings().blocking;

        for image in &blocking.images {
            let args = vec!["/F".to_string(), "/IM".to_string(), image.clone()];
            match self.runner().run(&blocking.terminator, &args) {
                Ok(0) => {
                    self.record(Channel::Host, &format!("Stopped blocking process {}", image), None)
                }
                Ok(NOT_RUNNING) => self.record(
                    Channel::Verbose,
                    &format!("Blocking process {} is not running", image),
                    None,
                ),
                Ok(code) => {
                    let reason = format!("terminator exited with code {}", code);
                    self.record(
                        Channel::Error,
                        &format!("Could not stop {}: {}", image, reason),
                        None,
                    );
                    return Err(OrchestratorError::BlockingProcess {
                        image: image.clone(),
                        reason,
                    });
                }
                Err(err) => {
                    self.record(
                        Channel::Error,
                        &format!("Could not stop {}: {}", image, err),
                        None,
                    );
                    return Err(OrchestratorError::BlockingProcess {
                        image: image.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
