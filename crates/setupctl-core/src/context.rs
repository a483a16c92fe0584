//! Application context: wires configuration into the runtime services.

use std::path::{Path, PathBuf};

use crate::config::{ConfigStore, SetupConfig};
use crate::inventory::{InventoryError, InventorySource, RegQueryInventory, SnapshotInventory};
use crate::logging::{ConsoleSink, ResultLogger, TerminalSink};
use crate::orchestration::InstallOrchestrator;
use crate::process::SystemRunner;

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextOverrides {
    pub log_file: Option<PathBuf>,
    pub installer: Option<PathBuf>,
    pub inventory_snapshot: Option<PathBuf>,
}

impl ContextOverrides {
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn with_installer(mut self, path: impl Into<PathBuf>) -> Self {
        self.installer = Some(path.into());
        self
    }

    pub fn with_inventory_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.inventory_snapshot = Some(path.into());
        self
    }
}

/// Resolved configuration shared by every frontend command.
#[derive(Debug, Clone)]
pub struct AppContext {
    config_path: PathBuf,
    config: SetupConfig,
}

impl AppContext {
    /// Load the config from `store` and apply `overrides`.
    pub fn load(store: &ConfigStore, overrides: ContextOverrides) -> anyhow::Result<Self> {
        let config = store.load()?;
        Ok(Self::from_config(store.config_path(), config, overrides))
    }

    pub fn from_config(
        config_path: impl Into<PathBuf>,
        mut config: SetupConfig,
        overrides: ContextOverrides,
    ) -> Self {
        if let Some(log_file) = overrides.log_file {
            config.log_path = Some(log_file);
        }
        if let Some(installer) = overrides.installer {
            config.installer.executable = installer;
        }
        if let Some(snapshot) = overrides.inventory_snapshot {
            config.inventory.snapshot = Some(snapshot);
        }
        Self {
            config_path: config_path.into(),
            config,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config(&self) -> &SetupConfig {
        &self.config
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.config.log_path.as_deref()
    }

    /// Orchestrator backed by the system process runner.
    pub fn orchestrator(&self) -> anyhow::Result<InstallOrchestrator> {
        self.orchestrator_with_console(Box::new(TerminalSink::new()))
    }

    /// Orchestrator whose console output goes to `console`.
    pub fn orchestrator_with_console(
        &self,
        console: Box<dyn ConsoleSink>,
    ) -> anyhow::Result<InstallOrchestrator> {
        let settings = self.config.orchestrator_settings()?;
        let logger = ResultLogger::with_sink(self.config.log_path.clone(), console);
        Ok(InstallOrchestrator::new(
            Box::new(SystemRunner::new()),
            logger,
            settings,
        ))
    }

    /// Snapshot file when configured, else the live registry via reg.exe.
    pub fn inventory_source(&self) -> Result<Box<dyn InventorySource>, InventoryError> {
        match &self.config.inventory.snapshot {
            Some(path) => {
                tracing::debug!(path = %path.display(), "reading inventory snapshot");
                Ok(Box::new(SnapshotInventory::load(path)?))
            }
            None => Ok(Box::new(RegQueryInventory::new(
                Box::new(SystemRunner::new()),
                self.config.inventory.reg_executable.clone(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_take_precedence() {
        let mut config = SetupConfig::new();
        config.log_path = Some(PathBuf::from("from-file.log"));

        let ctx = AppContext::from_config(
            "setupctl.toml",
            config,
            ContextOverrides::default()
                .with_log_file("cli.log")
                .with_installer("/opt/msiexec"),
        );

        assert_eq!(ctx.log_path(), Some(Path::new("cli.log")));
        assert_eq!(ctx.config().installer.executable, PathBuf::from("/opt/msiexec"));
        assert!(ctx.config().inventory.snapshot.is_none());
    }

    #[test]
    fn missing_snapshot_is_an_inventory_error() {
        let ctx = AppContext::from_config(
            "setupctl.toml",
            SetupConfig::new(),
            ContextOverrides::default().with_inventory_snapshot("/nonexistent/inventory.json"),
        );
        let err = ctx.inventory_source().unwrap_err();
        assert!(matches!(err, InventoryError::SnapshotRead { .. }));
    }

    #[test]
    fn orchestrator_uses_configured_installer() {
        let ctx = AppContext::from_config(
            "setupctl.toml",
            SetupConfig::new(),
            ContextOverrides::default().with_installer("/usr/bin/true"),
        );
        let orchestrator = ctx.orchestrator().unwrap();
        assert_eq!(
            orchestrator.settings().installer.executable,
            PathBuf::from("/usr/bin/true")
        );
        assert!(orchestrator.logger().default_destination().is_none());
    }
}
