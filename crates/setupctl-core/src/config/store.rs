//! Config store for loading setupctl.toml.

use std::path::{Path, PathBuf};

use super::{SetupConfig, parser, paths};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Store at the platform config directory.
    pub fn from_default() -> anyhow::Result<Self> {
        let config_root = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(Self::from_path(paths::default_config_path(&config_root)))
    }

    pub fn from_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the config; a missing file yields defaults.
    ///
    /// Relative `log_path` and `inventory.snapshot` values are resolved
    /// against the config file's directory.
    pub fn load(&self) -> anyhow::Result<SetupConfig> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(SetupConfig::new());
        }

        let mut config = parser::parse_setup_toml(&self.config_path)?;
        if let Some(log_path) = config.log_path.take() {
            config.log_path = Some(paths::resolve_relative(&self.config_path, &log_path));
        }
        if let Some(snapshot) = config.inventory.snapshot.take() {
            config.inventory.snapshot = Some(paths::resolve_relative(&self.config_path, &snapshot));
        }
        Ok(config)
    }
}
