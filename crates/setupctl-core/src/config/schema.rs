//! Configuration schema for setupctl.toml

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

use crate::classify::{Classification, ClassificationTable};
use crate::orchestration::{BlockingProcesses, InstallerSettings, OrchestratorSettings};

/// Root configuration structure for setupctl.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SetupConfig {
    /// Default result log destination; console-only when absent
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    #[serde(default)]
    pub installer: InstallerSection,

    /// Exit-code overrides: `"1618" = "retryable"`
    #[serde(default)]
    pub classification: BTreeMap<String, Classification>,

    #[serde(default)]
    pub processes: ProcessesSection,

    #[serde(default)]
    pub inventory: InventorySection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstallerSection {
    #[serde(default = "default_installer")]
    pub executable: PathBuf,

    #[serde(default = "default_quiet_flag")]
    pub quiet_flag: String,

    #[serde(default = "default_no_restart_flag")]
    pub no_restart_flag: String,
}

impl Default for InstallerSection {
    fn default() -> Self {
        Self {
            executable: default_installer(),
            quiet_flag: default_quiet_flag(),
            no_restart_flag: default_no_restart_flag(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProcessesSection {
    #[serde(default = "default_terminator")]
    pub terminator: PathBuf,

    /// Image names stopped before install and patch runs
    #[serde(default)]
    pub blocking: Vec<String>,
}

impl Default for ProcessesSection {
    fn default() -> Self {
        Self {
            terminator: default_terminator(),
            blocking: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InventorySection {
    #[serde(default = "default_reg_executable")]
    pub reg_executable: PathBuf,

    /// JSON export read instead of the live registry
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

impl Default for InventorySection {
    fn default() -> Self {
        Self {
            reg_executable: default_reg_executable(),
            snapshot: None,
        }
    }
}

fn default_installer() -> PathBuf {
    InstallerSettings::default().executable
}

fn default_quiet_flag() -> String {
    InstallerSettings::default().quiet_flag
}

fn default_no_restart_flag() -> String {
    InstallerSettings::default().no_restart_flag
}

fn default_terminator() -> PathBuf {
    BlockingProcesses::default().terminator
}

fn default_reg_executable() -> PathBuf {
    PathBuf::from("reg.exe")
}

impl SetupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate values serde cannot check.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.classification_overrides()?;

        if self.installer.executable.as_os_str().is_empty() {
            anyhow::bail!("installer.executable must not be empty");
        }
        if let Some(image) = self.processes.blocking.iter().find(|i| i.trim().is_empty()) {
            anyhow::bail!("processes.blocking contains an empty image name: {:?}", image);
        }
        Ok(())
    }

    /// Parse the `[classification]` section into a table.
    pub fn classification_overrides(&self) -> anyhow::Result<ClassificationTable> {
        let mut table = ClassificationTable::empty();
        for (key, classification) in &self.classification {
            let code: i32 = key
                .trim()
                .parse()
                .with_context(|| format!("Invalid exit code in [classification]: '{}'", key))?;
            if let Some(previous) = table.insert(code, *classification) {
                if previous != *classification {
                    anyhow::bail!(
                        "Exit code {} is classified twice in [classification] ({} and {})",
                        code,
                        previous,
                        classification
                    );
                }
            }
        }
        Ok(table)
    }

    /// Build orchestrator settings: default table plus overrides.
    pub fn orchestrator_settings(&self) -> anyhow::Result<OrchestratorSettings> {
        let table = ClassificationTable::defaults().merged(&self.classification_overrides()?);
        Ok(OrchestratorSettings {
            installer: InstallerSettings {
                executable: self.installer.executable.clone(),
                quiet_flag: self.installer.quiet_flag.clone(),
                no_restart_flag: self.installer.no_restart_flag.clone(),
            },
            table,
            blocking: BlockingProcesses {
                terminator: self.processes.terminator.clone(),
                images: self.processes.blocking.clone(),
            },
        })
    }
}
