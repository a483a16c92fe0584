//! Live catalog reads through `reg.exe query`.

use std::path::PathBuf;

use crate::process::ProcessRunner;

use super::{InventoryError, InventoryLocation, InventoryRecord, InventorySource};

/// Reads the uninstall catalogs by running `reg query <key> /s /v DisplayName`.
#[derive(Debug)]
pub struct RegQueryInventory {
    runner: Box<dyn ProcessRunner>,
    reg_executable: PathBuf,
}

impl RegQueryInventory {
    pub fn new(runner: Box<dyn ProcessRunner>, reg_executable: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            reg_executable: reg_executable.into(),
        }
    }

    fn query_args(location: InventoryLocation) -> Vec<String> {
        vec![
            "query".to_string(),
            location.key_path().to_string(),
            "/s".to_string(),
            "/v".to_string(),
            "DisplayName".to_string(),
        ]
    }
}

impl InventorySource for RegQueryInventory {
    fn read_location(
        &self,
        location: InventoryLocation,
    ) -> Result<Vec<InventoryRecord>, InventoryError> {
        let output = self
            .runner
            .capture(&self.reg_executable, &Self::query_args(location))
            .map_err(|e| InventoryError::Unreadable {
                location,
                reason: e.to_string(),
            })?;

        if output.exit_code != 0 {
            let detail = output.stderr.trim();
            let reason = if detail.is_empty() {
                format!("reg query exited with code {}", output.exit_code)
            } else {
                format!("reg query exited with code {}: {}", output.exit_code, detail)
            };
            return Err(InventoryError::Unreadable { location, reason });
        }

        Ok(parse_reg_query_output(&output.stdout))
    }
}

/// Parse `reg query /s /v DisplayName` output into records.
///
/// Key lines start at column zero with the hive name; value lines are
/// indented `<name>    <type>    <data>`. Keys without a `DisplayName`
/// string value produce no record.
pub fn parse_reg_query_output(output: &str) -> Vec<InventoryRecord> {
    let mut records = Vec::new();
    let mut current_key: Option<String> = None;

    for line in output.lines() {
        let line = line.trim_end();
        if line.starts_with("HKEY_") || line.starts_with("HKLM\\") {
            current_key = line.rsplit('\\').next().map(str::to_string);
            continue;
        }

        let Some(rest) = line.trim_start().strip_prefix("DisplayName") else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }
        let (Some(key_name), Some(display_name)) = (current_key.as_ref(), string_value(rest))
        else {
            continue;
        };

        records.push(InventoryRecord {
            key_name: key_name.clone(),
            display_name: Some(display_name),
        });
    }

    records
}

fn string_value(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    let data = rest
        .strip_prefix("REG_SZ")
        .or_else(|| rest.strip_prefix("REG_EXPAND_SZ"))?;
    let data = data.trim();
    (!data.is_empty()).then(|| data.to_string())
}
