//! TOML parser with helpful error messages

use super::schema::SetupConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse setupctl.toml with detailed error messages
pub fn parse_setup_toml(path: &Path) -> Result<SetupConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_setup_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse setupctl.toml content from string
pub fn parse_setup_toml_str(content: &str) -> Result<SetupConfig> {
    let config: SetupConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    config.validate()?;

    Ok(config)
}

/// Attach the offending lines to a TOML error
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let error_msg = error.message().to_string();

    match error.span() {
        Some(span) => {
            let start = span.start.min(content.len());
            let line_num = content[..start].matches('\n').count() + 1;
            anyhow::anyhow!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                get_line_context(content, line_num),
                error_msg
            )
        }
        None => anyhow::anyhow!("TOML parsing error: {}", error_msg),
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classification;
    use std::path::PathBuf;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_setup_toml_str("").unwrap();
        assert_eq!(config, SetupConfig::default());
        assert_eq!(config.installer.executable, PathBuf::from("msiexec.exe"));
        assert_eq!(config.installer.quiet_flag, "/qn");
        assert!(config.log_path.is_none());
    }

    #[test]
    fn full_config() {
        let config = parse_setup_toml_str(
            r#"
log_path = "C:\\Windows\\Logs\\setupctl.log"

[installer]
executable = "C:\\Windows\\System32\\msiexec.exe"

[classification]
"1618" = "retryable"
"1638" = "success"

[processes]
blocking = ["javaw.exe", "jusched.exe"]

[inventory]
snapshot = "inventory.json"
"#,
        )
        .unwrap();

        assert_eq!(
            config.log_path,
            Some(PathBuf::from("C:\\Windows\\Logs\\setupctl.log"))
        );
        assert_eq!(config.installer.no_restart_flag, "/norestart");
        assert_eq!(config.processes.blocking.len(), 2);
        assert_eq!(config.processes.terminator, PathBuf::from("taskkill.exe"));

        let settings = config.orchestrator_settings().unwrap();
        assert_eq!(settings.table.get(1618), Some(Classification::Retryable));
        assert_eq!(settings.table.get(1638), Some(Classification::Success));
        assert_eq!(settings.table.get(3010), Some(Classification::SuccessRebootPending));
    }

    #[test]
    fn non_numeric_classification_key_rejected() {
        let err = parse_setup_toml_str("[classification]\nbusy = \"retryable\"\n").unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid exit code"));
    }

    #[test]
    fn unknown_classification_value_rejected() {
        let err = parse_setup_toml_str("[classification]\n\"1618\" = \"later\"\n").unwrap_err();
        assert!(err.to_string().contains("TOML parsing error"));
    }

    #[test]
    fn same_code_twice_with_different_labels_rejected() {
        let err =
            parse_setup_toml_str("[classification]\n\"1618\" = \"retryable\"\n\"01618\" = \"failure\"\n")
                .unwrap_err();
        assert!(err.to_string().contains("classified twice"));
    }

    #[test]
    fn syntax_error_points_at_line() {
        let err = parse_setup_toml_str("log_path = \"a\"\n[installer\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
    }

    #[test]
    fn error_at_start_of_line_names_that_line() {
        let err = parse_setup_toml_str("log_path = \"a\"\nlog_path = \"b\"\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 2"), "{}", message);
        assert!(message.contains(">>>    2 | log_path = \"b\""), "{}", message);
    }

    #[test]
    fn error_on_first_line() {
        let err = parse_setup_toml_str("log_path = \n").unwrap_err();
        assert!(err.to_string().contains("line 1"), "{}", err);
    }
}
