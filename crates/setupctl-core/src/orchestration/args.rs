//! Installer command-line construction.

use std::path::PathBuf;

use crate::types::Operation;

/// How the installer executable is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerSettings {
    pub executable: PathBuf,
    pub quiet_flag: String,
    pub no_restart_flag: String,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("msiexec.exe"),
            quiet_flag: "/qn".to_string(),
            no_restart_flag: "/norestart".to_string(),
        }
    }
}

/// Canonical argument list: quiet, no-restart, mode and target, then the
/// caller's extra arguments in order. Each element is passed to the process
/// as-is; nothing is joined or re-split.
pub fn build_arguments(settings: &InstallerSettings, operation: &Operation) -> Vec<String> {
    let mut args = Vec::with_capacity(4 + operation.extra_args.len());
    if !settings.quiet_flag.is_empty() {
        args.push(settings.quiet_flag.clone());
    }
    if !settings.no_restart_flag.is_empty() {
        args.push(settings.no_restart_flag.clone());
    }
    args.push(operation.kind.mode_flag().to_string());
    args.push(operation.target.clone());
    args.extend(operation.extra_args.iter().cloned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_arguments_are_canonical() {
        let op = Operation::install("C:\\Packages\\My App.msi")
            .with_extra_args(["ALLUSERS=1", "/l*v", "C:\\Logs\\app.log"]);
        let args = build_arguments(&InstallerSettings::default(), &op);
        assert_eq!(
            args,
            vec![
                "/qn",
                "/norestart",
                "/i",
                "C:\\Packages\\My App.msi",
                "ALLUSERS=1",
                "/l*v",
                "C:\\Logs\\app.log",
            ]
        );
    }

    #[test]
    fn uninstall_and_patch_modes() {
        let settings = InstallerSettings::default();
        let args = build_arguments(
            &settings,
            &Operation::uninstall("{12345678-1234-1234-1234-123456789012}"),
        );
        assert_eq!(args[2], "/x");
        assert_eq!(args[3], "{12345678-1234-1234-1234-123456789012}");

        let args = build_arguments(&settings, &Operation::patch("hotfix.msp"));
        assert_eq!(args[2..], ["/update", "hotfix.msp"]);
    }

    #[test]
    fn empty_flags_are_omitted() {
        let settings = InstallerSettings {
            executable: PathBuf::from("setup.exe"),
            quiet_flag: String::new(),
            no_restart_flag: String::new(),
        };
        let args = build_arguments(&settings, &Operation::install("pkg.msi"));
        assert_eq!(args, vec!["/i", "pkg.msi"]);
    }
}
