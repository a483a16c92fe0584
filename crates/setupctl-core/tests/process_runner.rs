//! The system runner against real processes.

use std::path::Path;

use setupctl_core::process::{ProcessRunner, RunnerError, SystemRunner};

#[test]
fn missing_executable_is_not_found() {
    let runner = SystemRunner::new();
    let err = runner
        .run(Path::new("/nonexistent/setupctl-installer"), &[])
        .unwrap_err();

    assert!(matches!(err, RunnerError::NotFound { .. }));
    assert!(err.is_launch_failure());
}

#[cfg(unix)]
mod unix {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn real_exit_codes_are_returned() {
        let runner = SystemRunner::new();
        for code in [0, 1, 42] {
            let got = runner.run(Path::new("/bin/sh"), &sh(&format!("exit {}", code)));
            assert_eq!(got.unwrap(), code);
        }
    }

    #[test]
    fn arguments_are_not_shell_split() {
        let runner = SystemRunner::new();
        // $# counts positional arguments after $0.
        let args = vec![
            "-c".to_string(),
            "exit $#".to_string(),
            "sh".to_string(),
            "C:\\Program Files\\pkg.msi".to_string(),
            "PROP=a b".to_string(),
        ];
        assert_eq!(runner.run(Path::new("/bin/sh"), &args).unwrap(), 2);
    }

    #[test]
    fn capture_collects_streams() {
        let runner = SystemRunner::new();
        let output = runner
            .capture(Path::new("/bin/sh"), &sh("echo out; echo err >&2; exit 3"))
            .unwrap();

        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[test]
    fn killed_process_has_no_exit_code() {
        let runner = SystemRunner::new();
        let err = runner.run(Path::new("/bin/sh"), &sh("kill -9 $$")).unwrap_err();

        assert!(matches!(err, RunnerError::Terminated { .. }));
        assert!(!err.is_launch_failure());
    }
}
