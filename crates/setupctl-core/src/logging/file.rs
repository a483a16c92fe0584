//! Append-only log file writes.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Append `line` plus a newline to `path`, creating the file (and its
/// parent directory) when absent. Existing content is never truncated.
pub fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    file.flush()
}
