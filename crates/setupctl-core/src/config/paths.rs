//! Config path resolution helpers.

use std::path::{Path, PathBuf};

pub const CONFIG_DIR_NAME: &str = "setupctl";
pub const CONFIG_FILE_NAME: &str = "setupctl.toml";

/// `<config_dir>/setupctl/setupctl.toml`
pub fn default_config_path(config_root: &Path) -> PathBuf {
    config_root.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Resolve `path` against the directory holding the config file.
pub fn resolve_relative(config_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(path),
        _ => path.to_path_buf(),
    }
}
