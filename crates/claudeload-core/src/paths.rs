//! Executable-relative locations
//!
//! The plugin directory and the intercept log both live next to the host binary.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Directory (next to the executable) scanned for plugins at startup
pub const PLUGIN_DIR_NAME: &str = "claudeload-plugins";

/// Log file written by the fetch interceptor
pub const INTERCEPT_LOG_NAME: &str = "claude-intercept.log";

/// Directory containing the running executable
pub fn exe_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to resolve current executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .with_context(|| format!("executable has no parent directory: {}", exe.display()))
}

pub fn plugin_dir(exe_dir: &Path) -> PathBuf {
    exe_dir.join(PLUGIN_DIR_NAME)
}

pub fn intercept_log_path(exe_dir: &Path) -> PathBuf {
    exe_dir.join(INTERCEPT_LOG_NAME)
}
