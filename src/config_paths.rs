//! Locations of lumen's user files
//!
//! Everything lives under one root, `dirs::config_dir()/lumen` unless
//! `LUMEN_CONFIG_DIR` points elsewhere:
//! - `config.yaml` engine settings
//! - `themes/` user theme files, looked up before the builtins
//! - `logs/` daily rotated log files

use std::path::PathBuf;

/// Overrides the platform config root
pub const CONFIG_DIR_ENV: &str = "LUMEN_CONFIG_DIR";

/// Base name of the daily rotated log file
pub const LOG_FILE_NAME: &str = "lumen.log";

/// Root of lumen's user files, `None` when the platform has no config dir
pub fn config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|base| base.join("lumen")),
    }
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

pub fn themes_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("themes"))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create the log directory if needed
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    std::fs::create_dir_all(&logs)
        .map_err(|e| format!("Failed to create {}: {}", logs.display(), e))?;
    Ok(logs)
}
