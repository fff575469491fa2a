use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR_NAME: &str = "ProjectLocations";

/// Application data root.
///
/// 应用数据根目录。
///
/// - macOS: ~/Library/Application Support/ProjectLocations
/// - Windows: %APPDATA%\ProjectLocations
/// - Linux: $XDG_DATA_HOME/ProjectLocations or ~/.local/share/ProjectLocations
///
/// The directory is not created here.
pub fn app_data_dir() -> Result<PathBuf> {
    let base = platform_data_dir().context("Failed to get platform-specific data directory")?;
    Ok(base.join(APP_DIR_NAME))
}

/// Log directory used when the configuration leaves it empty.
pub fn default_log_dir() -> Result<PathBuf> {
    Ok(app_data_dir()?.join("logs"))
}

fn platform_data_dir() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        if let Some(xdg_data_home) = std::env::var_os("XDG_DATA_HOME") {
            return Ok(PathBuf::from(xdg_data_home));
        }
    }
    dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Unable to determine data directory"))
}
