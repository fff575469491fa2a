//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Read the optional TOML configuration file / 读取可选的 TOML 配置文件
//! - ✅ Overlay environment variables (`.env` included) / 叠加环境变量（包括 `.env`）
//! - ✅ Report I/O and parsing errors with context / 报告带上下文的 I/O 和解析错误
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//! ❌ **No default value logic / 禁止默认值逻辑**
//!
//! An empty API key is loaded as-is; the map view decides what it means.

use anyhow::Context;
use pl_core::config::AppConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file used when `PL_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

pub const ENV_CONFIG_PATH: &str = "PL_CONFIG";
pub const ENV_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
pub const ENV_MAPS_MAP_ID: &str = "GOOGLE_MAPS_MAP_ID";
pub const ENV_DATA_URL: &str = "PL_DATA_URL";
pub const ENV_DATA_DIR: &str = "PL_DATA_DIR";
pub const ENV_GEOCODER_URL: &str = "PL_GEOCODER_URL";
pub const ENV_LOG_DIR: &str = "PL_LOG_DIR";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// Missing sections and keys become empty values.
/// 缺失的部分和键变为空值。
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Resolve the effective configuration from file and process environment.
/// 从文件和进程环境解析最终配置。
///
/// `.env` is loaded first. An explicitly named config file must exist; the
/// default `config.toml` is optional.
pub fn resolve_config() -> anyhow::Result<AppConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "Loaded .env file");
    }

    let explicit = std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from);
    let mut config = load_optional(explicit.as_deref())?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn load_optional(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    match explicit {
        Some(path) => load_config(path.to_path_buf())
            .with_context(|| format!("{ENV_CONFIG_PATH} points at an unusable file")),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                load_config(path.to_path_buf())
            } else {
                Ok(AppConfig::empty())
            }
        }
    }
}

/// Overlay environment values onto `config`. Unset or empty variables leave
/// the file value in place.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

    if let Some(value) = get(ENV_MAPS_API_KEY) {
        config.maps_api_key = value;
    }
    if let Some(value) = get(ENV_MAPS_MAP_ID) {
        config.maps_map_id = value;
    }
    if let Some(value) = get(ENV_DATA_URL) {
        config.datasets_base_url = value;
    }
    if let Some(value) = get(ENV_DATA_DIR) {
        config.datasets_dir = PathBuf::from(value);
    }
    if let Some(value) = get(ENV_GEOCODER_URL) {
        config.geocoding_base_url = value;
    }
    if let Some(value) = get(ENV_LOG_DIR) {
        config.log_dir = PathBuf::from(value);
    }
}
