//! # Pure Data Module / 纯数据模块 - Data Transfer Objects Only
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Define configuration data structures / 定义配置数据结构
//! - ✅ Provide TOML → DTO mapping / 提供 TOML → DTO 的映射
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic or policies / 禁止任何业务逻辑或策略**
//! ❌ **No validation logic / 禁止验证逻辑**
//! ❌ **No default value calculation / 禁止默认值计算**
//!
//! ## Iron Rule / 铁律
//!
//! > **This module contains data only, no policy, no validation.**
//! > An empty API key is a fact here; deciding that the map cannot start
//! > without one belongs to the map view use case.

use std::fmt;
use std::path::PathBuf;

/// Map API credential. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(***)")
    }
}

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Map API credential (may be empty - this is a fact, not an error)
    /// 地图 API 凭据（可能为空 - 这就是事实，不是错误）
    pub maps_api_key: String,

    /// Cloud map style id; empty selects the bundled greyscale style
    pub maps_map_id: String,

    /// Base URL of the geocoding service
    pub geocoding_base_url: String,

    /// Country restriction for geocoding lookups
    pub geocoding_country: String,

    /// Region bias for geocoding lookups
    pub geocoding_region: String,

    /// Base URL serving `data/projects.json` and `data/leads.json`
    pub datasets_base_url: String,

    /// Local directory holding `projects.json` and `leads.json`
    pub datasets_dir: PathBuf,

    /// Log directory (path info only, no existence check)
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// **Prohibited / 禁止**: This method must NOT contain any validation
    /// or default value logic. Empty strings are valid "facts".
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let string_at = |section: &str, key: &str| -> String {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        Ok(Self {
            maps_api_key: string_at("maps", "api_key"),
            maps_map_id: string_at("maps", "map_id"),
            geocoding_base_url: string_at("geocoding", "base_url"),
            geocoding_country: string_at("geocoding", "country"),
            geocoding_region: string_at("geocoding", "region"),
            datasets_base_url: string_at("datasets", "base_url"),
            datasets_dir: PathBuf::from(string_at("datasets", "dir")),
            log_dir: PathBuf::from(string_at("logging", "dir")),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    /// 创建空的 AppConfig（所有字段为空/默认值）
    pub fn empty() -> Self {
        Self {
            maps_api_key: String::new(),
            maps_map_id: String::new(),
            geocoding_base_url: String::new(),
            geocoding_country: String::new(),
            geocoding_region: String::new(),
            datasets_base_url: String::new(),
            datasets_dir: PathBuf::new(),
            log_dir: PathBuf::new(),
        }
    }
}
