//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Create infra adapters (dataset source, geocoder, map loader) / 创建 infra 层适配器
//! - ✅ Inject them into the use cases through port traits / 通过 Port trait 注入用例
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//! - Do not decide what a missing API key means; the map view does
//! - 不判断缺失 API 密钥意味着什么，由地图视图决定
//!
//! ## Architecture Principle / 架构原则
//!
//! > **This is the only place allowed to depend on pl-infra and pl-app simultaneously.**
//! > **这是唯一允许同时依赖 pl-infra 和 pl-app 的地方。**
//! > But this privilege is only for "assembly", not for "decision making".
//! > 但这种特权仅用于"组装"，不用于"决策"。

use std::sync::Arc;
use std::time::Duration;

use pl_app::{GeocodeResolver, LoadDatasets, MapSettings, MapView};
use pl_core::config::{ApiKey, AppConfig};
use pl_core::ports::{DatasetSourcePort, GeocoderPort, MapLoaderPort, RegionConstraint};
use pl_infra::geocoding::DEFAULT_GEOCODING_BASE_URL;
use pl_infra::{FileDatasetSource, GoogleGeocoder, HeadlessMapLoader, HttpDatasetSource};
use tracing::info;

/// Directory read when neither a dataset URL nor a directory is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClient(String),
}

/// Assembled use cases, ready to run.
pub struct AppDeps {
    pub load_datasets: LoadDatasets,
    pub map_view: MapView,
    pub map_settings: MapSettings,
    /// Kept so callers can inspect what the map surface received.
    pub map_loader: Arc<HeadlessMapLoader>,
}

/// Build every adapter and use case from `config`.
pub fn wire_dependencies(config: &AppConfig) -> WiringResult<AppDeps> {
    let client = reqwest::Client::builder()
        .connect_timeout(HTTP_CONNECT_TIMEOUT)
        .user_agent(concat!("project-locations/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| WiringError::HttpClient(e.to_string()))?;

    let dataset_source = dataset_source(config, client.clone());
    let geocoder: Arc<dyn GeocoderPort> = Arc::new(GoogleGeocoder::with_client(
        client,
        ApiKey::new(config.maps_api_key.clone()),
        non_empty_or(&config.geocoding_base_url, DEFAULT_GEOCODING_BASE_URL),
    ));
    let resolver = GeocodeResolver::new(geocoder, region_constraint(config));

    let map_loader = Arc::new(HeadlessMapLoader::new(true));
    let loader_port: Arc<dyn MapLoaderPort> = map_loader.clone();

    Ok(AppDeps {
        load_datasets: LoadDatasets::new(dataset_source),
        map_view: MapView::new(loader_port, resolver),
        map_settings: MapSettings::from_config(config),
        map_loader,
    })
}

fn dataset_source(config: &AppConfig, client: reqwest::Client) -> Arc<dyn DatasetSourcePort> {
    if !config.datasets_dir.as_os_str().is_empty() {
        info!(dir = %config.datasets_dir.display(), "Reading datasets from directory");
        Arc::new(FileDatasetSource::new(config.datasets_dir.clone()))
    } else if !config.datasets_base_url.is_empty() {
        info!(base_url = %config.datasets_base_url, "Fetching datasets over HTTP");
        Arc::new(HttpDatasetSource::with_client(
            client,
            config.datasets_base_url.clone(),
        ))
    } else {
        info!(dir = DEFAULT_DATA_DIR, "Reading datasets from default directory");
        Arc::new(FileDatasetSource::new(DEFAULT_DATA_DIR))
    }
}

fn region_constraint(config: &AppConfig) -> RegionConstraint {
    let default = RegionConstraint::default();
    RegionConstraint {
        country: non_empty_or(&config.geocoding_country, &default.country),
        region: non_empty_or(&config.geocoding_region, &default.region),
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
