use async_trait::async_trait;
use pl_core::dataset::DatasetResource;
use pl_core::ports::{DatasetSourceError, DatasetSourcePort};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Fetch datasets over HTTP from `<base_url>/data/<resource>.json`.
///
/// Every request bypasses intermediate caches so a freshly published file is
/// picked up on the next load.
pub struct HttpDatasetSource {
    client: Client,
    base_url: String,
}

impl HttpDatasetSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn resource_url(&self, resource: DatasetResource) -> String {
        format!("{}/data/{}", self.base_url, resource.file_name())
    }
}

#[async_trait]
impl DatasetSourcePort for HttpDatasetSource {
    async fn fetch(&self, resource: DatasetResource) -> Result<Value, DatasetSourceError> {
        let url = self.resource_url(resource);
        debug!(%url, "Fetching dataset");

        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| DatasetSourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DatasetSourceError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| DatasetSourceError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| DatasetSourceError::Parse(e.to_string()))
    }
}
