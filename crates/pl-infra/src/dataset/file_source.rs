use std::path::PathBuf;

use async_trait::async_trait;
use pl_core::dataset::DatasetResource;
use pl_core::ports::{DatasetSourceError, DatasetSourcePort};
use serde_json::Value;
use tokio::fs;
use tracing::debug;

/// Read datasets from `<root>/projects.json` and `<root>/leads.json`.
pub struct FileDatasetSource {
    root: PathBuf,
}

impl FileDatasetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resource_path(&self, resource: DatasetResource) -> PathBuf {
        self.root.join(resource.file_name())
    }
}

#[async_trait]
impl DatasetSourcePort for FileDatasetSource {
    async fn fetch(&self, resource: DatasetResource) -> Result<Value, DatasetSourceError> {
        let path = self.resource_path(resource);
        debug!(path = %path.display(), "Reading dataset file");

        let bytes = fs::read(&path)
            .await
            .map_err(|e| DatasetSourceError::Io(format!("{}: {}", path.display(), e)))?;
        serde_json::from_slice(&bytes).map_err(|e| DatasetSourceError::Parse(e.to_string()))
    }
}
