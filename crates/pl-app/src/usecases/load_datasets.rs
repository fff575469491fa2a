use std::sync::Arc;

use pl_core::dataset::{normalize_leads, normalize_projects, DatasetResource, Datasets};
use pl_core::ports::{DatasetSourceError, DatasetSourcePort};
use serde_json::Value;
use tracing::{error, info, warn};

/// Use case for loading both datasets
/// 加载两个数据集的用例
///
/// The two resources are fetched concurrently and degrade independently:
/// a failed resource becomes an empty list and never affects the other.
pub struct LoadDatasets {
    source: Arc<dyn DatasetSourcePort>,
}

impl LoadDatasets {
    pub fn new(source: Arc<dyn DatasetSourcePort>) -> Self {
        Self { source }
    }

    /// Fetch, validate and normalize both datasets. Never fails.
    #[tracing::instrument(name = "usecase.datasets.load.execute", skip(self))]
    pub async fn execute(&self) -> Datasets {
        let (projects_raw, leads_raw) = tokio::join!(
            self.fetch_records(DatasetResource::Projects),
            self.fetch_records(DatasetResource::Leads)
        );

        let projects = match projects_raw {
            Some(raw) => {
                let report = normalize_projects(&raw);
                info!(
                    accepted = report.accepted.len(),
                    dropped = report.dropped,
                    "Projects dataset normalized"
                );
                report.into_accepted()
            }
            None => {
                warn!("Projects dataset missing; map will still init");
                Vec::new()
            }
        };

        let leads = match leads_raw {
            Some(raw) => {
                let report = normalize_leads(&raw);
                info!(
                    accepted = report.accepted.len(),
                    dropped = report.dropped,
                    "Leads dataset normalized"
                );
                report.into_accepted()
            }
            None => {
                warn!("Leads dataset missing; map will still init");
                Vec::new()
            }
        };

        Datasets::new(projects, leads)
    }

    async fn fetch_records(&self, resource: DatasetResource) -> Option<Vec<Value>> {
        let result = self.source.fetch(resource).await.and_then(into_records);
        match result {
            Ok(records) => Some(records),
            Err(err) => {
                error!(resource = %resource, error = %err, "Failed to load dataset");
                None
            }
        }
    }
}

fn into_records(document: Value) -> Result<Vec<Value>, DatasetSourceError> {
    match document {
        Value::Array(records) => Ok(records),
        _ => Err(DatasetSourceError::NotAnArray),
    }
}
