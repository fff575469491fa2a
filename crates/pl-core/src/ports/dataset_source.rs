use async_trait::async_trait;

use crate::dataset::DatasetResource;
use crate::ports::errors::DatasetSourceError;

#[async_trait]
pub trait DatasetSourcePort: Send + Sync {
    /// Fetch one raw resource, bypassing any cache.
    /// 获取一个原始资源（绕过缓存）。
    ///
    /// Returns the parsed JSON document as-is; shape checks belong to the caller.
    async fn fetch(&self, resource: DatasetResource)
        -> Result<serde_json::Value, DatasetSourceError>;
}
