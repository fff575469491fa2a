use async_trait::async_trait;

use crate::geo::LatLng;
use crate::ports::errors::GeocodeError;

/// Country/region restriction applied to every lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionConstraint {
    /// ISO 3166-1 alpha-2 country the result must lie in.
    pub country: String,
    /// Region bias for ambiguous inputs.
    pub region: String,
}

impl Default for RegionConstraint {
    fn default() -> Self {
        Self {
            country: "GB".to_string(),
            region: "GB".to_string(),
        }
    }
}

#[async_trait]
pub trait GeocoderPort: Send + Sync {
    /// Single lookup against the backend, best match first.
    /// 对后端执行一次查询，最佳匹配排在首位。
    async fn lookup(
        &self,
        postcode: &str,
        constraint: &RegionConstraint,
    ) -> Result<Vec<LatLng>, GeocodeError>;
}
