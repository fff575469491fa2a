use std::sync::Arc;

use pl_core::geo::LatLng;
use pl_core::ports::{GeocoderPort, RegionConstraint};
use tracing::{debug, warn};

/// Result of resolving one postcode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeOutcome {
    Found(LatLng),
    NotFound,
}

/// Resolve a postcode to a coordinate with a single backend call.
/// 通过一次后端调用将邮编解析为坐标。
///
/// Backend errors and empty result sets both come back as
/// [`GeocodeOutcome::NotFound`]. There is no retry and no timeout.
#[derive(Clone)]
pub struct GeocodeResolver {
    geocoder: Arc<dyn GeocoderPort>,
    constraint: RegionConstraint,
}

impl GeocodeResolver {
    pub fn new(geocoder: Arc<dyn GeocoderPort>, constraint: RegionConstraint) -> Self {
        Self {
            geocoder,
            constraint,
        }
    }

    #[tracing::instrument(name = "usecase.geocode.resolve", skip(self))]
    pub async fn resolve(&self, postcode: &str) -> GeocodeOutcome {
        match self.geocoder.lookup(postcode, &self.constraint).await {
            Ok(points) => match points.first() {
                Some(point) => {
                    debug!(lat = point.lat, lng = point.lng, "Postcode resolved");
                    GeocodeOutcome::Found(*point)
                }
                None => {
                    debug!("Geocoder returned no results");
                    GeocodeOutcome::NotFound
                }
            },
            Err(err) => {
                warn!(error = %err, "Geocoding failed");
                GeocodeOutcome::NotFound
            }
        }
    }
}
