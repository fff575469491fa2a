//! Google Geocoding web service adapter.
//! Google 地理编码 Web 服务适配器。

use async_trait::async_trait;
use pl_core::config::ApiKey;
use pl_core::geo::LatLng;
use pl_core::ports::{GeocodeError, GeocoderPort, RegionConstraint};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://maps.googleapis.com";

const GEOCODE_PATH: &str = "/maps/api/geocode/json";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

pub struct GoogleGeocoder {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl GoogleGeocoder {
    pub fn new(api_key: ApiKey) -> Self {
        Self::with_base_url(api_key, DEFAULT_GEOCODING_BASE_URL)
    }

    /// Point the adapter at another host serving the same API.
    pub fn with_base_url(api_key: ApiKey, base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key, base_url)
    }

    pub fn with_client(client: Client, api_key: ApiKey, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, GEOCODE_PATH)
    }
}

#[async_trait]
impl GeocoderPort for GoogleGeocoder {
    async fn lookup(
        &self,
        postcode: &str,
        constraint: &RegionConstraint,
    ) -> Result<Vec<LatLng>, GeocodeError> {
        let components = format!("country:{}", constraint.country);
        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("address", postcode),
                ("components", components.as_str()),
                ("region", constraint.region.as_str()),
                ("key", self.api_key.expose()),
            ])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Transport(format!(
                "HTTP {}",
                response.status().as_u16()
            )));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;

        match body.status.as_str() {
            "OK" => {
                debug!(postcode, results = body.results.len(), "Geocode lookup ok");
                Ok(body
                    .results
                    .into_iter()
                    .map(|r| LatLng::new(r.geometry.location.lat, r.geometry.location.lng))
                    .collect())
            }
            "ZERO_RESULTS" => Ok(Vec::new()),
            other => {
                if let Some(message) = &body.error_message {
                    debug!(postcode, status = other, message = %message, "Geocode lookup rejected");
                }
                Err(GeocodeError::Status(other.to_string()))
            }
        }
    }
}
