use thiserror::Error;

/// Failure to obtain one raw dataset resource.
#[derive(Debug, Error)]
pub enum DatasetSourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{status} {reason}")]
    Status { status: u16, reason: String },

    #[error("failed to parse dataset JSON: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("dataset is not a JSON array")]
    NotAnArray,
}

/// Failure of the geocoding backend for a single lookup.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding transport error: {0}")]
    Transport(String),

    #[error("geocoding service returned status {0}")]
    Status(String),

    #[error("failed to decode geocoding response: {0}")]
    Decode(String),
}

/// Failure to create a marker representation.
#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("rich marker representation unavailable")]
    RichUnavailable,

    #[error("marker backend error: {0}")]
    Backend(String),
}

/// Failure to bring up the map surface.
#[derive(Debug, Error)]
pub enum MapInitError {
    #[error("missing map API credential")]
    MissingCredential,

    #[error("map library failed to load: {0}")]
    Library(String),
}
