mod google;

pub use google::{GoogleGeocoder, DEFAULT_GEOCODING_BASE_URL};
