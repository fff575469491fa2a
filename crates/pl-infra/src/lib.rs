pub mod dataset;
pub mod fs;
pub mod geocoding;
pub mod map;

pub use dataset::{FileDatasetSource, HttpDatasetSource};
pub use geocoding::GoogleGeocoder;
pub use map::{HeadlessMapLoader, HeadlessMapSurface};
