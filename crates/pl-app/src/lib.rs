//! Project Locations Application Orchestration Layer
//!
//! This crate contains the use cases that turn raw datasets into markers on a
//! map: loading, geocoding, the marker lifecycle and visibility.

pub mod usecases;

pub use usecases::{
    GenerationOutcome, GeocodeOutcome, GeocodeResolver, LoadDatasets, MapSettings, MapView,
    MarkerSnapshot, PageSummary, RenderSession, RenderState, DATASETS_MISSING_BANNER,
};
