//! Project Locations
//!
//! Loads the projects and leads datasets, geocodes every postcode and keeps
//! the resulting markers on a map in sync with the data and the toggles.

pub mod bootstrap;

pub use bootstrap::{init_tracing_subscriber, resolve_config, run_app, RunReport};
