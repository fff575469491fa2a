//! # pl-core
//!
//! Core domain models and business logic for Project Locations.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod config;
pub mod dataset;
pub mod geo;
pub mod marker;
pub mod ports;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use dataset::{Datasets, Lead, LegacyProjectRecord, Project, ProjectStatus};
pub use geo::{LatLng, LatLngBounds};
pub use marker::{MarkerContent, MarkerEntry, MarkerKind, VisibilityFlags};
