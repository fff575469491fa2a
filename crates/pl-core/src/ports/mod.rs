//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. This follows Hexagonal Architecture
//! principles, allowing the core business logic to remain independent of
//! the dataset host, the geocoding backend and the map rendering surface.
//!
//! ## Port Placement Guidelines
//!
//! Before adding a new port to `pl-core/ports`, ask yourself three questions:
//!
//! 1. **Does this port represent an external collaborator?**
//! 2. **Will it be depended upon by more than one use case?**
//! 3. **Is it implemented by the infrastructure layer?**
//!
//! If all three answers are **yes**, place it in `pl-core/ports`.
//! Otherwise, keep it next to the use case that needs it.

mod dataset_source;
pub mod errors;
mod geocoder;
pub mod map;


pub use dataset_source::DatasetSourcePort;
pub use errors::{DatasetSourceError, GeocodeError, MapInitError, MarkerError};
pub use geocoder::{GeocoderPort, RegionConstraint};
pub use map::{
    GestureHandling, MapLoaderPort, MapOptions, MapStyle, MapSurfacePort, MarkerHandle,
    SimpleMarkerOptions,
};
