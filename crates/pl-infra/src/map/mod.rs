//! In-process map adapter.
//!
//! Records what a browser map would display: markers, their attach state,
//! popups and the last fitted region.

mod headless;

pub use headless::{HeadlessMapLoader, HeadlessMapSurface, PlacedMarker};
