//! Map rendering surface.
//! 地图渲染表面。
//!
//! Only the operations the marker lifecycle needs are exposed: marker
//! creation in two flavours, attach/detach, and fitting the view to a region.
//! Pan, zoom and tile rendering stay behind the adapter.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ApiKey;
use crate::geo::{LatLng, LatLngBounds};
use crate::marker::MarkerContent;
use crate::ports::errors::{MapInitError, MarkerError};

/// Handle to one marker on the map.
///
/// Implementations must tolerate repeated `attach`/`detach` calls.
pub trait MarkerHandle: Send + Sync {
    fn attach(&self);

    fn detach(&self);

    /// Replace the rendered content. Simple markers only take the label text.
    fn set_content(&self, content: &MarkerContent);

    fn is_attached(&self) -> bool;
}

/// Options for the fallback marker: a titled pin with a click popup.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleMarkerOptions {
    pub position: LatLng,
    pub title: String,
    pub popup_html: String,
}

pub trait MapSurfacePort: Send + Sync {
    /// Create an interactive marker that renders `content` and avoids
    /// overlapping other markers. Created attached.
    ///
    /// Returns [`MarkerError::RichUnavailable`] when the environment lacks
    /// the rich marker library.
    fn create_rich_marker(
        &self,
        position: LatLng,
        content: &MarkerContent,
    ) -> Result<Box<dyn MarkerHandle>, MarkerError>;

    /// Create a plain marker whose popup opens on click. Created attached.
    fn create_simple_marker(
        &self,
        options: &SimpleMarkerOptions,
    ) -> Result<Box<dyn MarkerHandle>, MarkerError>;

    fn fit_bounds(&self, bounds: &LatLngBounds, padding_px: u32);
}

/// Visual style of the base map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapStyle {
    /// Cloud-configured style identified by a map id.
    MapId(String),
    /// Greyscale style shipped with the application.
    BundledGreyscale,
}

/// How the map reacts to scroll and touch gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureHandling {
    /// Every gesture pans or zooms the map, no modifier key needed.
    Greedy,
}

/// Map construction options.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub api_key: ApiKey,
    pub center: LatLng,
    pub zoom: u8,
    pub style: MapStyle,
    pub disable_default_ui: bool,
    pub gesture_handling: GestureHandling,
}

impl MapOptions {
    /// Centred on Leeds at regional zoom, default UI hidden.
    pub fn new(api_key: ApiKey, style: MapStyle) -> Self {
        Self {
            api_key,
            center: LatLng::new(53.8008, -1.5491),
            zoom: 7,
            style,
            disable_default_ui: true,
            gesture_handling: GestureHandling::Greedy,
        }
    }
}

#[async_trait]
pub trait MapLoaderPort: Send + Sync {
    /// Load the map library and create a map instance.
    async fn load(&self, options: &MapOptions) -> Result<Arc<dyn MapSurfacePort>, MapInitError>;
}
