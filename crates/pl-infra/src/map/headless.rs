use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use pl_core::geo::{LatLng, LatLngBounds};
use pl_core::marker::MarkerContent;
use pl_core::ports::{
    MapInitError, MapLoaderPort, MapOptions, MapSurfacePort, MarkerError, MarkerHandle,
    SimpleMarkerOptions,
};
use tracing::{debug, info};

/// One marker as the map would show it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub position: LatLng,
    pub title: String,
    pub rich: bool,
    pub label: Option<String>,
    pub icon: Option<String>,
    pub popup_html: Option<String>,
    pub attached: bool,
}

#[derive(Default)]
struct SurfaceState {
    next_id: u64,
    /// Live markers by creation order. A record lives as long as its handle.
    markers: BTreeMap<u64, PlacedMarker>,
    fits: Vec<(LatLngBounds, u32)>,
}

type SharedState = Arc<Mutex<SurfaceState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, SurfaceState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Map surface that keeps markers in memory instead of drawing them.
pub struct HeadlessMapSurface {
    rich_available: bool,
    state: SharedState,
}

impl HeadlessMapSurface {
    /// `rich_available = false` behaves like a map without the advanced
    /// marker library: every rich marker request fails.
    pub fn new(rich_available: bool) -> Self {
        Self {
            rich_available,
            state: SharedState::default(),
        }
    }

    fn push(&self, marker: PlacedMarker) -> Box<dyn MarkerHandle> {
        let mut state = lock(&self.state);
        let id = state.next_id;
        state.next_id += 1;
        state.markers.insert(id, marker);
        Box::new(HeadlessMarker {
            id,
            state: self.state.clone(),
        })
    }

    /// Markers whose handle is still held, detached ones included.
    pub fn markers(&self) -> Vec<PlacedMarker> {
        lock(&self.state).markers.values().cloned().collect()
    }

    pub fn marker_count(&self) -> usize {
        lock(&self.state).markers.len()
    }

    pub fn attached_count(&self) -> usize {
        lock(&self.state)
            .markers
            .values()
            .filter(|m| m.attached)
            .count()
    }

    pub fn attached_titles(&self) -> Vec<String> {
        lock(&self.state)
            .markers
            .values()
            .filter(|m| m.attached)
            .map(|m| m.title.clone())
            .collect()
    }

    /// Popup markup of every live fallback marker, in creation order.
    pub fn popups(&self) -> Vec<String> {
        lock(&self.state)
            .markers
            .values()
            .filter_map(|m| m.popup_html.clone())
            .collect()
    }

    pub fn last_fit(&self) -> Option<(LatLngBounds, u32)> {
        lock(&self.state).fits.last().copied()
    }

    pub fn fit_count(&self) -> usize {
        lock(&self.state).fits.len()
    }
}

impl MapSurfacePort for HeadlessMapSurface {
    fn create_rich_marker(
        &self,
        position: LatLng,
        content: &MarkerContent,
    ) -> Result<Box<dyn MarkerHandle>, MarkerError> {
        if !self.rich_available {
            return Err(MarkerError::RichUnavailable);
        }
        Ok(self.push(PlacedMarker {
            position,
            title: content.icon.alt.clone(),
            rich: true,
            label: Some(content.label.text().to_string()),
            icon: Some(content.icon.src.clone()),
            popup_html: None,
            attached: true,
        }))
    }

    fn create_simple_marker(
        &self,
        options: &SimpleMarkerOptions,
    ) -> Result<Box<dyn MarkerHandle>, MarkerError> {
        Ok(self.push(PlacedMarker {
            position: options.position,
            title: options.title.clone(),
            rich: false,
            label: None,
            icon: None,
            popup_html: Some(options.popup_html.clone()),
            attached: true,
        }))
    }

    fn fit_bounds(&self, bounds: &LatLngBounds, padding_px: u32) {
        debug!(?bounds, padding_px, "Fitting map to bounds");
        lock(&self.state).fits.push((*bounds, padding_px));
    }
}

struct HeadlessMarker {
    id: u64,
    state: SharedState,
}

impl HeadlessMarker {
    fn update(&self, f: impl FnOnce(&mut PlacedMarker)) {
        if let Some(marker) = lock(&self.state).markers.get_mut(&self.id) {
            f(marker);
        }
    }
}

impl Drop for HeadlessMarker {
    fn drop(&mut self) {
        lock(&self.state).markers.remove(&self.id);
    }
}

impl MarkerHandle for HeadlessMarker {
    fn attach(&self) {
        self.update(|m| m.attached = true);
    }

    fn detach(&self) {
        self.update(|m| m.attached = false);
    }

    fn set_content(&self, content: &MarkerContent) {
        self.update(|m| {
            if m.rich {
                m.title = content.icon.alt.clone();
                m.label = Some(content.label.text().to_string());
                m.icon = Some(content.icon.src.clone());
            } else {
                m.title = content.label.text().to_string();
            }
        });
    }

    fn is_attached(&self) -> bool {
        lock(&self.state)
            .markers
            .get(&self.id)
            .is_some_and(|m| m.attached)
    }
}

/// Loader producing [`HeadlessMapSurface`] instances.
pub struct HeadlessMapLoader {
    rich_available: bool,
    failure: Option<String>,
    loaded: Mutex<Option<(MapOptions, Arc<HeadlessMapSurface>)>>,
}

impl HeadlessMapLoader {
    pub fn new(rich_available: bool) -> Self {
        Self {
            rich_available,
            failure: None,
            loaded: Mutex::new(None),
        }
    }

    /// A loader whose library never comes up.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            rich_available: false,
            failure: Some(message.into()),
            loaded: Mutex::new(None),
        }
    }

    /// The most recently created surface.
    pub fn surface(&self) -> Option<Arc<HeadlessMapSurface>> {
        self.loaded_slot()
            .as_ref()
            .map(|(_, surface)| surface.clone())
    }

    /// Options passed to the most recent successful load.
    pub fn last_options(&self) -> Option<MapOptions> {
        self.loaded_slot()
            .as_ref()
            .map(|(options, _)| options.clone())
    }

    fn loaded_slot(&self) -> MutexGuard<'_, Option<(MapOptions, Arc<HeadlessMapSurface>)>> {
        self.loaded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MapLoaderPort for HeadlessMapLoader {
    async fn load(&self, options: &MapOptions) -> Result<Arc<dyn MapSurfacePort>, MapInitError> {
        if let Some(message) = &self.failure {
            return Err(MapInitError::Library(message.clone()));
        }

        let surface = Arc::new(HeadlessMapSurface::new(self.rich_available));
        info!(
            lat = options.center.lat,
            lng = options.center.lng,
            zoom = options.zoom,
            style = ?options.style,
            gestures = ?options.gesture_handling,
            rich_markers = self.rich_available,
            "Headless map loaded"
        );
        *self.loaded_slot() = Some((options.clone(), surface.clone()));
        let surface: Arc<dyn MapSurfacePort> = surface;
        Ok(surface)
    }
}
