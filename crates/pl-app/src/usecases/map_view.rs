//! Map view controller.
//! 地图视图控制器。
//!
//! Holds the current dataset pair, the toggles and, once the map library has
//! loaded, the render session. A new render generation starts whenever the
//! datasets change while the map is ready, or when the map becomes ready
//! while datasets are already present.

use std::sync::{Arc, Mutex, MutexGuard};

use pl_core::config::{ApiKey, AppConfig};
use pl_core::dataset::Datasets;
use pl_core::marker::VisibilityFlags;
use pl_core::ports::{MapInitError, MapLoaderPort, MapOptions, MapStyle};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::render_session::{GenerationOutcome, RenderSession};
use super::resolve_postcode::GeocodeResolver;

/// Map-related configuration inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSettings {
    /// Empty means missing.
    pub api_key: String,
    /// Empty selects the bundled greyscale style.
    pub map_id: String,
}

impl MapSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.maps_api_key.clone(),
            map_id: config.maps_map_id.clone(),
        }
    }

    /// Build map options, or report the missing credential.
    pub fn map_options(&self) -> Result<MapOptions, MapInitError> {
        if self.api_key.trim().is_empty() {
            return Err(MapInitError::MissingCredential);
        }
        let style = if self.map_id.trim().is_empty() {
            warn!("No map id set, using bundled greyscale style");
            MapStyle::BundledGreyscale
        } else {
            info!(map_id = %self.map_id, "Using cloud map style");
            MapStyle::MapId(self.map_id.clone())
        };
        Ok(MapOptions::new(ApiKey::new(self.api_key.clone()), style))
    }
}

#[derive(Default)]
struct ViewState {
    datasets: Option<Datasets>,
    flags: VisibilityFlags,
    session: Option<RenderSession>,
    /// Runtime captured by `initialize`; generations run here even when
    /// datasets arrive from a thread outside it.
    runtime: Option<Handle>,
    pending: Option<JoinHandle<GenerationOutcome>>,
}

pub struct MapView {
    loader: Arc<dyn MapLoaderPort>,
    resolver: GeocodeResolver,
    state: Mutex<ViewState>,
}

impl MapView {
    pub fn new(loader: Arc<dyn MapLoaderPort>, resolver: GeocodeResolver) -> Self {
        Self {
            loader,
            resolver,
            state: Mutex::new(ViewState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ViewState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Load the map library and create the render session.
    ///
    /// A missing credential is reported once and leaves the view without a
    /// map; datasets and toggles are still accepted.
    ///
    /// Must be awaited on a Tokio runtime. Render generations run on that
    /// runtime from then on, whichever thread supplies the datasets.
    #[tracing::instrument(name = "usecase.map_view.initialize", skip_all)]
    pub async fn initialize(&self, settings: &MapSettings) -> Result<(), MapInitError> {
        let options = settings.map_options().inspect_err(|err| {
            error!(error = %err, "Missing Google Maps API key; map will not render");
        })?;

        let surface = self.loader.load(&options).await.inspect_err(|err| {
            error!(error = %err, "Failed to initialize map");
        })?;

        let session = RenderSession::new(surface, self.resolver.clone());
        let mut state = self.lock_state();
        if state.session.is_some() {
            warn!("Map view already initialized, replacing session");
            if let Some(previous) = state.session.take() {
                previous.dispose();
            }
        }
        session.set_visibility(state.flags);
        state.session = Some(session);
        state.runtime = Some(Handle::current());
        info!("Map initialized");
        Self::spawn_generation(&mut state);
        Ok(())
    }

    /// Replace the datasets. Starts a new generation when the map is ready.
    pub fn set_datasets(&self, datasets: Datasets) {
        let mut state = self.lock_state();
        state.datasets = Some(datasets);
        Self::spawn_generation(&mut state);
    }

    /// Update the toggles. Never re-geocodes.
    pub fn set_visibility(&self, flags: VisibilityFlags) {
        let mut state = self.lock_state();
        state.flags = flags;
        if let Some(session) = &state.session {
            session.set_visibility(flags);
        }
    }

    pub fn flags(&self) -> VisibilityFlags {
        self.lock_state().flags
    }

    pub fn session(&self) -> Option<RenderSession> {
        self.lock_state().session.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.lock_state().session.is_some()
    }

    /// Wait for the most recently started generation.
    pub async fn wait_idle(&self) -> Option<GenerationOutcome> {
        let pending = self.lock_state().pending.take()?;
        match pending.await {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                error!(error = %err, "Render generation task failed");
                None
            }
        }
    }

    /// Dispose the session and forget the map.
    pub fn teardown(&self) {
        let mut state = self.lock_state();
        if let Some(session) = state.session.take() {
            session.dispose();
        }
        state.pending = None;
    }

    fn spawn_generation(state: &mut ViewState) {
        let (Some(session), Some(datasets), Some(runtime)) = (
            state.session.as_ref(),
            state.datasets.as_ref(),
            state.runtime.as_ref(),
        ) else {
            return;
        };
        // Opened here rather than inside the task so that generations are
        // ordered by request, not by task scheduling.
        let generation = session.begin(datasets);
        let session = session.clone();
        let handle = runtime.spawn(async move { session.run(generation).await });
        state.pending = Some(handle);
    }
}
