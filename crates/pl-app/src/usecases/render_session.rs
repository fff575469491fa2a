//! Marker lifecycle for one map.
//! 单个地图的标记生命周期。
//!
//! A render session owns the map handle and every marker placed on it. Each
//! call to [`RenderSession::start`] opens a new render generation:
//!
//! ```text
//! Idle → Loading(0..N) → Ready → (new datasets) Disposed → Idle → ...
//! ```
//!
//! Generations are identified by a [`GenerationToken`]. Opening a generation
//! supersedes the previous one and disposes everything it placed, including
//! markers of a generation that is still geocoding. The superseded loop
//! notices after its pending lookup returns and stops without touching the
//! map again.

use std::sync::{Arc, Mutex, MutexGuard};

use pl_core::dataset::Datasets;
use pl_core::geo::{LatLng, LatLngBounds};
use pl_core::marker::{
    apply_visibility, escape_html, render_items, MarkerEntry, MarkerKind, MarkerRepresentation,
    RenderItem, VisibilityFlags,
};
use pl_core::ports::{MapSurfacePort, SimpleMarkerOptions};
use tracing::{debug, info, warn};

use super::resolve_postcode::{GeocodeOutcome, GeocodeResolver};

/// Margin kept around the markers when fitting the view.
pub const FIT_BOUNDS_PADDING_PX: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Loading { index: usize, total: usize },
    Ready,
    Disposed,
}

/// How a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Ready { markers: usize, skipped: usize },
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GenerationToken(u64);

/// A generation that has been opened but not yet driven.
#[derive(Debug)]
pub struct Generation {
    token: GenerationToken,
    items: Vec<RenderItem>,
}

impl Generation {
    pub fn token(&self) -> GenerationToken {
        self.token
    }
}

/// Read-only view of a tracked marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSnapshot {
    pub kind: MarkerKind,
    pub rich: bool,
    pub attached: bool,
    pub label: Option<String>,
    pub label_displayed: bool,
}

struct TrackedEntry {
    generation: GenerationToken,
    entry: MarkerEntry,
}

struct SessionState {
    current: GenerationToken,
    state: RenderState,
    flags: VisibilityFlags,
    entries: Vec<TrackedEntry>,
}

impl SessionState {
    fn is_live(&self, token: GenerationToken) -> bool {
        self.current == token
    }

    fn transition(&mut self, next: RenderState) {
        if self.state != next {
            debug!(
                from = ?self.state,
                to = ?next,
                generation = self.current.0,
                "Render state transition"
            );
            self.state = next;
        }
    }

    /// Dispose every tracked entry, whatever generation created it.
    fn dispose_all(&mut self) -> usize {
        let count = self.entries.len();
        for tracked in self.entries.drain(..) {
            tracked.entry.dispose();
        }
        count
    }

    fn dispose_generation(&mut self, token: GenerationToken) -> usize {
        let before = self.entries.len();
        self.entries.retain(|tracked| {
            if tracked.generation == token {
                tracked.entry.dispose();
                false
            } else {
                true
            }
        });
        before - self.entries.len()
    }
}

enum Step {
    Placed,
    Skipped,
    Superseded,
}

struct SessionInner {
    map: Arc<dyn MapSurfacePort>,
    resolver: GeocodeResolver,
    state: Mutex<SessionState>,
}

/// Owner of the map handle and of every marker placed on it.
/// 地图句柄及其上所有标记的所有者。
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct RenderSession {
    inner: Arc<SessionInner>,
}

impl RenderSession {
    pub fn new(map: Arc<dyn MapSurfacePort>, resolver: GeocodeResolver) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                map,
                resolver,
                state: Mutex::new(SessionState {
                    current: GenerationToken(0),
                    state: RenderState::Idle,
                    flags: VisibilityFlags::default(),
                    entries: Vec::new(),
                }),
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run one render generation for `datasets`.
    ///
    /// Items are geocoded strictly one after another, projects first. Lookup
    /// failures and marker creation failures skip the item; nothing here
    /// returns an error.
    pub async fn start(&self, datasets: &Datasets) -> GenerationOutcome {
        let generation = self.begin(datasets);
        self.run(generation).await
    }

    /// Open a generation without geocoding yet. Any running generation is
    /// superseded and every tracked marker is disposed before this returns.
    pub fn begin(&self, datasets: &Datasets) -> Generation {
        let items = render_items(datasets);
        let token = self.begin_generation(items.len());
        Generation { token, items }
    }

    /// Drive an opened generation to `Ready`, or stop once it is superseded.
    #[tracing::instrument(
        name = "usecase.render.run",
        skip_all,
        fields(generation = generation.token.0, items = generation.items.len())
    )]
    pub async fn run(&self, generation: Generation) -> GenerationOutcome {
        let Generation { token, items } = generation;
        let total = items.len();

        let mut bounds = LatLngBounds::new();
        let mut placed = 0usize;
        let mut skipped = 0usize;

        for (index, item) in items.iter().enumerate() {
            if !self.enter_loading(token, index, total) {
                return self.abort(token);
            }

            let outcome = self.inner.resolver.resolve(&item.postcode).await;

            match self.record(token, item, outcome, &mut bounds) {
                Step::Placed => placed += 1,
                Step::Skipped => skipped += 1,
                Step::Superseded => return self.abort(token),
            }
        }

        self.finish(token, &bounds, placed, skipped)
    }

    fn begin_generation(&self, total: usize) -> GenerationToken {
        let mut state = self.lock_state();
        let token = GenerationToken(state.current.0 + 1);
        state.current = token;

        let disposed = state.dispose_all();
        if disposed > 0 || state.state == RenderState::Ready {
            state.transition(RenderState::Disposed);
        }
        state.transition(RenderState::Idle);
        debug!(
            generation = token.0,
            disposed,
            items = total,
            "Render generation started"
        );
        token
    }

    fn enter_loading(&self, token: GenerationToken, index: usize, total: usize) -> bool {
        let mut state = self.lock_state();
        if !state.is_live(token) {
            return false;
        }
        state.transition(RenderState::Loading { index, total });
        true
    }

    /// Apply one lookup result. Liveness is checked under the same lock as the
    /// mutation, so a superseded generation never places a marker.
    fn record(
        &self,
        token: GenerationToken,
        item: &RenderItem,
        outcome: GeocodeOutcome,
        bounds: &mut LatLngBounds,
    ) -> Step {
        let mut state = self.lock_state();
        if !state.is_live(token) {
            return Step::Superseded;
        }

        let position = match outcome {
            GeocodeOutcome::Found(position) => position,
            GeocodeOutcome::NotFound => {
                warn!(
                    postcode = %item.postcode,
                    name = %item.name,
                    "No geocode result, item skipped"
                );
                return Step::Skipped;
            }
        };

        bounds.extend(position);
        match self.create_entry(item, position) {
            Some(entry) => {
                state.entries.push(TrackedEntry {
                    generation: token,
                    entry,
                });
                Step::Placed
            }
            None => Step::Skipped,
        }
    }

    /// Try the rich representation first, then the titled marker with popup.
    fn create_entry(&self, item: &RenderItem, position: LatLng) -> Option<MarkerEntry> {
        let content = item.content();
        let marker = match self.inner.map.create_rich_marker(position, &content) {
            Ok(handle) => MarkerRepresentation::Rich(handle),
            Err(err) => {
                warn!(name = %item.name, error = %err, "Using fallback marker");
                let options = SimpleMarkerOptions {
                    position,
                    title: item.name.clone(),
                    popup_html: format!("<strong>{}</strong>", escape_html(&item.name)),
                };
                match self.inner.map.create_simple_marker(&options) {
                    Ok(handle) => MarkerRepresentation::Fallback(handle),
                    Err(err) => {
                        warn!(
                            name = %item.name,
                            error = %err,
                            "Failed to create fallback marker, item skipped"
                        );
                        return None;
                    }
                }
            }
        };
        Some(MarkerEntry::new(item.kind, marker, Some(content.label)))
    }

    fn finish(
        &self,
        token: GenerationToken,
        bounds: &LatLngBounds,
        placed: usize,
        skipped: usize,
    ) -> GenerationOutcome {
        {
            let mut state = self.lock_state();
            if state.is_live(token) {
                if !bounds.is_empty() {
                    self.inner.map.fit_bounds(bounds, FIT_BOUNDS_PADDING_PX);
                }
                let flags = state.flags;
                apply_visibility(state.entries.iter().map(|tracked| &tracked.entry), flags);
                state.transition(RenderState::Ready);
                info!(generation = token.0, placed, skipped, "Render generation ready");
                return GenerationOutcome::Ready {
                    markers: placed,
                    skipped,
                };
            }
        }
        self.abort(token)
    }

    fn abort(&self, token: GenerationToken) -> GenerationOutcome {
        let mut state = self.lock_state();
        let disposed = state.dispose_generation(token);
        debug!(generation = token.0, disposed, "Render generation superseded");
        GenerationOutcome::Superseded
    }

    /// Store the toggles and project them onto the current markers.
    /// Later generations pick the stored toggles up when they become ready.
    pub fn set_visibility(&self, flags: VisibilityFlags) {
        let mut state = self.lock_state();
        state.flags = flags;
        apply_visibility(state.entries.iter().map(|tracked| &tracked.entry), flags);
    }

    /// Tear the session down: cancel the running generation and remove every marker.
    pub fn dispose(&self) {
        let mut state = self.lock_state();
        state.current = GenerationToken(state.current.0 + 1);
        let disposed = state.dispose_all();
        state.transition(RenderState::Disposed);
        debug!(disposed, "Render session disposed");
    }

    pub fn state(&self) -> RenderState {
        self.lock_state().state
    }

    pub fn flags(&self) -> VisibilityFlags {
        self.lock_state().flags
    }

    pub fn marker_count(&self) -> usize {
        self.lock_state().entries.len()
    }

    pub fn markers(&self) -> Vec<MarkerSnapshot> {
        self.lock_state()
            .entries
            .iter()
            .map(|tracked| {
                let entry = &tracked.entry;
                MarkerSnapshot {
                    kind: entry.kind,
                    rich: entry.marker.is_rich(),
                    attached: entry.marker.is_attached(),
                    label: entry.label.as_ref().map(|label| label.text().to_string()),
                    label_displayed: entry
                        .label
                        .as_ref()
                        .is_some_and(|label| label.is_displayed()),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use pl_core::dataset::{Lead, Project, ProjectStatus};
    use pl_core::marker::MarkerContent;
    use pl_core::ports::{GeocodeError, GeocoderPort, MarkerError, MarkerHandle, RegionConstraint};
    use pl_infra::map::HeadlessMapSurface;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    mock! {
        Handle {}

        impl MarkerHandle for Handle {
            fn attach(&self);
            fn detach(&self);
            fn set_content(&self, content: &MarkerContent);
            fn is_attached(&self) -> bool;
        }
    }

    mock! {
        Surface {}

        impl MapSurfacePort for Surface {
            fn create_rich_marker(
                &self,
                position: LatLng,
                content: &MarkerContent,
            ) -> Result<Box<dyn MarkerHandle>, MarkerError>;
            fn create_simple_marker(
                &self,
                options: &SimpleMarkerOptions,
            ) -> Result<Box<dyn MarkerHandle>, MarkerError>;
            fn fit_bounds(&self, bounds: &LatLngBounds, padding_px: u32);
        }
    }

    /// A surface without rich markers whose fallback pin fails for `broken`.
    fn surface_failing_fallback_for(broken: &'static str) -> MockSurface {
        let mut surface = MockSurface::new();
        surface
            .expect_create_rich_marker()
            .returning(|_, _| Err(MarkerError::RichUnavailable));
        surface
            .expect_create_simple_marker()
            .withf(move |options: &SimpleMarkerOptions| options.title == broken)
            .times(1)
            .returning(|_| Err(MarkerError::Backend("pin sprite missing".to_string())));
        surface
            .expect_create_simple_marker()
            .withf(move |options: &SimpleMarkerOptions| options.title != broken)
            .returning(|_| {
                let mut handle = MockHandle::new();
                handle.expect_attach().return_const(());
                handle.expect_detach().return_const(());
                handle.expect_is_attached().return_const(true);
                let handle: Box<dyn MarkerHandle> = Box::new(handle);
                Ok(handle)
            });
        surface
    }

    struct TableGeocoder {
        table: HashMap<String, LatLng>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl TableGeocoder {
        fn new(entries: &[(&str, LatLng)]) -> Self {
            Self {
                table: entries
                    .iter()
                    .map(|(postcode, point)| (postcode.to_string(), *point))
                    .collect(),
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GeocoderPort for TableGeocoder {
        async fn lookup(
            &self,
            postcode: &str,
            _constraint: &RegionConstraint,
        ) -> Result<Vec<LatLng>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(self.table.get(postcode).copied().into_iter().collect())
        }
    }

    fn project(name: &str, postcode: &str, status: ProjectStatus) -> Project {
        Project {
            name: name.to_string(),
            postcode: postcode.to_string(),
            status,
        }
    }

    fn lead(name: &str, postcode: &str) -> Lead {
        Lead {
            name: name.to_string(),
            postcode: postcode.to_string(),
            role: None,
            project: None,
        }
    }

    fn session_with(
        surface: Arc<HeadlessMapSurface>,
        geocoder: Arc<TableGeocoder>,
    ) -> RenderSession {
        RenderSession::new(
            surface,
            GeocodeResolver::new(geocoder, RegionConstraint::default()),
        )
    }

    const LEEDS: LatLng = LatLng::new(53.7960, -1.5479);
    const YORK: LatLng = LatLng::new(53.9590, -1.0815);

    #[tokio::test]
    async fn test_start_places_markers_and_fits_bounds() {
        let surface = Arc::new(HeadlessMapSurface::new(true));
        let geocoder = Arc::new(TableGeocoder::new(&[("LS1 4DY", LEEDS), ("YO1 7HH", YORK)]));
        let session = session_with(surface.clone(), geocoder.clone());

        let datasets = Datasets::new(
            vec![project("Site A", "LS1 4DY", ProjectStatus::Construction)],
            vec![lead("Jo", "YO1 7HH")],
        );
        let outcome = session.start(&datasets).await;

        assert_eq!(outcome, GenerationOutcome::Ready { markers: 2, skipped: 0 });
        assert_eq!(session.state(), RenderState::Ready);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);

        let markers = session.markers();
        assert_eq!(markers[0].kind, MarkerKind::Project);
        assert_eq!(markers[0].label.as_deref(), Some("Site A • construction"));
        assert_eq!(markers[1].kind, MarkerKind::Lead);
        assert!(markers.iter().all(|m| m.rich && m.attached && m.label_displayed));

        let (bounds, padding) = surface.last_fit().expect("bounds fitted");
        assert_eq!(padding, FIT_BOUNDS_PADDING_PX);
        assert!(bounds.contains(LEEDS));
        assert!(bounds.contains(YORK));
    }

    #[tokio::test]
    async fn test_not_found_item_is_skipped_and_loop_continues() {
        let surface = Arc::new(HeadlessMapSurface::new(true));
        let geocoder = Arc::new(TableGeocoder::new(&[("YO1 7HH", YORK)]));
        let session = session_with(surface.clone(), geocoder.clone());

        let datasets = Datasets::new(
            vec![project("Nowhere", "ZZ99 9ZZ", ProjectStatus::Precon)],
            vec![lead("Jo", "YO1 7HH")],
        );
        let outcome = session.start(&datasets).await;

        assert_eq!(outcome, GenerationOutcome::Ready { markers: 1, skipped: 1 });
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
        assert_eq!(session.markers()[0].kind, MarkerKind::Lead);
    }

    #[tokio::test]
    async fn test_no_results_at_all_skips_fit_bounds() {
        let surface = Arc::new(HeadlessMapSurface::new(true));
        let geocoder = Arc::new(TableGeocoder::new(&[]));
        let session = session_with(surface.clone(), geocoder);

        let datasets = Datasets::new(vec![], vec![lead("Jo", "YO1 7HH")]);
        let outcome = session.start(&datasets).await;

        assert_eq!(outcome, GenerationOutcome::Ready { markers: 0, skipped: 1 });
        assert!(surface.last_fit().is_none());
    }

    #[tokio::test]
    async fn test_rich_unavailable_falls_back_to_simple_marker() {
        let surface = Arc::new(HeadlessMapSurface::new(false));
        let geocoder = Arc::new(TableGeocoder::new(&[("LS1 4DY", LEEDS)]));
        let session = session_with(surface.clone(), geocoder);

        let datasets = Datasets::new(
            vec![project("Smith & Sons", "LS1 4DY", ProjectStatus::Permanent)],
            vec![],
        );
        session.start(&datasets).await;

        let markers = session.markers();
        assert_eq!(markers.len(), 1);
        assert!(!markers[0].rich);
        assert!(markers[0].attached);
        assert_eq!(
            surface.popups(),
            vec!["<strong>Smith &amp; Sons</strong>".to_string()]
        );
    }

    #[tokio::test]
    async fn test_geocoding_is_sequential() {
        let surface = Arc::new(HeadlessMapSurface::new(true));
        let geocoder = Arc::new(TableGeocoder::new(&[("LS1 4DY", LEEDS)]));
        let session = session_with(surface, geocoder.clone());

        let projects = (0..5)
            .map(|i| project(&format!("Site {i}"), "LS1 4DY", ProjectStatus::Precon))
            .collect();
        session.start(&Datasets::new(projects, vec![])).await;

        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 5);
        assert_eq!(geocoder.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_visibility_applies_to_kind_only() {
        let surface = Arc::new(HeadlessMapSurface::new(true));
        let geocoder = Arc::new(TableGeocoder::new(&[("LS1 4DY", LEEDS), ("YO1 7HH", YORK)]));
        let session = session_with(surface.clone(), geocoder.clone());

        let datasets = Datasets::new(
            vec![project("Site A", "LS1 4DY", ProjectStatus::Construction)],
            vec![lead("Jo", "YO1 7HH")],
        );
        session.start(&datasets).await;

        session.set_visibility(VisibilityFlags::new(false, true));
        session.set_visibility(VisibilityFlags::new(false, true));

        let markers = session.markers();
        assert!(!markers[0].attached);
        assert!(!markers[0].label_displayed);
        assert!(markers[1].attached);
        assert!(markers[1].label_displayed);
        assert_eq!(surface.attached_count(), 1);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stored_flags_apply_when_generation_becomes_ready() {
        let surface = Arc::new(HeadlessMapSurface::new(true));
        let geocoder = Arc::new(TableGeocoder::new(&[("LS1 4DY", LEEDS), ("YO1 7HH", YORK)]));
        let session = session_with(surface.clone(), geocoder);

        session.set_visibility(VisibilityFlags::new(true, false));
        session
            .start(&Datasets::new(
                vec![project("Site A", "LS1 4DY", ProjectStatus::Precon)],
                vec![lead("Jo", "YO1 7HH")],
            ))
            .await;

        let markers = session.markers();
        assert!(markers[0].attached);
        assert!(!markers[1].attached);
    }

    #[tokio::test]
    async fn test_new_generation_disposes_previous_markers() {
        let surface = Arc::new(HeadlessMapSurface::new(true));
        let geocoder = Arc::new(TableGeocoder::new(&[("LS1 4DY", LEEDS), ("YO1 7HH", YORK)]));
        let session = session_with(surface.clone(), geocoder);

        session
            .start(&Datasets::new(
                vec![project("Site A", "LS1 4DY", ProjectStatus::Precon)],
                vec![],
            ))
            .await;
        session
            .start(&Datasets::new(vec![], vec![lead("Jo", "YO1 7HH")]))
            .await;

        assert_eq!(session.marker_count(), 1);
        assert_eq!(surface.marker_count(), 1);
        assert_eq!(surface.attached_count(), 1);
        assert_eq!(surface.attached_titles(), vec!["Jo".to_string()]);
    }

    #[tokio::test]
    async fn test_dispose_removes_everything() {
        let surface = Arc::new(HeadlessMapSurface::new(true));
        let geocoder = Arc::new(TableGeocoder::new(&[("LS1 4DY", LEEDS)]));
        let session = session_with(surface.clone(), geocoder);

        session
            .start(&Datasets::new(
                vec![project("Site A", "LS1 4DY", ProjectStatus::Precon)],
                vec![],
            ))
            .await;
        session.dispose();

        assert_eq!(session.state(), RenderState::Disposed);
        assert_eq!(session.marker_count(), 0);
        assert_eq!(surface.attached_count(), 0);
    }

    #[tokio::test]
    async fn test_item_is_skipped_when_both_marker_kinds_fail() {
        let mut surface = surface_failing_fallback_for("Site A");
        surface
            .expect_fit_bounds()
            .withf(|bounds: &LatLngBounds, padding: &u32| {
                bounds.contains(LEEDS) && *padding == FIT_BOUNDS_PADDING_PX
            })
            .times(1)
            .return_const(());
        let geocoder = Arc::new(TableGeocoder::new(&[("LS1 4DY", LEEDS)]));
        let session = RenderSession::new(
            Arc::new(surface),
            GeocodeResolver::new(geocoder, RegionConstraint::default()),
        );

        let outcome = session
            .start(&Datasets::new(
                vec![project("Site A", "LS1 4DY", ProjectStatus::Precon)],
                vec![],
            ))
            .await;

        assert_eq!(outcome, GenerationOutcome::Ready { markers: 0, skipped: 1 });
        assert_eq!(session.state(), RenderState::Ready);
        assert_eq!(session.marker_count(), 0);
    }

    #[tokio::test]
    async fn test_marker_failure_does_not_stop_later_items() {
        let mut surface = surface_failing_fallback_for("Site A");
        surface.expect_fit_bounds().times(1).return_const(());
        let geocoder = Arc::new(TableGeocoder::new(&[("LS1 4DY", LEEDS), ("YO1 7HH", YORK)]));
        let session = RenderSession::new(
            Arc::new(surface),
            GeocodeResolver::new(geocoder.clone(), RegionConstraint::default()),
        );

        let outcome = session
            .start(&Datasets::new(
                vec![project("Site A", "LS1 4DY", ProjectStatus::Precon)],
                vec![lead("Jo", "YO1 7HH")],
            ))
            .await;

        assert_eq!(outcome, GenerationOutcome::Ready { markers: 1, skipped: 1 });
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
        let markers = session.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kind, MarkerKind::Lead);
        assert!(!markers[0].rich);
        assert_eq!(markers[0].label.as_deref(), Some("Jo"));
    }
}
