use pl_app::{GenerationOutcome, MarkerSnapshot, PageSummary};
use pl_core::config::AppConfig;
use pl_core::ports::MapInitError;
use tracing::{info, warn};

use super::wiring::wire_dependencies;

/// What one run put on the page.
#[derive(Debug)]
pub struct RunReport {
    pub summary: PageSummary,
    /// `None` when the map never initialized.
    pub outcome: Option<GenerationOutcome>,
    pub markers: Vec<MarkerSnapshot>,
    pub map_error: Option<MapInitError>,
}

/// Load both datasets, bring up the map and render one generation.
///
/// Dataset loading and map initialization run concurrently and fail
/// independently; only wiring failures abort the run.
#[tracing::instrument(name = "app.run", skip_all)]
pub async fn run_app(config: AppConfig) -> anyhow::Result<RunReport> {
    let deps = wire_dependencies(&config)?;

    let (datasets, init) = tokio::join!(
        deps.load_datasets.execute(),
        deps.map_view.initialize(&deps.map_settings)
    );

    let summary = PageSummary::from_datasets(&datasets);
    info!(projects = %summary.projects_footer, "Projects");
    info!(leads = %summary.leads_footer, "Leads");
    if let Some(banner) = &summary.banner {
        warn!("{banner}");
    }

    deps.map_view.set_datasets(datasets);
    let outcome = deps.map_view.wait_idle().await;

    let markers = deps
        .map_view
        .session()
        .map(|session| session.markers())
        .unwrap_or_default();

    match outcome {
        Some(GenerationOutcome::Ready { markers: placed, skipped }) => {
            info!(placed, skipped, "Map ready");
            for marker in &markers {
                info!(
                    kind = %marker.kind,
                    label = marker.label.as_deref().unwrap_or(""),
                    rich = marker.rich,
                    visible = marker.attached,
                    "Marker"
                );
            }
        }
        Some(GenerationOutcome::Superseded) => warn!("Render generation superseded"),
        None => warn!("Map not rendered"),
    }

    deps.map_view.teardown();

    Ok(RunReport {
        summary,
        outcome,
        markers,
        map_error: init.err(),
    })
}
