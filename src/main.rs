use project_locations_lib::{init_tracing_subscriber, resolve_config, run_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = resolve_config()?;

    if let Err(err) = init_tracing_subscriber(&config.log_dir) {
        eprintln!("Failed to initialize tracing: {err:#}");
    }

    let report = run_app(config).await?;
    if let Some(err) = &report.map_error {
        tracing::error!(error = %err, "Map unavailable");
    }
    Ok(())
}
