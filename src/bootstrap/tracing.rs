//! Tracing configuration for Project Locations
//!
//! ## Behavior / 行为
//!
//! - **Development**: debug level for the app crates
//! - **Production**: info level
//! - **Writers**: stdout always, plus a log file when the log directory is usable
//! - `RUST_LOG` replaces the default directives entirely

use std::{fs, io, path::Path, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

const LOG_FILE_NAME: &str = "project-locations.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives.
///
/// HTTP client internals stay at warn so one line per request does not
/// drown the render log.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    vec![
        if is_dev { "debug" } else { "info" }.to_string(),
        if is_dev {
            "pl_infra=debug"
        } else {
            "pl_infra=info"
        }
        .to_string(),
        "reqwest=warn".to_string(),
        "hyper=warn".to_string(),
        "hyper_util=warn".to_string(),
        "rustls=warn".to_string(),
    ]
}

/// Initialize the global tracing subscriber.
///
/// An empty `log_dir` selects the platform data directory. Failing to open
/// the log file only disables the file layer.
///
/// ## Errors / 错误
///
/// Returns `Err` if a subscriber is already registered.
pub fn init_tracing_subscriber(log_dir: &Path) -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    let stdout_writer: BoxMakeWriter = BoxMakeWriter::new(io::stdout);
    let file_writer = match build_file_writer(log_dir) {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to stdout: {err:#}");
            None
        }
    };

    // "2026-01-15 10:30:45.123 INFO src/file.rs:42 target: message"
    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stdout_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

fn resolve_log_dir(configured: &Path) -> anyhow::Result<std::path::PathBuf> {
    if configured.as_os_str().is_empty() {
        pl_infra::fs::default_log_dir()
    } else {
        Ok(configured.to_path_buf())
    }
}

fn build_file_writer(log_dir: &Path) -> anyhow::Result<NonBlocking> {
    let dir = resolve_log_dir(log_dir)?;
    fs::create_dir_all(&dir)?;

    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}
