pub mod config;
pub mod middleware;
pub mod paths;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use config::LogConfig;
pub use middleware::{access_log_middleware, request_id_middleware, RequestId, SlowRequestThreshold};

/// Initialize the logging system
///
/// Console output is always on. With file logging enabled this also sets up
/// daily-rolling JSON files in the log directory:
/// - `access.log` for events with target `access_log`
/// - `application.log` for everything else
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.console_log_level)),
        );

    if !config.file_logging_enabled {
        tracing_subscriber::registry().with(console_layer).try_init()?;
        tracing::info!("Logging initialized (console only)");
        return Ok(());
    }

    let log_dir = paths::get_log_directory(config.custom_log_dir.as_deref())?;

    let access_appender = tracing_appender::rolling::daily(&log_dir, "access.log");
    let app_appender = tracing_appender::rolling::daily(&log_dir, "application.log");

    let (access_writer, access_guard) = tracing_appender::non_blocking(access_appender);
    let (app_writer, app_guard) = tracing_appender::non_blocking(app_appender);

    let access_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(access_writer)
        .with_filter(EnvFilter::new("access_log=info"));

    let app_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(app_writer)
        .with_filter(
            EnvFilter::new(&config.file_log_level).add_directive("access_log=off".parse()?),
        );

    tracing_subscriber::registry()
        .with(console_layer)
        .with(access_layer)
        .with(app_layer)
        .try_init()?;

    // Dropping the guards would close the log files
    std::mem::forget(access_guard);
    std::mem::forget(app_guard);

    tracing::info!(log_dir = ?log_dir, "Logging initialized - access: access.log, application: application.log");

    Ok(())
}

/// Log platform-specific information on startup
pub fn log_platform_info() {
    tracing::info!(
        platform = std::env::consts::OS,
        architecture = std::env::consts::ARCH,
        family = std::env::consts::FAMILY,
        version = env!("CARGO_PKG_VERSION"),
        "Server starting on platform"
    );
}
