//! Telemetry and Observability
//!
//! Structured logging setup. Logs go to stderr, keeping stdout for reports,
//! and are mirrored to `<dir>/guild-admin.log` when a log directory is set.

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log file name inside the configured log directory.
pub const LOG_FILE_NAME: &str = "guild-admin.log";

/// Initialize tracing subscriber
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_tracing(level: &str, log_dir: Option<&Path>) -> std::io::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILE_NAME))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(file_layer)
        .init();

    tracing::info!(level, "Tracing initialized");
    Ok(())
}
