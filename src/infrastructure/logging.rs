//! Logging system configuration and initialization
//!
//! Console logging via tracing-subscriber with an `EnvFilter`; `RUST_LOG`
//! wins over the configured default level. Optional rolling file output
//! under `logs/` next to the executable.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use once_cell::sync::Lazy;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::infrastructure::config::LoggingConfig;

// Keeps the non-blocking file writer alive for the process lifetime.
static LOG_GUARDS: Lazy<Mutex<Vec<WorkerGuard>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Get the log directory relative to the executable location
pub fn log_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    exe_dir.join("logs")
}

/// Initialize the logging system.
///
/// Must be called once, before any other subsystem logs.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let console_layer = fmt::layer().with_target(true);

    if config.file_output {
        let log_dir = log_directory();
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = tracing_appender::rolling::daily(&log_dir, "shopshot.log");
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        LOG_GUARDS.lock().expect("log guard lock poisoned").push(guard);

        let file_layer = fmt::layer().with_ansi(false).with_writer(file_writer);

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .try_init()?;
    }

    tracing::info!("Logging initialized (level: {})", config.level);
    Ok(())
}
