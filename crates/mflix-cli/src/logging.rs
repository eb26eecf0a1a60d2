use anyhow::Result;
use mflix_config::LoggingConfig;
use std::io::{self, IsTerminal};
use std::path::Path;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Build the filter from the command line first, then `RUST_LOG`, then the
/// configured level.
fn build_filter(verbose_level: u8, quiet: bool, default_level: &str) -> EnvFilter {
    if quiet {
        // In quiet mode, only show errors
        return EnvFilter::new("error");
    }

    match verbose_level {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        // -v: debug level but suppress noisy hyper logs
        1 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug,hyper::proto::h1=warn,hyper::client::pool=warn")),
        // -vv and above: everything
        _ => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
    }
}

pub fn init_logging(verbose_level: u8, quiet: bool, config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(verbose_level, quiet, &config.level);

    let json = std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or_else(|_| config.json || !io::stdout().is_terminal());

    let registry = Registry::default().with(filter);

    // If log file is configured, write to file; otherwise write to stderr
    if let Some(log_path) = config.file.as_deref() {
        let file_appender = rolling_appender(log_path)?;

        if json {
            let json_layer = fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(file_appender);

            registry.with(json_layer).init();
        } else {
            let fmt_layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(file_appender);

            registry.with(fmt_layer).init();
        }
    } else if json {
        let json_layer = fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);

        registry.with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);

        registry.with(fmt_layer).init();
    }

    Ok(())
}

/// Daily rotating appender. Files are named `mflix.2026-01-17`, `mflix.2026-01-18`, ...
fn rolling_appender(log_path: &Path) -> Result<RollingFileAppender> {
    let log_dir = log_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
    std::fs::create_dir_all(log_dir)?;

    let log_filename = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;

    // Remove extension for rotation prefix (e.g., "mflix" from "mflix.log")
    let log_prefix = log_filename
        .rsplit_once('.')
        .map(|(prefix, _)| prefix)
        .unwrap_or(log_filename);

    Ok(RollingFileAppender::new(Rotation::DAILY, log_dir, log_prefix))
}
