pub mod browse;
pub mod clear;
pub mod config;
pub mod history;
pub mod home;
pub mod recent;
pub mod search;
pub mod show;
pub mod watchlist;

use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use mflix_config::{Config, PathManager};
use mflix_core::{FileStorage, KeyValueStorage, Session, SessionSettings};
use mflix_sources::{CatalogSource, SourceFactory};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

/// Open the session over the on-disk client storage.
pub fn open_session(path_manager: &PathManager, config: &Config) -> Session {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::new(path_manager.storage_dir()));
    Session::open(storage, SessionSettings::from_config(config))
}

/// Build the configured source and load the catalog into the session.
///
/// The source is handed back for follow-up single-title fetches.
pub async fn load_catalog(
    session: &mut Session,
    config: &Config,
    output: &Output,
) -> Result<Box<dyn CatalogSource>> {
    config.validate().map_err(|e| {
        color_eyre::eyre::eyre!(
            "{}\nRun 'mflix config init --base-url <URL>' or 'mflix config init --file <PATH>' to configure the catalog source.",
            e
        )
    })?;
    let source = SourceFactory::create(config)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create catalog source: {}", e))?;

    let spinner = loading_spinner(output, format!("Loading catalog from {}...", source.source_name()));
    let count = session.load_catalog(source.as_ref()).await;
    spinner.finish_and_clear();

    if count == 0 {
        output.warn("The catalog is empty or could not be loaded (run with -v for details)");
    }
    Ok(source)
}

/// Spinner shown while the catalog loads; hidden when nobody is watching.
fn loading_spinner(output: &Output, message: String) -> ProgressBar {
    if !output.is_human() || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Print whatever toasts the session raised during the command.
pub fn flush_notifications(session: &mut Session, output: &Output) {
    for notification in session.notifications().visible() {
        output.toast(&notification);
    }
}

pub fn is_json(output: &Output) -> bool {
    output.format() != OutputFormat::Human
}
