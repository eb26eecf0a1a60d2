use super::is_json;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use mflix_config::{Config, PathManager, SourceKind};
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn run_config(path_manager: &PathManager, config: Config, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(path_manager, &config, output),
        ConfigCommands::Init { base_url, file, force, log_to_file } => {
            init_config(path_manager, base_url, file, force, log_to_file, output)
        }
    }
}

fn section_table(heading: &str, rows: Vec<(&str, String)>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(heading).fg(comfy_table::Color::Cyan).add_attribute(comfy_table::Attribute::Bold),
        Cell::new(""),
    ]);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn show_config(path_manager: &PathManager, config: &Config, output: &Output) -> Result<()> {
    let config_file = path_manager.config_file();

    if is_json(output) {
        output.json(&serde_json::json!({
            "config_file": config_file,
            "exists": config_file.exists(),
            "config": serde_json::to_value(config)?,
        }));
        return Ok(());
    }
    if !output.is_human() {
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {} (showing defaults)", config_file.display()));
        output.info("Create one with 'mflix config init --base-url <URL>'.");
    }

    println!();
    println!("{}", "Configuration".bright_cyan().bold());
    println!();

    let source = &config.source;
    let source_rows = vec![
        ("Kind", format!("{:?}", source.kind).to_lowercase()),
        ("Base URL", if source.base_url.is_empty() { "(not set)".to_string() } else { source.base_url.clone() }),
        ("Collection", source.collection.clone()),
        ("File", source.file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "(not set)".to_string())),
        ("Timeout", format!("{}s", source.timeout_secs)),
    ];
    println!("{}", section_table("Source", source_rows));

    let display = &config.display;
    println!(
        "{}",
        section_table(
            "Display",
            vec![
                ("Rail limit", display.rail_limit.to_string()),
                ("Search limit", display.search_limit.to_string()),
                ("Search min chars", display.search_min_chars.to_string()),
                ("Featured limit", display.featured_limit.to_string()),
                ("Related limit", display.related_limit.to_string()),
            ],
        )
    );

    println!(
        "{}",
        section_table(
            "Notifications & Playback",
            vec![
                ("Max visible", config.notifications.max_visible.to_string()),
                ("Dismiss after", format!("{}ms", config.notifications.dismiss_after_ms)),
                ("Save debounce", format!("{}s", config.playback.save_debounce_secs)),
            ],
        )
    );

    println!(
        "{}",
        section_table(
            "Paths & Logging",
            vec![
                ("Config file", config_file.display().to_string()),
                ("Storage", path_manager.storage_dir().display().to_string()),
                ("Log level", config.logging.level.clone()),
                ("Log file", config.logging.file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "stderr".to_string())),
            ],
        )
    );

    if let Err(e) = config.validate() {
        output.warn(format!("Configuration is not usable yet: {}", e));
    }
    Ok(())
}

fn init_config(
    path_manager: &PathManager,
    base_url: Option<String>,
    file: Option<PathBuf>,
    force: bool,
    log_to_file: bool,
    output: &Output,
) -> Result<()> {
    let config_file = path_manager.config_file();
    if config_file.exists() && !force {
        return Err(color_eyre::eyre::eyre!(
            "Configuration already exists at {} (use --force to overwrite)",
            config_file.display()
        ));
    }

    let mut config = Config::default();
    if let Some(path) = file {
        config.source.kind = SourceKind::File;
        config.source.file = Some(path);
    } else if let Some(url) = base_url {
        config.source.kind = SourceKind::Http;
        config.source.base_url = url.trim_end_matches('/').to_string();
    }
    if log_to_file {
        config.logging.file = Some(path_manager.default_log_file());
    }

    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;

    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create directories: {}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    tracing::info!(config_file = %config_file.display(), "Configuration written");
    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}
