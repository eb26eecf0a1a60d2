use super::{flush_notifications, is_json, load_catalog, open_session};
use crate::output::Output;
use crate::render::section_header;
use crate::WatchlistCommands;
use color_eyre::Result;
use comfy_table::{presets, Cell, Color, Table};
use mflix_config::{Config, PathManager};
use serde_json::json;

pub async fn run_watchlist(
    path_manager: &PathManager,
    config: Config,
    cmd: WatchlistCommands,
    output: &Output,
) -> Result<()> {
    let mut session = open_session(path_manager, &config);

    match cmd {
        WatchlistCommands::List => {
            load_catalog(&mut session, &config, output).await?;
            let catalog = session.catalog();
            let entries = session.watchlist().entries();

            if is_json(output) {
                let items: Vec<_> = entries
                    .iter()
                    .map(|entry| {
                        json!({
                            "title_id": entry.title_id,
                            "added_at": entry.added_at,
                            "title": catalog.get(&entry.title_id),
                        })
                    })
                    .collect();
                output.json(&json!({ "count": items.len(), "watchlist": items }));
                return Ok(());
            }

            if entries.is_empty() {
                output.info("My List is empty. Add titles with: mflix watchlist toggle <ID>");
                return Ok(());
            }

            if output.is_human() {
                section_header(&format!("My List · {} titles", entries.len()));
                let mut table = Table::new();
                table.load_preset(presets::UTF8_FULL);
                table.set_header(vec!["ID", "Title", "Added"]);
                for entry in entries {
                    let name = match catalog.get(&entry.title_id) {
                        Some(title) => Cell::new(&title.title),
                        None => Cell::new("(no longer in catalog)").fg(Color::DarkGrey),
                    };
                    table.add_row(vec![
                        Cell::new(&entry.title_id),
                        name,
                        Cell::new(entry.added_at.format("%Y-%m-%d").to_string()),
                    ]);
                }
                println!("{}", table);
            }
        }
        WatchlistCommands::Toggle { id } => {
            load_catalog(&mut session, &config, output).await?;
            if session.toggle_watchlist(&id).is_none() {
                return Err(color_eyre::eyre::eyre!("Title not found: {}", id));
            }
            flush_notifications(&mut session, output);
        }
        WatchlistCommands::Remove { id } => {
            if session.remove_from_watchlist(&id) {
                output.success(format!("Removed {} from My List", id));
            } else {
                output.info(format!("{} is not on My List", id));
            }
        }
    }
    Ok(())
}
