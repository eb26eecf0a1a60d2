use super::{flush_notifications, is_json, load_catalog, open_session};
use crate::output::Output;
use crate::render::{detail_table, history_table, section_header};
use crate::HistoryCommands;
use color_eyre::Result;
use mflix_config::{Config, PathManager};
use serde_json::json;

pub async fn run_history(
    path_manager: &PathManager,
    config: Config,
    cmd: HistoryCommands,
    output: &Output,
) -> Result<()> {
    let mut session = open_session(path_manager, &config);

    match cmd {
        HistoryCommands::List => {
            let history = session.history();
            if is_json(output) {
                output.json(&json!({ "count": history.len(), "history": history.entries() }));
            } else if history.is_empty() {
                output.info("No watch history yet");
            } else if output.is_human() {
                section_header(&format!("Continue Watching · {} titles", history.len()));
                println!("{}", history_table(history.entries()));
            }
        }
        HistoryCommands::Save { id, position, duration } => {
            let source = load_catalog(&mut session, &config, output).await?;
            let title = session
                .load_title(source.as_ref(), &id)
                .await
                .ok_or_else(|| color_eyre::eyre::eyre!("Title not found: {}", id))?;

            let percent = session
                .history()
                .save_progress(&title, position, duration)
                .progress_percent();
            output.success(format!("Saved progress for '{}' ({:.0}%)", title.title, percent));
        }
        HistoryCommands::Remove { id } => {
            if session.history().remove(&id) {
                output.success(format!("Removed {} from watch history", id));
            } else {
                output.info(format!("{} is not in watch history", id));
            }
        }
        HistoryCommands::Clear => {
            session.clear_history();
            flush_notifications(&mut session, output);
        }
        HistoryCommands::Stats => {
            let (watched, minutes, hours) = {
                let history = session.history();
                (history.len(), history.total_watched_minutes(), history.hours_watched())
            };
            let listed = session.watchlist().len();

            if is_json(output) {
                output.json(&json!({
                    "watched": watched,
                    "total_minutes": minutes,
                    "hours_watched": hours,
                    "watchlist": listed,
                }));
            } else if output.is_human() {
                section_header("Profile");
                println!(
                    "{}",
                    detail_table(&[
                        ("Watched", watched.to_string()),
                        ("My List", listed.to_string()),
                        ("Hours", format!("{}h", hours)),
                    ])
                );
            }
        }
    }
    Ok(())
}
