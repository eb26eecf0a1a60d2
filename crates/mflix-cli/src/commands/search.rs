use super::{is_json, load_catalog, open_session};
use crate::output::Output;
use crate::render::{section_header, title_table};
use color_eyre::Result;
use mflix_config::{Config, PathManager};
use mflix_core::{Session, MIN_SEARCH_CHARS};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_search(
    path_manager: &PathManager,
    config: Config,
    query: Option<String>,
    select: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut session = open_session(path_manager, &config);
    let query = query.unwrap_or_default();
    let min_chars = session.settings().limits.search_min_chars.max(MIN_SEARCH_CHARS);

    if select.is_none() && query.trim().chars().count() < min_chars {
        print_recent(&session, output);
        return Ok(());
    }

    load_catalog(&mut session, &config, output).await?;

    if let Some(id) = select {
        let Some(title) = session.catalog().get(&id).map(|t| t.title.clone()) else {
            return Err(color_eyre::eyre::eyre!("Title not found: {}", id));
        };
        session.recent_searches_mut().record(&title);
        output.success(format!("Opened '{}'", title));
        output.println(format!("  {}", format!("Details: mflix show {}", id).dimmed()));
        return Ok(());
    }

    let results = session.catalog().search(&query);
    if is_json(output) {
        output.json(&json!({
            "query": query.trim(),
            "count": results.len(),
            "results": results,
        }));
        return Ok(());
    }

    if results.is_empty() {
        output.info(format!("No results for '{}'", query.trim()));
        return Ok(());
    }

    if output.is_human() {
        section_header(&format!("Results for '{}'", query.trim()));
        println!("{}", title_table(results));
        println!("  {}", "Open one with: mflix search --select <ID>".dimmed());
    }
    Ok(())
}

fn print_recent(session: &Session, output: &Output) {
    let recent = session.recent_searches().entries();
    if is_json(output) {
        output.json(&json!({ "recent": recent }));
        return;
    }
    if recent.is_empty() {
        output.info("No recent searches. Type at least two characters to search.");
        return;
    }
    if output.is_human() {
        section_header("Recent searches");
        for entry in recent {
            println!("  {} {}", "↺".dimmed(), entry);
        }
    }
}
