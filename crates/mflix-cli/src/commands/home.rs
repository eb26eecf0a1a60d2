use super::{is_json, load_catalog, open_session};
use crate::output::Output;
use crate::render::{continue_watching_table, section_header, title_table};
use color_eyre::Result;
use mflix_config::{Config, PathManager};
use mflix_core::{HomeFeed, RailKind};
use owo_colors::OwoColorize;

pub async fn run_home(path_manager: &PathManager, config: Config, output: &Output) -> Result<()> {
    let mut session = open_session(path_manager, &config);
    load_catalog(&mut session, &config, output).await?;

    session.home_feed(|feed| -> Result<()> {
        if is_json(output) {
            output.json(&serde_json::to_value(feed)?);
            return Ok(());
        }
        if output.is_quiet() {
            return Ok(());
        }
        print_feed(feed);
        Ok(())
    })
}

fn print_feed(feed: &HomeFeed<'_>) {
    if !feed.featured.is_empty() {
        section_header("Featured");
        for title in &feed.featured {
            println!(
                "  {} {} {}",
                "▶".red(),
                title.title.bold(),
                format!("({} · ★ {})", title.quality_label, title.rating_label()).dimmed()
            );
        }
    }

    for rail in &feed.rails {
        section_header(rail.heading);
        if rail.items.is_empty() {
            println!("  {}", "Nothing here yet".dimmed());
            continue;
        }

        let table = if rail.kind == RailKind::ContinueWatching {
            continue_watching_table(
                rail.items
                    .iter()
                    .map(|item| (item.title, item.progress.unwrap_or(0.0))),
            )
        } else {
            title_table(rail.items.iter().map(|item| item.title))
        };
        println!("{}", table);

        if let Some(tag) = rail.kind.browse_tag() {
            println!("  {}", format!("See all: mflix browse {}", tag).dimmed());
        }
    }
}
