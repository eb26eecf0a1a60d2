use super::{is_json, load_catalog, open_session};
use crate::output::Output;
use crate::render::{clock, detail_table, links_table, progress_bar, section_header, title_table};
use color_eyre::Result;
use mflix_config::{Config, PathManager};
use mflix_models::Title;
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_show(path_manager: &PathManager, config: Config, id: &str, output: &Output) -> Result<()> {
    let mut session = open_session(path_manager, &config);
    let source = load_catalog(&mut session, &config, output).await?;

    let title = session
        .load_title(source.as_ref(), id)
        .await
        .ok_or_else(|| color_eyre::eyre::eyre!("Title not found: {}", id))?;

    let on_watchlist = session.watchlist().is_member(&title.id);
    let history = session.history().get(&title.id).cloned();
    let related = session.catalog().related(&title.id);

    if is_json(output) {
        output.json(&json!({
            "title": title,
            "on_watchlist": on_watchlist,
            "progress": history.as_ref().map(|entry| entry.progress_percent()),
            "related": related.iter().map(|t| json!({ "id": t.id, "title": t.title })).collect::<Vec<_>>(),
        }));
        return Ok(());
    }
    if !output.is_human() {
        return Ok(());
    }

    print_header(&title);

    let mut rows = vec![
        ("Type", title.kind.as_str().to_string()),
        ("Year", if title.year > 0 { title.year.to_string() } else { "-".to_string() }),
        ("Rating", format!("★ {}", title.rating_label())),
        ("Certification", title.certification.clone()),
        ("Language", title.language.clone()),
        ("Quality", title.quality_label.clone()),
        ("Runtime", title.runtime_label.clone().unwrap_or_else(|| "N/A".to_string())),
        ("Genres", title.genre_text()),
    ];
    if let Some(director) = &title.director {
        rows.push(("Director", director.clone()));
    }
    if let Some(industry) = &title.industry {
        rows.push(("Industry", industry.clone()));
    }
    if !title.cast.is_empty() {
        rows.push(("Cast", title.cast_text()));
    }
    rows.push(("My List", if on_watchlist { "✓ Listed".to_string() } else { "-".to_string() }));
    if let Some(entry) = &history {
        rows.push((
            "Progress",
            format!("{}  ({} / {})", progress_bar(entry.progress_percent()), clock(entry.position_seconds), clock(entry.duration_seconds)),
        ));
    }
    println!("{}", detail_table(&rows));

    println!();
    println!("{}", title.description);

    if !title.playable_links.is_empty() {
        section_header("Download / Play");
        println!("{}", links_table(&title));
    } else if let Some(url) = &title.video_url {
        section_header("Play");
        println!("  {}", url);
    }

    for season in &title.seasons {
        section_header(&format!("{} · {} episodes", season.name, season.episodes.len()));
        for (idx, episode) in season.episodes.iter().enumerate() {
            println!("  {:>2}. {}  {}", idx + 1, episode.title, episode.url.dimmed());
        }
    }

    if !related.is_empty() {
        section_header("More like this");
        println!("{}", title_table(related));
    }
    Ok(())
}

fn print_header(title: &Title) {
    println!();
    println!("{}", title.title.bold().bright_white());
    if let Some(original) = title.original_title.as_deref().filter(|o| *o != title.title) {
        println!("{}", original.dimmed());
    }
}
