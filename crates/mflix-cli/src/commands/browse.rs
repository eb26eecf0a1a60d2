use super::{is_json, load_catalog, open_session};
use crate::output::Output;
use crate::render::{section_header, title_table};
use color_eyre::Result;
use mflix_config::{Config, PathManager};
use mflix_core::GenreTag;
use serde_json::json;

pub async fn run_browse(path_manager: &PathManager, config: Config, tag: &str, output: &Output) -> Result<()> {
    let mut session = open_session(path_manager, &config);
    load_catalog(&mut session, &config, output).await?;

    let tag = GenreTag::parse(tag);
    let titles = session.catalog().by_genre_tag(&tag);
    tracing::debug!(tag = %tag, matches = titles.len(), "Browsing category");

    if is_json(output) {
        output.json(&json!({
            "tag": tag.as_str(),
            "count": titles.len(),
            "titles": titles,
        }));
        return Ok(());
    }

    if titles.is_empty() {
        output.info(format!("No titles found for '{}'", tag));
        return Ok(());
    }

    if output.is_human() {
        section_header(&format!("{} · {} titles", tag.as_str().to_uppercase(), titles.len()));
        println!("{}", title_table(titles));
    }
    Ok(())
}
