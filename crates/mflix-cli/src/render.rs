use comfy_table::{presets, modifiers, Attribute, Cell, Color, ContentArrangement, Table};
use mflix_models::{HistoryEntry, Title};
use owo_colors::OwoColorize;

const BAR_WIDTH: usize = 20;

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

pub fn section_header(title: &str) {
    println!();
    println!("{}", title.bold().bright_cyan());
    println!("{}", "─".repeat(title.chars().count()).bright_cyan());
}

fn year_text(title: &Title) -> String {
    if title.year > 0 {
        title.year.to_string()
    } else {
        "-".to_string()
    }
}

fn rating_cell(title: &Title) -> Cell {
    let cell = Cell::new(format!("★ {}", title.rating_label()));
    if title.rating >= 7.5 {
        cell.fg(Color::Green)
    } else if title.rating > 0.0 {
        cell.fg(Color::Yellow)
    } else {
        cell.fg(Color::DarkGrey)
    }
}

/// Compact listing used by browse, search and the home rails.
pub fn title_table<'a>(titles: impl IntoIterator<Item = &'a Title>) -> Table {
    let mut table = new_table(&["ID", "Title", "Year", "Type", "Rating", "Quality", "Genres"]);
    for title in titles {
        table.add_row(vec![
            Cell::new(&title.id).fg(Color::DarkGrey),
            Cell::new(&title.title).add_attribute(Attribute::Bold),
            Cell::new(year_text(title)),
            Cell::new(title.kind.as_str()),
            rating_cell(title),
            Cell::new(&title.quality_label),
            Cell::new(title.genre_text()),
        ]);
    }
    table
}

pub fn progress_bar(percent: f64) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "{}{} {:>3}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        percent.round() as u32
    )
}

pub fn continue_watching_table<'a>(items: impl IntoIterator<Item = (&'a Title, f64)>) -> Table {
    let mut table = new_table(&["ID", "Title", "Type", "Progress"]);
    for (title, percent) in items {
        table.add_row(vec![
            Cell::new(&title.id).fg(Color::DarkGrey),
            Cell::new(&title.title).add_attribute(Attribute::Bold),
            Cell::new(title.kind.as_str()),
            Cell::new(progress_bar(percent)).fg(Color::Cyan),
        ]);
    }
    table
}

/// `mm:ss`, or `h:mm:ss` past an hour.
pub fn clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 { seconds as u64 } else { 0 };
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

pub fn history_table(entries: &[HistoryEntry]) -> Table {
    let mut table = new_table(&["ID", "Title", "Progress", "Position", "Updated"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.title_id).fg(Color::DarkGrey),
            Cell::new(&entry.title.title).add_attribute(Attribute::Bold),
            Cell::new(progress_bar(entry.progress_percent())).fg(Color::Cyan),
            Cell::new(format!(
                "{} / {}",
                clock(entry.position_seconds),
                clock(entry.duration_seconds)
            )),
            Cell::new(entry.updated_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    table
}

/// Two-column key/value table.
pub fn detail_table(rows: &[(&str, String)]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    for (key, value) in rows {
        table.add_row(vec![
            Cell::new(key).add_attribute(Attribute::Bold),
            Cell::new(value),
        ]);
    }
    table
}

pub fn links_table(title: &Title) -> Table {
    let mut table = new_table(&["Quality", "Size", "URL"]);
    for link in &title.playable_links {
        table.add_row(vec![
            Cell::new(&link.label).fg(Color::Green),
            Cell::new(if link.size_info.is_empty() { "-" } else { &link.size_info }),
            Cell::new(&link.url),
        ]);
    }
    table
}
