use std::sync::LazyLock;

use mflix_models::{CastMember, Episode, PlayableLink, RawRecord, Season, Title, TitleKind};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::NormalizeError;

pub const UNTITLED: &str = "Untitled";
pub const DEFAULT_QUALITY: &str = "HD";
pub const DEFAULT_DESCRIPTION: &str = "No synopsis available.";
pub const DEFAULT_CERTIFICATION: &str = "UA";
pub const DEFAULT_LANGUAGE: &str = "Hindi";
pub const PLACEHOLDER_POSTER: &str = "https://picsum.photos/seed/movie/500/750";
pub const CAST_LIMIT: usize = 6;

const YES: &str = "Yes";

/// Bracketed size suffix on a link label: `"720p HEVC [860MB]"`.
static SIZE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[([^\]]+)\]").unwrap());
static LEADING_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?\d+").unwrap());
static LEADING_FLOAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?").unwrap());

/// Convert one upstream record into a canonical [`Title`].
///
/// Only a missing identifier is an error. Every other field falls back to a
/// default when it is absent, has the wrong type or fails to parse.
pub fn normalize(raw: &RawRecord) -> Result<Title, NormalizeError> {
    let id = raw.identifier().ok_or(NormalizeError::MissingIdentifier)?;

    let kind = detect_kind(raw);
    let poster_url = raw
        .first_text(&["poster", "original_poster_url"])
        .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string());
    let backdrop_url = raw
        .first_text(&["original_backdrop_url", "backdrop"])
        .unwrap_or_else(|| poster_url.clone());

    let playable_links = match kind {
        TitleKind::Movie => parse_links(raw),
        TitleKind::Series => Vec::new(),
    };
    let seasons = match kind {
        TitleKind::Series => parse_seasons(raw),
        TitleKind::Movie => Vec::new(),
    };

    Ok(Title {
        id,
        title: raw
            .first_text(&["title", "original_title"])
            .unwrap_or_else(|| UNTITLED.to_string()),
        original_title: raw.text("original_title"),
        kind,
        year: raw
            .first_text(&["year", "release_year"])
            .and_then(|text| leading_int(&text))
            .unwrap_or(0),
        runtime_label: raw.text("runtime"),
        genres: parse_genres(raw.value("genre")),
        industry: raw.text("industry"),
        quality_label: raw
            .first_text(&["quality_name", "quality"])
            .unwrap_or_else(|| DEFAULT_QUALITY.to_string()),
        rating: parse_rating(raw.value("rating")),
        certification: raw
            .first_text(&["certification_status", "certification"])
            .unwrap_or_else(|| DEFAULT_CERTIFICATION.to_string()),
        language: raw
            .first_text(&["languages", "audio_type", "original_language"])
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        description: raw
            .first_text(&["short_description", "description", "overview"])
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        director: parse_director(raw.value("director")),
        poster_url,
        backdrop_url,
        video_url: raw
            .first_text(&["video_url", "movie_link"])
            .filter(|url| is_http(url)),
        playable_links,
        cast: parse_cast(raw),
        seasons,
        is_featured: is_yes(raw.text("is_featured")),
        is_trending: is_yes(raw.first_text(&["is_trending_now", "is_trending"])),
    })
}

/// Normalize a whole catalog load, dropping records without an identifier.
pub fn normalize_all(records: &[RawRecord]) -> Vec<Title> {
    let mut dropped = 0usize;
    let titles: Vec<Title> = records
        .iter()
        .filter_map(|raw| match normalize(raw) {
            Ok(title) => Some(title),
            Err(_) => {
                dropped += 1;
                None
            }
        })
        .collect();

    if dropped > 0 {
        debug!("Dropped {} record(s) without an identifier", dropped);
    }
    titles
}

fn detect_kind(raw: &RawRecord) -> TitleKind {
    let says_series = |key: &str| {
        raw.text(key)
            .is_some_and(|value| value.eq_ignore_ascii_case("series"))
    };
    let has_seasons = structured(raw.value("seasons"))
        .map(|value| !as_list(value).is_empty())
        .unwrap_or(false);

    if says_series("content_type") || says_series("type") || has_seasons {
        TitleKind::Series
    } else {
        TitleKind::Movie
    }
}

/// Upstream sometimes stores nested documents as JSON text. Strings are parsed
/// (failure counts as absent); structured values are taken as they are.
fn structured(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::String(text) => serde_json::from_str(text).ok(),
        other => Some(other.clone()),
    }
}

/// Lists are taken in order, maps by their values in order, anything else is empty.
fn as_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        _ => Vec::new(),
    }
}

fn object_text(item: &Value, keys: &[&str]) -> Option<String> {
    let map = item.as_object()?;
    keys.iter().find_map(|key| match map.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

pub(crate) fn is_http(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn is_yes(flag: Option<String>) -> bool {
    flag.is_some_and(|value| value.trim().eq_ignore_ascii_case(YES))
}

fn leading_int(text: &str) -> Option<i32> {
    LEADING_INT.find(text.trim())?.as_str().parse().ok()
}

/// Numbers are read as-is; strings use their leading float (`"8.2/10"` -> 8.2).
fn parse_rating(value: Option<&Value>) -> f32 {
    let value = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => LEADING_FLOAT
            .find(s.trim())
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0),
        _ => 0.0,
    };
    if !value.is_finite() {
        return 0.0;
    }
    ((value.clamp(0.0, 10.0) * 10.0).round() / 10.0) as f32
}

fn split_size_suffix(raw_label: &str) -> (String, Option<String>) {
    match SIZE_SUFFIX.captures(raw_label) {
        Some(caps) => {
            let size = caps.get(1).map(|m| m.as_str().trim().to_string());
            let label = SIZE_SUFFIX.replace(raw_label, "").trim().to_string();
            (label, size)
        }
        None => (raw_label.trim().to_string(), None),
    }
}

fn parse_link(item: &Value) -> Option<PlayableLink> {
    let url = object_text(item, &["link", "url", "movie_link"]).filter(|url| is_http(url))?;
    let raw_label =
        object_text(item, &["name", "quality", "label"]).unwrap_or_else(|| DEFAULT_QUALITY.to_string());
    let (label, size) = split_size_suffix(&raw_label);

    Some(PlayableLink {
        url,
        label: if label.is_empty() { DEFAULT_QUALITY.to_string() } else { label },
        size_info: size
            .or_else(|| object_text(item, &["size", "info"]))
            .unwrap_or_default(),
    })
}

fn parse_links(raw: &RawRecord) -> Vec<PlayableLink> {
    structured(raw.first_value(&["download_links", "qualities"]))
        .map(as_list)
        .unwrap_or_default()
        .iter()
        .filter_map(parse_link)
        .collect()
}

fn parse_cast_entry(entry: &Value) -> Option<CastMember> {
    match entry {
        Value::String(name) if !name.trim().is_empty() => Some(CastMember {
            name: name.trim().to_string(),
            image_ref: None,
        }),
        Value::Object(_) => Some(CastMember {
            name: object_text(entry, &["name"])?,
            image_ref: object_text(entry, &["image", "profile_path", "photo"]),
        }),
        _ => None,
    }
}

fn parse_cast(raw: &RawRecord) -> Vec<CastMember> {
    let from_crew: Vec<CastMember> = structured(raw.value("cast_crew_data"))
        .and_then(|data| data.get("cast").cloned())
        .map(as_list)
        .unwrap_or_default()
        .iter()
        .filter_map(parse_cast_entry)
        .take(CAST_LIMIT)
        .collect();
    if !from_crew.is_empty() {
        return from_crew;
    }

    match raw.value("cast") {
        Some(Value::String(text)) => split_names(text)
            .into_iter()
            .map(|name| CastMember { name, image_ref: None })
            .take(CAST_LIMIT)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(parse_cast_entry)
            .take(CAST_LIMIT)
            .collect(),
        _ => Vec::new(),
    }
}

fn split_names(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_genres(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(text)) => split_names(text),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(split_names)
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_director(value: Option<&Value>) -> Option<String> {
    let joined = match value? {
        Value::String(text) => text.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };
    (!joined.is_empty()).then_some(joined)
}

fn parse_seasons(raw: &RawRecord) -> Vec<Season> {
    structured(raw.value("seasons"))
        .map(as_list)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(index, season)| {
            let episodes = structured(season.get("episodes"))
                .map(as_list)
                .unwrap_or_default()
                .iter()
                .enumerate()
                .filter_map(|(ep_index, episode)| {
                    let url = object_text(episode, &["url", "link", "video_url"])
                        .filter(|url| is_http(url))?;
                    Some(Episode {
                        title: object_text(episode, &["title", "name"])
                            .unwrap_or_else(|| format!("Episode {}", ep_index + 1)),
                        url,
                    })
                })
                .collect();

            Season {
                name: object_text(season, &["name", "title", "season_name"])
                    .unwrap_or_else(|| format!("Season {}", index + 1)),
                episodes,
            }
        })
        .collect()
}
