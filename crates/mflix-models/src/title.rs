use serde::{Deserialize, Serialize};

/// Canonical catalog entity produced by the normalizer.
///
/// Every field is populated; optional upstream data is either `Option` here or
/// has already been replaced with its default. A `Title` is never mutated after
/// normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub id: String,
    pub title: String,
    pub original_title: Option<String>,
    pub kind: TitleKind,
    pub year: i32,
    pub runtime_label: Option<String>,
    pub genres: Vec<String>,
    pub industry: Option<String>,
    pub quality_label: String,
    /// 0.0 to 10.0, one decimal digit
    pub rating: f32,
    pub certification: String,
    pub language: String,
    pub description: String,
    pub director: Option<String>,
    pub poster_url: String,
    pub backdrop_url: String,
    pub video_url: Option<String>,
    /// Movies only
    pub playable_links: Vec<PlayableLink>,
    pub cast: Vec<CastMember>,
    /// Series only
    pub seasons: Vec<Season>,
    pub is_featured: bool,
    pub is_trending: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TitleKind {
    #[default]
    Movie,
    Series,
}

impl TitleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleKind::Movie => "movie",
            TitleKind::Series => "series",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayableLink {
    pub url: String,
    pub label: String,
    pub size_info: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastMember {
    pub name: String,
    pub image_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Season {
    pub name: String,
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Episode {
    pub title: String,
    pub url: String,
}

impl Title {
    pub fn is_series(&self) -> bool {
        self.kind == TitleKind::Series
    }

    /// Genres joined the way upstream stores them ("Action, Drama").
    pub fn genre_text(&self) -> String {
        self.genres.join(", ")
    }

    pub fn cast_text(&self) -> String {
        self.cast
            .iter()
            .map(|member| member.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Rating rendered with exactly one decimal digit.
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.rating)
    }
}
