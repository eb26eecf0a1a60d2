use mflix_models::{Title, TitleKind};

/// A bare movie with every optional field empty.
pub(crate) fn title(id: &str, name: &str) -> Title {
    Title {
        id: id.to_string(),
        title: name.to_string(),
        original_title: None,
        kind: TitleKind::Movie,
        year: 0,
        runtime_label: None,
        genres: Vec::new(),
        industry: None,
        quality_label: "HD".to_string(),
        rating: 0.0,
        certification: "UA".to_string(),
        language: "Hindi".to_string(),
        description: String::new(),
        director: None,
        poster_url: String::new(),
        backdrop_url: String::new(),
        video_url: None,
        playable_links: Vec::new(),
        cast: Vec::new(),
        seasons: Vec::new(),
        is_featured: false,
        is_trending: false,
    }
}
