use std::fmt;
use std::str::FromStr;

use mflix_config::DisplayConfig;
use mflix_models::{RawRecord, Title};

use crate::normalize::normalize_all;

/// Shortest query `search` answers. Configuration can raise it, never lower it.
pub const MIN_SEARCH_CHARS: usize = 2;

/// Caps applied to derived views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLimits {
    pub rail: usize,
    pub search: usize,
    pub search_min_chars: usize,
    pub featured: usize,
    pub related: usize,
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for CatalogLimits {
    fn from(display: &DisplayConfig) -> Self {
        Self {
            rail: display.rail_limit,
            search: display.search_limit,
            search_min_chars: display.search_min_chars,
            featured: display.featured_limit,
            related: display.related_limit,
        }
    }
}

/// Category selector used by the browse screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreTag {
    All,
    Trending,
    Latest,
    UltraHd,
    Bollywood,
    Hollywood,
    /// Free-form genre, matched as a substring of the genre text. Stored lowercase.
    Genre(String),
}

impl GenreTag {
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        match tag.as_str() {
            "" | "all" => GenreTag::All,
            "trending" => GenreTag::Trending,
            "latest" => GenreTag::Latest,
            "4k" => GenreTag::UltraHd,
            "bollywood" => GenreTag::Bollywood,
            "hollywood" => GenreTag::Hollywood,
            _ => GenreTag::Genre(tag),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            GenreTag::All => "all",
            GenreTag::Trending => "trending",
            GenreTag::Latest => "latest",
            GenreTag::UltraHd => "4k",
            GenreTag::Bollywood => "bollywood",
            GenreTag::Hollywood => "hollywood",
            GenreTag::Genre(genre) => genre,
        }
    }
}

impl FromStr for GenreTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(GenreTag::parse(s))
    }
}

impl fmt::Display for GenreTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn is_ultra_hd(title: &Title) -> bool {
    title.quality_label.contains("4K")
}

fn industry_matches(title: &Title, industry: &str) -> bool {
    title
        .industry
        .as_deref()
        .is_some_and(|value| contains_ci(value, industry))
}

/// The normalized catalog for one session.
///
/// Titles keep upstream order. Views are computed on every call and never
/// cached, so they always reflect the current collection.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    titles: Vec<Title>,
    limits: CatalogLimits,
}

impl CatalogIndex {
    pub fn new(titles: Vec<Title>, limits: CatalogLimits) -> Self {
        Self { titles, limits }
    }

    pub fn from_records(records: &[RawRecord], limits: CatalogLimits) -> Self {
        Self::new(normalize_all(records), limits)
    }

    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    pub fn limits(&self) -> CatalogLimits {
        self.limits
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Title> {
        self.titles.iter().find(|title| title.id == id)
    }

    /// Every title matching a category tag. Uncapped.
    pub fn by_genre_tag(&self, tag: &GenreTag) -> Vec<&Title> {
        match tag {
            GenreTag::All => self.titles.iter().collect(),
            GenreTag::Trending => self.titles.iter().filter(|t| t.is_trending).collect(),
            GenreTag::Latest => self.latest(),
            GenreTag::UltraHd => self.titles.iter().filter(|t| is_ultra_hd(t)).collect(),
            GenreTag::Bollywood => self
                .titles
                .iter()
                .filter(|t| industry_matches(t, "bollywood"))
                .collect(),
            GenreTag::Hollywood => self
                .titles
                .iter()
                .filter(|t| industry_matches(t, "hollywood"))
                .collect(),
            GenreTag::Genre(genre) => {
                let needle = genre.to_lowercase();
                self.titles
                    .iter()
                    .filter(|t| contains_ci(&t.genre_text(), &needle))
                    .collect()
            }
        }
    }

    pub fn by_tag(&self, tag: &str) -> Vec<&Title> {
        self.by_genre_tag(&GenreTag::parse(tag))
    }

    /// Case-insensitive search over title, genres, cast and director.
    ///
    /// Queries shorter than the configured minimum (at least two characters)
    /// return nothing.
    pub fn search(&self, query: &str) -> Vec<&Title> {
        let query = query.trim();
        if query.chars().count() < self.limits.search_min_chars.max(MIN_SEARCH_CHARS) {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        self.titles
            .iter()
            .filter(|title| {
                contains_ci(&title.title, &needle)
                    || contains_ci(&title.genre_text(), &needle)
                    || contains_ci(&title.cast_text(), &needle)
                    || title
                        .director
                        .as_deref()
                        .is_some_and(|director| contains_ci(director, &needle))
            })
            .take(self.limits.search)
            .collect()
    }

    /// Banner titles: the featured ones, or the head of the catalog when none are.
    pub fn featured(&self) -> Vec<&Title> {
        let featured: Vec<&Title> = self
            .titles
            .iter()
            .filter(|t| t.is_featured)
            .take(self.limits.featured)
            .collect();
        if !featured.is_empty() {
            return featured;
        }
        self.titles.iter().take(self.limits.featured).collect()
    }

    pub fn trending_row(&self) -> Vec<&Title> {
        self.capped(self.by_genre_tag(&GenreTag::Trending))
    }

    pub fn latest_row(&self) -> Vec<&Title> {
        self.capped(self.latest())
    }

    pub fn ultra_hd_row(&self) -> Vec<&Title> {
        self.capped(self.by_genre_tag(&GenreTag::UltraHd))
    }

    pub fn industry_row(&self, industry: &str) -> Vec<&Title> {
        let needle = industry.to_lowercase();
        self.capped(
            self.titles
                .iter()
                .filter(|t| industry_matches(t, &needle))
                .collect(),
        )
    }

    /// Titles whose genre text contains any of `genres`.
    pub fn genre_row(&self, genres: &[&str]) -> Vec<&Title> {
        let needles: Vec<String> = genres.iter().map(|g| g.to_lowercase()).collect();
        self.capped(
            self.titles
                .iter()
                .filter(|t| {
                    let text = t.genre_text().to_lowercase();
                    needles.iter().any(|needle| text.contains(needle.as_str()))
                })
                .collect(),
        )
    }

    /// Other titles to offer next to `id`, in catalog order.
    pub fn related(&self, id: &str) -> Vec<&Title> {
        self.titles
            .iter()
            .filter(|t| t.id != id)
            .take(self.limits.related)
            .collect()
    }

    fn latest(&self) -> Vec<&Title> {
        let mut sorted: Vec<&Title> = self.titles.iter().collect();
        // sort_by is stable: equal years keep catalog order
        sorted.sort_by(|a, b| b.year.cmp(&a.year));
        sorted
    }

    fn capped<'a>(&self, mut titles: Vec<&'a Title>) -> Vec<&'a Title> {
        titles.truncate(self.limits.rail);
        titles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::title;
    use mflix_models::CastMember;

    fn ids(titles: &[&Title]) -> Vec<String> {
        titles.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_alpha_beta_trending_and_latest() {
        let mut alpha = title("1", "Alpha");
        alpha.year = 2020;
        alpha.is_trending = true;
        let mut beta = title("2", "Beta");
        beta.year = 2022;

        let catalog = CatalogIndex::new(vec![alpha, beta], CatalogLimits::default());
        assert_eq!(ids(&catalog.by_tag("trending")), vec!["1"]);
        assert_eq!(ids(&catalog.by_tag("latest")), vec!["2", "1"]);
        assert_eq!(ids(&catalog.by_tag("all")), vec!["1", "2"]);
    }

    #[test]
    fn test_latest_is_stable() {
        let years = [("a", 2020), ("b", 2021), ("c", 2020), ("d", 2021), ("e", 0)];
        let titles = years
            .iter()
            .map(|(id, year)| {
                let mut t = title(id, id);
                t.year = *year;
                t
            })
            .collect();
        let catalog = CatalogIndex::new(titles, CatalogLimits::default());
        assert_eq!(ids(&catalog.by_genre_tag(&GenreTag::Latest)), vec!["b", "d", "a", "c", "e"]);
    }

    #[test]
    fn test_ultra_hd_and_industry_tags() {
        let mut uhd = title("1", "Big");
        uhd.quality_label = "4K Ultra".to_string();
        uhd.industry = Some("Hollywood".to_string());
        let mut local = title("2", "Local");
        local.industry = Some("BOLLYWOOD".to_string());

        let catalog = CatalogIndex::new(vec![uhd, local], CatalogLimits::default());
        assert_eq!(ids(&catalog.by_tag("4K")), vec!["1"]);
        assert_eq!(ids(&catalog.by_tag("bollywood")), vec!["2"]);
        assert_eq!(ids(&catalog.by_tag("Hollywood")), vec!["1"]);
        assert_eq!(ids(&catalog.ultra_hd_row()), vec!["1"]);
    }

    #[test]
    fn test_free_form_genre_tag() {
        let mut thriller = title("1", "Chase");
        thriller.genres = vec!["Action".to_string(), "Thriller".to_string()];
        let mut romcom = title("2", "Love");
        romcom.genres = vec!["Romance".to_string(), "Comedy".to_string()];

        let catalog = CatalogIndex::new(vec![thriller, romcom], CatalogLimits::default());
        assert_eq!(GenreTag::parse(" Comedy "), GenreTag::Genre("comedy".to_string()));
        assert_eq!(ids(&catalog.by_tag("comedy")), vec!["2"]);
        assert_eq!(ids(&catalog.by_tag("THRILL")), vec!["1"]);
        assert!(catalog.by_tag("western").is_empty());
        assert_eq!(ids(&catalog.genre_row(&["horror", "thriller"])), vec!["1"]);
    }

    #[test]
    fn test_search_matches_fields_case_insensitively() {
        let mut by_title = title("1", "Action Jackson");
        by_title.genres = vec!["Drama".to_string()];
        let mut by_genre = title("2", "Other");
        by_genre.genres = vec!["ACTION".to_string()];
        let mut by_cast = title("3", "Third");
        by_cast.cast = vec![CastMember {
            name: "Jack Black".to_string(),
            image_ref: None,
        }];
        let mut by_director = title("4", "Fourth");
        by_director.director = Some("Zack Snyder".to_string());
        let unrelated = title("5", "Quiet");

        let catalog = CatalogIndex::new(
            vec![by_title, by_genre, by_cast, by_director, unrelated],
            CatalogLimits::default(),
        );

        assert!(catalog.search("a").is_empty());
        assert!(catalog.search("  a  ").is_empty());
        assert_eq!(ids(&catalog.search("ac")), vec!["1", "2", "3", "4"]);
        assert_eq!(ids(&catalog.search("ACTION")), vec!["1", "2"]);
        assert_eq!(ids(&catalog.search("snyder")), vec!["4"]);
    }

    #[test]
    fn test_single_character_search_ignores_lower_minimum() {
        for search_min_chars in [0, 1] {
            let limits = CatalogLimits {
                search_min_chars,
                ..CatalogLimits::default()
            };
            let catalog = CatalogIndex::new(vec![title("1", "Alpha")], limits);
            assert!(catalog.search("a").is_empty(), "min chars {}", search_min_chars);
            assert_eq!(ids(&catalog.search("al")), vec!["1"]);
        }

        let limits = CatalogLimits {
            search_min_chars: 4,
            ..CatalogLimits::default()
        };
        let catalog = CatalogIndex::new(vec![title("1", "Alpha")], limits);
        assert!(catalog.search("alp").is_empty());
        assert_eq!(ids(&catalog.search("alph")), vec!["1"]);
    }

    #[test]
    fn test_search_is_capped() {
        let titles = (0..30).map(|i| title(&i.to_string(), "Match")).collect();
        let catalog = CatalogIndex::new(titles, CatalogLimits::default());
        assert_eq!(catalog.search("match").len(), 18);
    }

    #[test]
    fn test_featured_falls_back_to_head() {
        let titles: Vec<Title> = (0..10).map(|i| title(&i.to_string(), "T")).collect();
        let catalog = CatalogIndex::new(titles.clone(), CatalogLimits::default());
        assert_eq!(ids(&catalog.featured()), vec!["0", "1", "2", "3", "4", "5", "6", "7"]);

        let mut with_featured = titles;
        with_featured[4].is_featured = true;
        with_featured[9].is_featured = true;
        let catalog = CatalogIndex::new(with_featured, CatalogLimits::default());
        assert_eq!(ids(&catalog.featured()), vec!["4", "9"]);
    }

    #[test]
    fn test_rows_respect_limits() {
        let titles: Vec<Title> = (0..20)
            .map(|i| {
                let mut t = title(&i.to_string(), "T");
                t.is_trending = true;
                t
            })
            .collect();
        let limits = CatalogLimits {
            rail: 5,
            ..CatalogLimits::default()
        };
        let catalog = CatalogIndex::new(titles, limits);
        assert_eq!(catalog.trending_row().len(), 5);
        assert_eq!(catalog.latest_row().len(), 5);
        assert_eq!(catalog.by_tag("trending").len(), 20);
    }

    #[test]
    fn test_get_and_related() {
        let titles: Vec<Title> = (0..15).map(|i| title(&format!("m{}", i), "T")).collect();
        let catalog = CatalogIndex::new(titles, CatalogLimits::default());

        assert_eq!(catalog.get("m3").map(|t| t.id.as_str()), Some("m3"));
        assert!(catalog.get("missing").is_none());

        let related = catalog.related("m0");
        assert_eq!(related.len(), 12);
        assert!(related.iter().all(|t| t.id != "m0"));
        assert_eq!(related[0].id, "m1");
    }

    #[test]
    fn test_from_records_drops_missing_ids() {
        let records = vec![
            RawRecord::default().with("movie_id", "a").with("title", "Alpha"),
            RawRecord::default().with("title", "No id"),
        ];
        let catalog = CatalogIndex::from_records(&records, CatalogLimits::default());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.titles()[0].title, "Alpha");
    }
}
