use mflix_models::{HistoryEntry, Title};
use serde::Serialize;

use crate::catalog::{CatalogIndex, GenreTag};
use crate::watchlist::WatchlistStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RailKind {
    ContinueWatching,
    MyList,
    Trending,
    Latest,
    Bollywood,
    Action,
    Comedy,
    HorrorThriller,
    Romance,
    UltraHd,
}

impl RailKind {
    pub fn heading(&self) -> &'static str {
        match self {
            RailKind::ContinueWatching => "Continue Watching",
            RailKind::MyList => "My List",
            RailKind::Trending => "Trending Now",
            RailKind::Latest => "Latest Releases",
            RailKind::Bollywood => "Bollywood",
            RailKind::Action => "Action",
            RailKind::Comedy => "Comedy",
            RailKind::HorrorThriller => "Horror & Thriller",
            RailKind::Romance => "Romance",
            RailKind::UltraHd => "4K Ultra HD",
        }
    }

    /// Browse tag behind the rail's "see all", if it has one.
    pub fn browse_tag(&self) -> Option<GenreTag> {
        match self {
            RailKind::ContinueWatching | RailKind::MyList => None,
            RailKind::Trending => Some(GenreTag::Trending),
            RailKind::Latest => Some(GenreTag::Latest),
            RailKind::Bollywood => Some(GenreTag::Bollywood),
            RailKind::Action => Some(GenreTag::parse("action")),
            RailKind::Comedy => Some(GenreTag::parse("comedy")),
            RailKind::HorrorThriller => Some(GenreTag::parse("horror")),
            RailKind::Romance => Some(GenreTag::parse("romance")),
            RailKind::UltraHd => Some(GenreTag::UltraHd),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RailItem<'a> {
    pub title: &'a Title,
    /// Watched percent, only on the Continue Watching rail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rail<'a> {
    pub kind: RailKind,
    pub heading: &'static str,
    pub items: Vec<RailItem<'a>>,
}

impl<'a> Rail<'a> {
    fn of_titles(kind: RailKind, titles: Vec<&'a Title>) -> Self {
        Self {
            kind,
            heading: kind.heading(),
            items: titles
                .into_iter()
                .map(|title| RailItem { title, progress: None })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeFeed<'a> {
    pub featured: Vec<&'a Title>,
    pub rails: Vec<Rail<'a>>,
}

/// Compose the home screen. Empty rails are left out, except Latest Releases
/// which is always present.
pub fn build_home_feed<'a>(
    catalog: &'a CatalogIndex,
    watchlist: &WatchlistStore,
    history: &'a [HistoryEntry],
) -> HomeFeed<'a> {
    let continue_watching = Rail {
        kind: RailKind::ContinueWatching,
        heading: RailKind::ContinueWatching.heading(),
        items: history
            .iter()
            .map(|entry| RailItem {
                title: &entry.title,
                progress: Some(entry.progress_percent()),
            })
            .collect(),
    };

    let candidates = vec![
        continue_watching,
        Rail::of_titles(RailKind::MyList, watchlist.titles(catalog)),
        Rail::of_titles(RailKind::Trending, catalog.trending_row()),
        Rail::of_titles(RailKind::Latest, catalog.latest_row()),
        Rail::of_titles(RailKind::Bollywood, catalog.industry_row("bollywood")),
        Rail::of_titles(RailKind::Action, catalog.genre_row(&["action"])),
        Rail::of_titles(RailKind::Comedy, catalog.genre_row(&["comedy"])),
        Rail::of_titles(RailKind::HorrorThriller, catalog.genre_row(&["horror", "thriller"])),
        Rail::of_titles(RailKind::Romance, catalog.genre_row(&["romance"])),
        Rail::of_titles(RailKind::UltraHd, catalog.ultra_hd_row()),
    ];

    HomeFeed {
        featured: catalog.featured(),
        rails: candidates
            .into_iter()
            .filter(|rail| rail.kind == RailKind::Latest || !rail.items.is_empty())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogLimits;
    use crate::history::WatchHistoryStore;
    use crate::storage::MemoryStorage;
    use crate::test_support::title;
    use std::sync::Arc;

    fn kinds(feed: &HomeFeed<'_>) -> Vec<RailKind> {
        feed.rails.iter().map(|rail| rail.kind).collect()
    }

    #[test]
    fn test_empty_catalog_keeps_latest_rail() {
        let catalog = CatalogIndex::default();
        let watchlist = WatchlistStore::load(Arc::new(MemoryStorage::new()));

        let feed = build_home_feed(&catalog, &watchlist, &[]);
        assert_eq!(kinds(&feed), vec![RailKind::Latest]);
        assert!(feed.rails[0].items.is_empty());
        assert!(feed.featured.is_empty());
    }

    #[test]
    fn test_rail_order_and_content() {
        let mut action = title("1", "Boom");
        action.genres = vec!["Action".to_string()];
        action.is_trending = true;
        action.year = 2021;
        let mut scary = title("2", "Boo");
        scary.genres = vec!["Thriller".to_string()];
        scary.industry = Some("Bollywood".to_string());
        scary.year = 2023;
        let mut uhd = title("3", "Crisp");
        uhd.quality_label = "4K".to_string();

        let catalog = CatalogIndex::new(vec![action, scary, uhd], CatalogLimits::default());
        let storage = Arc::new(MemoryStorage::new());
        let mut watchlist = WatchlistStore::load(storage.clone());
        watchlist.toggle(catalog.get("3").unwrap());
        let mut history = WatchHistoryStore::load(storage);
        history.save_progress(catalog.get("2").unwrap(), 30.0, 120.0);

        let feed = build_home_feed(&catalog, &watchlist, history.entries());
        assert_eq!(
            kinds(&feed),
            vec![
                RailKind::ContinueWatching,
                RailKind::MyList,
                RailKind::Trending,
                RailKind::Latest,
                RailKind::Bollywood,
                RailKind::Action,
                RailKind::HorrorThriller,
                RailKind::UltraHd,
            ]
        );

        let continue_watching = &feed.rails[0];
        assert_eq!(continue_watching.items[0].title.id, "2");
        assert_eq!(continue_watching.items[0].progress, Some(25.0));
        assert!(feed.rails[1].items.iter().all(|item| item.progress.is_none()));

        let latest: Vec<_> = feed.rails[3].items.iter().map(|item| item.title.id.as_str()).collect();
        assert_eq!(latest, vec!["2", "1", "3"]);
        assert_eq!(feed.featured.len(), 3);
    }

    #[test]
    fn test_browse_tags() {
        assert_eq!(RailKind::HorrorThriller.browse_tag(), Some(GenreTag::Genre("horror".to_string())));
        assert_eq!(RailKind::UltraHd.browse_tag(), Some(GenreTag::UltraHd));
        assert_eq!(RailKind::MyList.browse_tag(), None);
        assert_eq!(RailKind::Latest.heading(), "Latest Releases");
    }
}
