use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::catalog::{select_trailer, CatalogApi};
use crate::fallback::{self, PLACEHOLDER_TRAILER};
use crate::models::{Category, CategoryResult, MediaItem, TrailerReference};

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(3);

/// Everything the homepage needs once loading has finished.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeData {
    pub categories: Vec<CategoryResult>,
    pub hero: MediaItem,
}

impl HomeData {
    pub fn all_fallback() -> Self {
        let categories = Category::ALL
            .iter()
            .map(|c| CategoryResult {
                category: *c,
                items: fallback::fallback_items(),
            })
            .collect();
        Self::from_categories(categories)
    }

    fn from_categories(categories: Vec<CategoryResult>) -> Self {
        let hero = categories
            .iter()
            .find(|c| c.category == Category::Trending)
            .and_then(|c| c.items.first().cloned())
            .unwrap_or_else(fallback::hero);
        Self { categories, hero }
    }

    pub fn category(&self, category: Category) -> Option<&CategoryResult> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn find_item(&self, id: i64) -> Option<&MediaItem> {
        self.categories
            .iter()
            .flat_map(|c| c.items.iter())
            .find(|m| m.id == id)
    }
}

/// How a page load settled. Only logged; `HomeData` looks the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Success,
    Timeout,
    Error,
}

#[derive(Clone)]
pub struct Aggregator {
    catalog: Arc<dyn CatalogApi>,
    deadline: Duration,
}

impl Aggregator {
    pub fn new(catalog: Arc<dyn CatalogApi>, deadline: Duration) -> Self {
        Self { catalog, deadline }
    }

    pub async fn load_home(&self) -> HomeData {
        self.load().await.0
    }

    pub async fn load(&self) -> (HomeData, LoadOutcome) {
        let fetches = Category::ALL.iter().map(|c| self.fetch_category(*c));
        // Dropping the joined future on timeout discards any late responses.
        match tokio::time::timeout(self.deadline, join_all(fetches)).await {
            Ok(results) => {
                let any_live = results.iter().any(|(_, live)| *live);
                let categories = results.into_iter().map(|(c, _)| c).collect();
                let outcome = if any_live {
                    LoadOutcome::Success
                } else {
                    LoadOutcome::Error
                };
                info!("Homepage load finished: {:?}", outcome);
                (HomeData::from_categories(categories), outcome)
            }
            Err(_) => {
                warn!(
                    "Catalog deadline of {:?} elapsed, using fallback data",
                    self.deadline
                );
                (HomeData::all_fallback(), LoadOutcome::Timeout)
            }
        }
    }

    /// Returns the category result and whether it holds live data.
    async fn fetch_category(&self, category: Category) -> (CategoryResult, bool) {
        let (items, live) = match self.catalog.fetch_list(category.endpoint()).await {
            Ok(items) if !items.is_empty() => {
                debug!("{} -> {} items", category.label(), items.len());
                (items, true)
            }
            Ok(_) => {
                warn!("Empty result for {}, using fallback", category.label());
                (fallback::fallback_items(), false)
            }
            Err(e) => {
                warn!("Failed to fetch {}: {:#}", category.label(), e);
                (fallback::fallback_items(), false)
            }
        };
        (CategoryResult { category, items }, live)
    }

    pub async fn search(&self, query: &str) -> Vec<MediaItem> {
        match self.catalog.search_movies(query).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Search for '{}' failed, filtering fallback: {:#}", query, e);
                fallback::search_fallback(query)
            }
        }
    }

    pub async fn resolve_trailer(&self, id: i64) -> TrailerReference {
        match self.catalog.fetch_videos(id).await {
            Ok(videos) => select_trailer(&videos).unwrap_or_else(|| {
                debug!("No YouTube trailer for {}, using placeholder", id);
                TrailerReference(PLACEHOLDER_TRAILER.to_string())
            }),
            Err(e) => {
                warn!("Failed to fetch videos for {}: {:#}", id, e);
                TrailerReference(PLACEHOLDER_TRAILER.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Video;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;

    enum Reply {
        Items(Vec<MediaItem>),
        Fail,
    }

    struct FakeCatalog {
        lists: HashMap<&'static str, Reply>,
        delay: Duration,
        videos: Option<Vec<Video>>,
    }

    impl FakeCatalog {
        fn new() -> Self {
            Self {
                lists: HashMap::new(),
                delay: Duration::ZERO,
                videos: None,
            }
        }
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn fetch_list(&self, endpoint: &str) -> Result<Vec<MediaItem>> {
            tokio::time::sleep(self.delay).await;
            match self.lists.get(endpoint) {
                Some(Reply::Items(items)) => Ok(items.clone()),
                Some(Reply::Fail) | None => Err(anyhow!("unreachable catalog")),
            }
        }

        async fn search_movies(&self, _query: &str) -> Result<Vec<MediaItem>> {
            Err(anyhow!("offline"))
        }

        async fn fetch_videos(&self, _id: i64) -> Result<Vec<Video>> {
            self.videos.clone().ok_or_else(|| anyhow!("offline"))
        }
    }

    fn live(id: i64, title: &str) -> MediaItem {
        MediaItem {
            id,
            title: Some(title.to_string()),
            ..fallback::hero()
        }
    }

    #[tokio::test]
    async fn empty_and_failed_categories_use_fallback() {
        let mut catalog = FakeCatalog::new();
        catalog
            .lists
            .insert(Category::Trending.endpoint(), Reply::Items(vec![]));
        catalog
            .lists
            .insert(Category::Popular.endpoint(), Reply::Fail);
        let aggregator = Aggregator::new(Arc::new(catalog), DEFAULT_DEADLINE);

        let (home, outcome) = aggregator.load().await;
        assert_eq!(outcome, LoadOutcome::Error);
        for result in &home.categories {
            assert_eq!(result.items, fallback::fallback_items());
        }
        assert_eq!(home.hero, fallback::hero());
    }

    #[tokio::test]
    async fn live_trending_sets_hero() {
        let mut catalog = FakeCatalog::new();
        catalog.lists.insert(
            Category::Trending.endpoint(),
            Reply::Items(vec![live(900, "Live One"), live(901, "Live Two")]),
        );
        let aggregator = Aggregator::new(Arc::new(catalog), DEFAULT_DEADLINE);

        let (home, outcome) = aggregator.load().await;
        assert_eq!(outcome, LoadOutcome::Success);
        assert_eq!(home.hero.id, 900);
        let popular = home.category(Category::Popular).unwrap();
        assert_eq!(popular.items, fallback::fallback_items());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_discards_late_responses() {
        let mut catalog = FakeCatalog::new();
        for c in Category::ALL {
            catalog
                .lists
                .insert(c.endpoint(), Reply::Items(vec![live(42, "Too Late")]));
        }
        catalog.delay = Duration::from_secs(5);
        let aggregator = Aggregator::new(Arc::new(catalog), DEFAULT_DEADLINE);

        let (home, outcome) = aggregator.load().await;
        assert_eq!(outcome, LoadOutcome::Timeout);
        assert_eq!(home, HomeData::all_fallback());
    }

    #[tokio::test]
    async fn trailer_falls_back_to_placeholder() {
        let aggregator = Aggregator::new(Arc::new(FakeCatalog::new()), DEFAULT_DEADLINE);
        assert_eq!(aggregator.resolve_trailer(1).await.key(), PLACEHOLDER_TRAILER);

        let mut catalog = FakeCatalog::new();
        catalog.videos = Some(vec![Video {
            site: "YouTube".to_string(),
            video_type: "Teaser".to_string(),
            key: "teaser".to_string(),
        }]);
        let aggregator = Aggregator::new(Arc::new(catalog), DEFAULT_DEADLINE);
        assert_eq!(aggregator.resolve_trailer(1).await.key(), PLACEHOLDER_TRAILER);
    }

    #[tokio::test]
    async fn failed_search_filters_fallback() {
        let aggregator = Aggregator::new(Arc::new(FakeCatalog::new()), DEFAULT_DEADLINE);
        let hits = aggregator.search("dragon").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 4);
    }
}
