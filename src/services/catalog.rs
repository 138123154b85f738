use futures::future;
use futures::stream::{self, Stream, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::api::{ApiClient, ApiError};
use super::cache::{CacheStore, read_cached, write_cached};
use super::cache_keys::CacheKey;
use crate::constants::{MOVIES_PATH, RECENTLY_ADDED_LIMIT, RECENTLY_ADDED_TITLE};
use crate::models::{ContentRow, MovieRecord, MovieView};

/// One emission of a catalog load
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogLoad<T> {
    /// From the client cache, before the network answered
    Cached(T),
    /// From the backend; supersedes anything emitted before
    Fresh(T),
    /// Backend failed; cached data if any, else empty
    Fallback(T),
}

impl<T> CatalogLoad<T> {
    pub fn into_inner(self) -> T {
        match self {
            CatalogLoad::Cached(value) | CatalogLoad::Fresh(value) | CatalogLoad::Fallback(value) => {
                value
            }
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, CatalogLoad::Fresh(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CatalogLoad<U> {
        match self {
            CatalogLoad::Cached(value) => CatalogLoad::Cached(f(value)),
            CatalogLoad::Fresh(value) => CatalogLoad::Fresh(f(value)),
            CatalogLoad::Fallback(value) => CatalogLoad::Fallback(f(value)),
        }
    }
}

/// Catalog reads for the dashboard and movies pages
pub struct CatalogService {
    api: ApiClient,
    cache: Arc<dyn CacheStore>,
}

impl CatalogService {
    pub fn new(api: ApiClient, cache: Arc<dyn CacheStore>) -> Self {
        Self { api, cache }
    }

    /// Dashboard rows: cached rows first when present, then the fresh result.
    pub fn dashboard(&self) -> impl Stream<Item = CatalogLoad<Vec<ContentRow>>> + '_ {
        self.load_views(CacheKey::DashboardMovies)
            .map(|load| load.map(|views| build_rows(&views)))
    }

    /// Full catalog: cached list first when present, then the fresh result.
    pub fn movies(&self) -> impl Stream<Item = CatalogLoad<Vec<MovieView>>> + '_ {
        self.load_views(CacheKey::AllMovies)
    }

    fn load_views(&self, key: CacheKey) -> impl Stream<Item = CatalogLoad<Vec<MovieView>>> + '_ {
        let cache = self.cache.as_ref();

        let cached = stream::once(read_cached::<Vec<MovieView>>(cache, key))
            .filter_map(|views| future::ready(views.map(CatalogLoad::Cached)));

        let fresh = stream::once(async move {
            match self.fetch_views(key).await {
                Ok(views) => CatalogLoad::Fresh(views),
                Err(e) => {
                    warn!("Failed to load {}: {}, using cached data", key, e);
                    let views = read_cached::<Vec<MovieView>>(cache, key)
                        .await
                        .unwrap_or_default();
                    CatalogLoad::Fallback(views)
                }
            }
        });

        cached.chain(fresh)
    }

    async fn fetch_views(&self, key: CacheKey) -> Result<Vec<MovieView>, ApiError> {
        let records: Vec<MovieRecord> = self.api.get_json(MOVIES_PATH).await?;
        let views: Vec<MovieView> = records.into_iter().map(MovieView::from).collect();
        info!("Loaded {} titles for {}", views.len(), key);

        write_cached(self.cache.as_ref(), key, &views).await;
        Ok(views)
    }
}

/// "Recently Added" (newest first) followed by one row per genre, alphabetically.
pub fn build_rows(views: &[MovieView]) -> Vec<ContentRow> {
    let mut rows = Vec::new();

    let mut recent: Vec<&MovieView> = views.iter().filter(|v| v.added_at.is_some()).collect();
    recent.sort_by(|a, b| b.added_at.cmp(&a.added_at));
    if !recent.is_empty() {
        rows.push(ContentRow {
            title: RECENTLY_ADDED_TITLE.to_string(),
            items: recent
                .into_iter()
                .take(RECENTLY_ADDED_LIMIT)
                .cloned()
                .collect(),
        });
    }

    let mut by_genre: BTreeMap<&str, Vec<MovieView>> = BTreeMap::new();
    for view in views {
        for genre in &view.genres {
            by_genre.entry(genre.as_str()).or_default().push(view.clone());
        }
    }
    rows.extend(by_genre.into_iter().map(|(genre, items)| ContentRow {
        title: genre.to_string(),
        items,
    }));

    rows
}
