use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::api::{ApiClient, ApiError};
use super::cache::{CacheStore, read_cached, write_cached};
use super::cache_keys::CacheKey;
use crate::constants::MY_LIST_PATH;
use crate::models::MovieRecord;

/// A local list transition paired with its compensation.
#[derive(Debug, Clone, PartialEq)]
enum ListEdit {
    Add(String),
    Remove { id: String, index: usize },
}

impl ListEdit {
    fn apply(&self, ids: &mut Vec<String>) {
        match self {
            ListEdit::Add(id) => ids.push(id.clone()),
            ListEdit::Remove { index, .. } => {
                ids.remove(*index);
            }
        }
    }

    fn undo(&self, ids: &mut Vec<String>) {
        match self {
            ListEdit::Add(id) => ids.retain(|existing| existing != id),
            ListEdit::Remove { id, index } => {
                if !ids.contains(id) {
                    ids.insert((*index).min(ids.len()), id.clone());
                }
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddRequest<'a> {
    movie_id: &'a str,
}

/// The user's saved titles, updated optimistically.
pub struct MyList {
    api: ApiClient,
    cache: Arc<dyn CacheStore>,
    ids: RwLock<Vec<String>>,
}

impl MyList {
    pub fn new(api: ApiClient, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            api,
            cache,
            ids: RwLock::new(Vec::new()),
        }
    }

    /// Seed the local list from the client cache.
    pub async fn restore(&self) {
        if let Some(ids) = read_cached::<Vec<String>>(self.cache.as_ref(), CacheKey::MyList).await {
            debug!("Restored {} list entries from cache", ids.len());
            *self.ids.write().await = ids;
        }
    }

    pub async fn contains(&self, movie_id: &str) -> bool {
        self.ids.read().await.iter().any(|id| id == movie_id)
    }

    pub async fn items(&self) -> Vec<String> {
        self.ids.read().await.clone()
    }

    /// Add immediately, then confirm with the backend. Undone on failure.
    pub async fn add(&self, movie_id: &str) -> Result<(), ApiError> {
        let edit = ListEdit::Add(movie_id.to_string());
        if !self.apply(&edit).await {
            return Ok(());
        }

        let result = self
            .api
            .post(MY_LIST_PATH, &AddRequest { movie_id })
            .await;
        self.settle(edit, result).await
    }

    /// Remove immediately, then confirm with the backend. Undone on failure.
    pub async fn remove(&self, movie_id: &str) -> Result<(), ApiError> {
        let index = {
            let ids = self.ids.read().await;
            ids.iter().position(|id| id == movie_id)
        };
        let Some(index) = index else {
            return Ok(());
        };

        let edit = ListEdit::Remove {
            id: movie_id.to_string(),
            index,
        };
        if !self.apply(&edit).await {
            return Ok(());
        }

        let result = self
            .api
            .delete(&format!("{}/{}", MY_LIST_PATH, movie_id))
            .await;
        self.settle(edit, result).await
    }

    /// Replace the local list with the server's. On failure the local list stays.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        match self.api.get_json::<Vec<MovieRecord>>(MY_LIST_PATH).await {
            Ok(records) => {
                let ids: Vec<String> = records.into_iter().map(|record| record.id).collect();
                info!("My list refreshed: {} entries", ids.len());
                *self.ids.write().await = ids;
                self.persist().await;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to refresh my list, keeping local copy: {}", e);
                Err(e)
            }
        }
    }

    /// Returns false when the edit is a no-op against the current list.
    async fn apply(&self, edit: &ListEdit) -> bool {
        {
            let mut ids = self.ids.write().await;
            match edit {
                ListEdit::Add(id) if ids.contains(id) => return false,
                ListEdit::Remove { id, index } if ids.get(*index) != Some(id) => return false,
                _ => edit.apply(&mut ids),
            }
        }
        self.persist().await;
        true
    }

    async fn settle(&self, edit: ListEdit, result: Result<(), ApiError>) -> Result<(), ApiError> {
        if let Err(e) = &result {
            warn!("List update {:?} failed, reverting: {}", edit, e);
            edit.undo(&mut *self.ids.write().await);
            self.persist().await;
        }
        result
    }

    async fn persist(&self) {
        let ids = self.items().await;
        write_cached(self.cache.as_ref(), CacheKey::MyList, &ids).await;
    }
}
