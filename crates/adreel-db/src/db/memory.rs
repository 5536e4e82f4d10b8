//! In-process stores
//!
//! Same contracts as the PostgreSQL repositories, backed by a mutex-guarded map. Used by
//! tests and by `RECORD_STORE=memory` local runs.

use adreel_core::models::{AccessToken, LinkedAdAccount, MediaAsset};
use adreel_core::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{LinkOutcome, MediaAssetStore, TokenStore};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex
        .lock()
        .map_err(|_| AppError::Internal("in-memory store lock poisoned".to_string()))
}

#[derive(Clone, Default)]
pub struct MemoryMediaAssetStore {
    assets: Arc<Mutex<HashMap<String, MediaAsset>>>,
}

impl MemoryMediaAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an asset directly, replacing any record with the same id.
    pub fn insert(&self, asset: MediaAsset) -> Result<(), AppError> {
        lock(&self.assets)?.insert(asset.id.clone(), asset);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.assets.lock().map(|assets| assets.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MediaAssetStore for MemoryMediaAssetStore {
    async fn get(&self, id: &str) -> Result<Option<MediaAsset>, AppError> {
        Ok(lock(&self.assets)?.get(id).cloned())
    }

    async fn append_link(&self, id: &str, link: &LinkedAdAccount) -> Result<LinkOutcome, AppError> {
        let mut assets = lock(&self.assets)?;
        let Some(asset) = assets.get_mut(id) else {
            return Ok(LinkOutcome::Missing);
        };
        if asset.push_link(link.clone()) {
            Ok(LinkOutcome::Appended)
        } else {
            Ok(LinkOutcome::AlreadyLinked)
        }
    }

    async fn create_or_append(&self, asset: &MediaAsset) -> Result<LinkOutcome, AppError> {
        let mut assets = lock(&self.assets)?;
        match assets.get_mut(&asset.id) {
            Some(existing) => {
                let mut changed = false;
                for link in &asset.linked_ad_accounts {
                    changed |= existing.push_link(link.clone());
                }
                Ok(if changed {
                    LinkOutcome::Appended
                } else {
                    LinkOutcome::AlreadyLinked
                })
            }
            None => {
                assets.insert(asset.id.clone(), asset.clone());
                Ok(LinkOutcome::Created)
            }
        }
    }

    async fn list_by_view(&self, media_view: &str) -> Result<Vec<MediaAsset>, AppError> {
        let mut matching: Vec<MediaAsset> = lock(&self.assets)?
            .values()
            .filter(|asset| asset.media_view.as_deref() == Some(media_view))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_on.cmp(&a.created_on));
        Ok(matching)
    }
}

#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<AccessToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AccessToken) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token))),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get_token(&self) -> Result<Option<AccessToken>, AppError> {
        Ok(lock(&self.token)?.clone())
    }

    async fn save_token(&self, token: &AccessToken) -> Result<(), AppError> {
        *lock(&self.token)? = Some(token.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn link(account: &str, remote: &str) -> LinkedAdAccount {
        LinkedAdAccount {
            ad_account_id: account.to_string(),
            ad_account_name: String::new(),
            remote_media_id: remote.to_string(),
        }
    }

    fn asset(id: &str, view: &str, links: Vec<LinkedAdAccount>) -> MediaAsset {
        MediaAsset {
            id: id.to_string(),
            name: format!("{}.png", id),
            media_type: "IMAGE".to_string(),
            status: "READY".to_string(),
            download_link: None,
            created_at: None,
            created_on: Utc::now(),
            media_view: Some(view.to_string()),
            linked_ad_accounts: links,
        }
    }

    #[tokio::test]
    async fn append_link_reports_each_outcome() {
        let store = MemoryMediaAssetStore::new();
        assert_eq!(
            store.append_link("m-1", &link("acc1", "m-1")).await.unwrap(),
            LinkOutcome::Missing
        );

        store.insert(asset("m-1", "grid", vec![link("acc1", "m-1")])).unwrap();
        assert_eq!(
            store.append_link("m-1", &link("acc2", "m-2")).await.unwrap(),
            LinkOutcome::Appended
        );
        assert_eq!(
            store.append_link("m-1", &link("acc2", "m-3")).await.unwrap(),
            LinkOutcome::AlreadyLinked
        );

        let stored = store.get("m-1").await.unwrap().unwrap();
        assert_eq!(stored.linked_ad_accounts.len(), 2);
        assert_eq!(stored.linked_ad_accounts[1].remote_media_id, "m-2");
    }

    #[tokio::test]
    async fn concurrent_first_writers_converge() {
        let store = MemoryMediaAssetStore::new();
        let writes = (0..8).map(|i| {
            let store = store.clone();
            async move {
                let account = format!("acc{}", i);
                store
                    .create_or_append(&asset("m-1", "grid", vec![link(&account, "r")]))
                    .await
            }
        });
        let outcomes = futures::future::join_all(writes).await;

        let created = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(LinkOutcome::Created)))
            .count();
        assert_eq!(created, 1, "exactly one writer creates the record");
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("m-1").await.unwrap().unwrap().linked_ad_accounts.len(),
            8
        );
    }

    #[tokio::test]
    async fn list_by_view_filters_on_view() {
        let store = MemoryMediaAssetStore::new();
        store.insert(asset("m-1", "grid", vec![])).unwrap();
        store.insert(asset("m-2", "story", vec![])).unwrap();

        let grid = store.list_by_view("grid").await.unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].id, "m-1");
        assert!(store.list_by_view("feed").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn token_store_round_trips_latest_token() {
        let store = MemoryTokenStore::new();
        assert!(store.get_token().await.unwrap().is_none());

        let now = Utc::now();
        let token = AccessToken {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            token_type: Some("Bearer".to_string()),
            scope: None,
            created_at: now,
            expires_at: now + Duration::seconds(1800),
        };
        store.save_token(&token).await.unwrap();
        assert_eq!(store.get_token().await.unwrap(), Some(token));
    }
}
