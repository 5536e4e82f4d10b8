//! Records which ad accounts a media asset has been linked to.

use adreel_core::models::{AdAccount, LinkedAdAccount, MediaAsset, MediaProperties};
use adreel_core::AppError;
use adreel_db::{LinkOutcome, MediaAssetStore};
use adreel_marketing::RemoteMedia;
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct LinkPersistenceAdapter {
    store: Arc<dyn MediaAssetStore>,
}

impl LinkPersistenceAdapter {
    pub fn new(store: Arc<dyn MediaAssetStore>) -> Self {
        Self { store }
    }

    /// Link `ad_account` to the asset `asset_id`, creating the asset from `descriptor` when
    /// it does not exist yet. `descriptor` is the media the platform finalized for this
    /// account; `asset_id` is the media id from the first account's upload.
    #[tracing::instrument(skip(self, descriptor, ad_account, properties), fields(asset_id = %asset_id, ad_account_id = %ad_account.id, remote_media_id = %descriptor.id))]
    pub async fn record_link(
        &self,
        asset_id: &str,
        descriptor: &RemoteMedia,
        ad_account: &AdAccount,
        properties: &MediaProperties,
    ) -> Result<LinkOutcome, AppError> {
        let link = LinkedAdAccount {
            ad_account_id: ad_account.id.clone(),
            ad_account_name: ad_account.name.clone(),
            remote_media_id: descriptor.id.clone(),
        };

        if self.store.get(asset_id).await?.is_some() {
            let outcome = self.store.append_link(asset_id, &link).await?;
            if outcome != LinkOutcome::Missing {
                tracing::debug!(outcome = ?outcome, "Link recorded on existing asset");
                return Ok(outcome);
            }
        }

        let asset = MediaAsset {
            id: asset_id.to_string(),
            name: descriptor.name.clone(),
            media_type: descriptor.media_type.clone().unwrap_or_default(),
            status: descriptor.media_status.clone().unwrap_or_default(),
            download_link: descriptor.download_link.clone(),
            created_at: descriptor.created_at.clone(),
            created_on: Utc::now(),
            media_view: properties.media_view().map(str::to_string),
            linked_ad_accounts: vec![link],
        };
        let outcome = self.store.create_or_append(&asset).await?;
        tracing::debug!(outcome = ?outcome, "Link recorded");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adreel_core::models::MEDIA_VIEW_PROPERTY;
    use adreel_db::MemoryMediaAssetStore;

    fn descriptor(id: &str) -> RemoteMedia {
        RemoteMedia {
            id: id.to_string(),
            name: "file.png".to_string(),
            media_type: Some("IMAGE".to_string()),
            media_status: Some("READY".to_string()),
            download_link: Some(format!("https://cdn.example.test/{}", id)),
            created_at: Some("2025-01-01T00:00:00.000Z".to_string()),
            ..RemoteMedia::default()
        }
    }

    fn properties() -> MediaProperties {
        let mut properties = MediaProperties::default();
        properties.insert(MEDIA_VIEW_PROPERTY, "grid");
        properties
    }

    #[tokio::test]
    async fn first_link_creates_asset_from_descriptor() {
        let store = MemoryMediaAssetStore::new();
        let adapter = LinkPersistenceAdapter::new(Arc::new(store.clone()));

        let outcome = adapter
            .record_link("m-1", &descriptor("m-1"), &AdAccount::new("acc1", "Brand A"), &properties())
            .await
            .unwrap();

        assert_eq!(outcome, LinkOutcome::Created);
        let asset = store.get("m-1").await.unwrap().unwrap();
        assert_eq!(asset.name, "file.png");
        assert_eq!(asset.media_type, "IMAGE");
        assert_eq!(asset.media_view.as_deref(), Some("grid"));
        assert_eq!(asset.linked_ad_accounts.len(), 1);
        assert_eq!(asset.linked_ad_accounts[0].ad_account_name, "Brand A");
    }

    #[tokio::test]
    async fn later_links_append_with_their_own_remote_id() {
        let store = MemoryMediaAssetStore::new();
        let adapter = LinkPersistenceAdapter::new(Arc::new(store.clone()));
        let props = properties();

        adapter
            .record_link("m-1", &descriptor("m-1"), &AdAccount::new("acc1", "A"), &props)
            .await
            .unwrap();
        let outcome = adapter
            .record_link("m-1", &descriptor("m-7"), &AdAccount::new("acc2", "B"), &props)
            .await
            .unwrap();

        assert_eq!(outcome, LinkOutcome::Appended);
        let asset = store.get("m-1").await.unwrap().unwrap();
        assert_eq!(asset.linked_ad_accounts[1].ad_account_id, "acc2");
        assert_eq!(asset.linked_ad_accounts[1].remote_media_id, "m-7");
    }

    #[tokio::test]
    async fn relinking_the_same_account_is_a_no_op() {
        let store = MemoryMediaAssetStore::new();
        let adapter = LinkPersistenceAdapter::new(Arc::new(store.clone()));
        let props = properties();
        let account = AdAccount::new("acc1", "A");

        adapter
            .record_link("m-1", &descriptor("m-1"), &account, &props)
            .await
            .unwrap();
        let outcome = adapter
            .record_link("m-1", &descriptor("m-9"), &account, &props)
            .await
            .unwrap();

        assert_eq!(outcome, LinkOutcome::AlreadyLinked);
        assert_eq!(store.get("m-1").await.unwrap().unwrap().linked_ad_accounts.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_first_writers_keep_both_links() {
        let store = MemoryMediaAssetStore::new();
        let adapter = LinkPersistenceAdapter::new(Arc::new(store.clone()));
        let props = properties();
        let (acc1, acc2) = (AdAccount::new("acc1", "A"), AdAccount::new("acc2", "B"));
        let (d1, d2) = (descriptor("m-1"), descriptor("m-2"));

        let (a, b) = tokio::join!(
            adapter.record_link("m-1", &d1, &acc1, &props),
            adapter.record_link("m-1", &d2, &acc2, &props),
        );
        a.unwrap();
        b.unwrap();

        let asset = store.get("m-1").await.unwrap().unwrap();
        let mut accounts: Vec<_> = asset
            .linked_ad_accounts
            .iter()
            .map(|l| l.ad_account_id.as_str())
            .collect();
        accounts.sort();
        assert_eq!(accounts, vec!["acc1", "acc2"]);
    }
}
