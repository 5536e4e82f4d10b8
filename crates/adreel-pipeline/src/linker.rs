//! Replicates uploaded files across the remaining ad accounts.

use adreel_core::models::{AdAccount, MediaProperties, UploadJob, UploadStatus};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;

use crate::orchestrator::{AccountUpload, UploadOrchestrator};
use crate::persistence::LinkPersistenceAdapter;

/// Logical asset a file is linked under, established by the first account's upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub file_name: String,
    pub asset_id: String,
}

#[derive(Clone)]
pub struct FanOutLinker {
    orchestrator: Arc<UploadOrchestrator>,
    persistence: LinkPersistenceAdapter,
    concurrency: usize,
}

impl FanOutLinker {
    pub fn new(
        orchestrator: Arc<UploadOrchestrator>,
        persistence: LinkPersistenceAdapter,
        concurrency: usize,
    ) -> Self {
        Self {
            orchestrator,
            persistence,
            concurrency: concurrency.max(1),
        }
    }

    /// Upload `jobs` to every account in `remaining` and link the results to `assets`.
    ///
    /// Accounts run concurrently up to the configured limit. Statuses come back in
    /// completion order. Repeated account ids are processed once.
    #[tracing::instrument(skip_all, fields(accounts = remaining.len(), files = jobs.len()))]
    pub async fn link_across_accounts(
        &self,
        assets: &[AssetRef],
        remaining: &[AdAccount],
        jobs: &[UploadJob],
        properties: &MediaProperties,
    ) -> Vec<UploadStatus> {
        let mut seen = HashSet::new();
        let accounts: Vec<AdAccount> = remaining
            .iter()
            .filter(|account| seen.insert(account.id.clone()))
            .cloned()
            .collect();

        stream::iter(accounts)
            .map(|account| async move {
                let upload = self.orchestrator.upload_batch(jobs, &account).await;
                self.persist_account(assets, &upload, &account, properties)
                    .await;
                upload.status
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    /// Record a link for every file in `upload` that succeeded. Failures are logged only.
    pub(crate) async fn persist_account(
        &self,
        assets: &[AssetRef],
        upload: &AccountUpload,
        account: &AdAccount,
        properties: &MediaProperties,
    ) {
        for asset in assets {
            let Some(media) = upload.media_for(&asset.file_name) else {
                tracing::debug!(
                    ad_account_id = %account.id,
                    file_name = %asset.file_name,
                    "No uploaded media for file, skipping link"
                );
                continue;
            };

            if let Err(e) = self
                .persistence
                .record_link(&asset.asset_id, media, account, properties)
                .await
            {
                tracing::error!(
                    error = %e,
                    asset_id = %asset.asset_id,
                    ad_account_id = %account.id,
                    "Failed to record media link"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::{PollerConfig, StatusPoller};
    use adreel_db::{MediaAssetStore, MemoryMediaAssetStore};
    use adreel_marketing::test_helpers::MockMarketingApi;
    use adreel_marketing::{MarketingApi, StaticTokenProvider, TokenProvider};
    use std::time::Duration;
    use tempfile::TempDir;

    fn linker(api: &MockMarketingApi, store: &MemoryMediaAssetStore) -> FanOutLinker {
        let api: Arc<dyn MarketingApi> = Arc::new(api.clone());
        let tokens: Arc<dyn TokenProvider> = Arc::new(StaticTokenProvider::new("tok"));
        let poller = StatusPoller::new(
            api.clone(),
            tokens.clone(),
            PollerConfig {
                interval: Duration::from_millis(1),
                max_attempts: 2,
            },
        );
        FanOutLinker::new(
            Arc::new(UploadOrchestrator::new(api, tokens, poller, 2)),
            LinkPersistenceAdapter::new(Arc::new(store.clone())),
            2,
        )
    }

    fn setup(dir: &TempDir) -> (Vec<UploadJob>, Vec<AssetRef>) {
        let path = dir.path().join("file.png");
        std::fs::write(&path, b"png").unwrap();
        (
            vec![UploadJob::new(path, "file.png", "image/png")],
            vec![AssetRef {
                file_name: "file.png".to_string(),
                asset_id: "asset-1".to_string(),
            }],
        )
    }

    #[tokio::test]
    async fn links_every_account_that_succeeds() {
        let dir = TempDir::new().unwrap();
        let (jobs, assets) = setup(&dir);
        let api = MockMarketingApi::new().fail_create_for_account("acc3");
        let store = MemoryMediaAssetStore::new();
        let accounts = vec![
            AdAccount::new("acc2", "B"),
            AdAccount::new("acc3", "C"),
            AdAccount::new("acc4", "D"),
        ];

        let statuses = linker(&api, &store)
            .link_across_accounts(&assets, &accounts, &jobs, &MediaProperties::default())
            .await;

        assert_eq!(statuses.len(), 3);
        let failed = statuses.iter().find(|s| s.ad_account_id == "acc3").unwrap();
        assert_eq!(failed.upload_fails, vec!["file.png".to_string()]);

        let asset = store.get("asset-1").await.unwrap().unwrap();
        let mut linked: Vec<_> = asset
            .linked_ad_accounts
            .iter()
            .map(|l| l.ad_account_id.clone())
            .collect();
        linked.sort();
        assert_eq!(linked, vec!["acc2".to_string(), "acc4".to_string()]);
    }

    #[tokio::test]
    async fn each_account_gets_its_own_remote_media() {
        let dir = TempDir::new().unwrap();
        let (jobs, assets) = setup(&dir);
        let api = MockMarketingApi::new();
        let store = MemoryMediaAssetStore::new();
        let accounts = vec![AdAccount::new("acc2", "B"), AdAccount::new("acc3", "C")];

        linker(&api, &store)
            .link_across_accounts(&assets, &accounts, &jobs, &MediaProperties::default())
            .await;

        let asset = store.get("asset-1").await.unwrap().unwrap();
        for link in &asset.linked_ad_accounts {
            assert_eq!(
                api.media_account(&link.remote_media_id).as_deref(),
                Some(link.ad_account_id.as_str())
            );
        }
    }

    #[tokio::test]
    async fn duplicate_accounts_run_once() {
        let dir = TempDir::new().unwrap();
        let (jobs, assets) = setup(&dir);
        let api = MockMarketingApi::new();
        let store = MemoryMediaAssetStore::new();
        let accounts = vec![AdAccount::new("acc2", "B"), AdAccount::new("acc2", "B")];

        let statuses = linker(&api, &store)
            .link_across_accounts(&assets, &accounts, &jobs, &MediaProperties::default())
            .await;

        assert_eq!(statuses.len(), 1);
        let creates = api
            .calls()
            .iter()
            .filter(|c| c.starts_with("create_media:"))
            .count();
        assert_eq!(creates, 1);
    }

    #[tokio::test]
    async fn unmatched_asset_is_not_linked() {
        let dir = TempDir::new().unwrap();
        let (jobs, _) = setup(&dir);
        let api = MockMarketingApi::new();
        let store = MemoryMediaAssetStore::new();
        let assets = vec![AssetRef {
            file_name: "other.png".to_string(),
            asset_id: "asset-9".to_string(),
        }];

        linker(&api, &store)
            .link_across_accounts(
                &assets,
                &[AdAccount::new("acc2", "B")],
                &jobs,
                &MediaProperties::default(),
            )
            .await;

        assert!(store.is_empty());
    }
}
