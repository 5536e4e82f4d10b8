//! Entry points for uploading new media and linking stored media to more ad accounts.

use adreel_core::models::{AdAccount, MediaAsset, MediaProperties, UploadJob, UploadStatus};
use adreel_core::{AppError, PipelineConfig};
use adreel_db::MediaAssetStore;
use adreel_marketing::{MarketingApi, TokenProvider};
use std::sync::Arc;

use crate::fetch::MediaFetcher;
use crate::linker::{AssetRef, FanOutLinker};
use crate::orchestrator::UploadOrchestrator;
use crate::persistence::LinkPersistenceAdapter;
use crate::poller::{PollerConfig, StatusPoller};
use crate::scratch::ScratchDir;

#[derive(Clone)]
pub struct MediaPipeline {
    api: Arc<dyn MarketingApi>,
    tokens: Arc<dyn TokenProvider>,
    store: Arc<dyn MediaAssetStore>,
    fetcher: Arc<dyn MediaFetcher>,
    orchestrator: Arc<UploadOrchestrator>,
    linker: FanOutLinker,
    scratch: ScratchDir,
    organization_id: String,
}

impl MediaPipeline {
    pub fn new(
        api: Arc<dyn MarketingApi>,
        tokens: Arc<dyn TokenProvider>,
        store: Arc<dyn MediaAssetStore>,
        fetcher: Arc<dyn MediaFetcher>,
        scratch: ScratchDir,
        config: &PipelineConfig,
        organization_id: impl Into<String>,
    ) -> Self {
        let poller = StatusPoller::new(api.clone(), tokens.clone(), PollerConfig::from(config));
        let orchestrator = Arc::new(UploadOrchestrator::new(
            api.clone(),
            tokens.clone(),
            poller,
            config.upload_concurrency,
        ));
        let linker = FanOutLinker::new(
            orchestrator.clone(),
            LinkPersistenceAdapter::new(store.clone()),
            config.fan_out_concurrency,
        );

        Self {
            api,
            tokens,
            store,
            fetcher,
            orchestrator,
            linker,
            scratch,
            organization_id: organization_id.into(),
        }
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    /// Upload `jobs` to the first account, record the result, then fan out to the rest.
    ///
    /// The first account's status is always first in the returned list; the others follow
    /// in completion order. Nothing fans out when no file reached READY on the first account.
    #[tracing::instrument(skip_all, fields(files = jobs.len(), accounts = ad_accounts.len()))]
    pub async fn initiate_upload(
        &self,
        jobs: &[UploadJob],
        ad_accounts: &[AdAccount],
        properties: &MediaProperties,
    ) -> Vec<UploadStatus> {
        let Some((first, rest)) = ad_accounts.split_first() else {
            tracing::debug!("No ad accounts requested, nothing to upload");
            return Vec::new();
        };

        let first_upload = self.orchestrator.upload_batch(jobs, first).await;
        let assets: Vec<AssetRef> = first_upload
            .uploaded
            .iter()
            .map(|u| AssetRef {
                file_name: u.file_name.clone(),
                asset_id: u.media.id.clone(),
            })
            .collect();
        self.linker
            .persist_account(&assets, &first_upload, first, properties)
            .await;

        let mut statuses = vec![first_upload.status];
        if assets.is_empty() {
            return statuses;
        }

        let remaining: Vec<AdAccount> = rest
            .iter()
            .filter(|account| account.id != first.id)
            .cloned()
            .collect();
        if !remaining.is_empty() {
            statuses.extend(
                self.linker
                    .link_across_accounts(&assets, &remaining, jobs, properties)
                    .await,
            );
        }
        statuses
    }

    /// Upload a stored asset again to each of `ad_accounts` and link the new remote media.
    ///
    /// Returns an empty list when no asset exists for `media_id`.
    #[tracing::instrument(skip(self, ad_accounts), fields(media_id = %media_id, accounts = ad_accounts.len()))]
    pub async fn link_existing(
        &self,
        media_id: &str,
        ad_accounts: &[AdAccount],
    ) -> Result<Vec<UploadStatus>, AppError> {
        let Some(asset) = self.store.get(media_id).await? else {
            tracing::info!(media_id = %media_id, "Media asset not found, nothing to link");
            return Ok(Vec::new());
        };
        let Some(download_link) = asset.download_link.as_deref() else {
            return Err(AppError::BadRequest(format!(
                "Media {} has no download link",
                media_id
            )));
        };

        let scratch_path = self.scratch.allocate(&asset.name);
        let fetched = self.fetcher.fetch(download_link, &scratch_path).await;
        if let Err(e) = fetched {
            self.scratch.remove_later(vec![scratch_path]);
            return Err(AppError::RemoteService(format!(
                "Failed to download media {}: {}",
                media_id, e
            )));
        }

        let mime_type = mime_guess::from_path(&asset.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let jobs = [UploadJob::new(scratch_path.clone(), asset.name.clone(), mime_type)];
        let assets = [AssetRef {
            file_name: asset.name.clone(),
            asset_id: asset.id.clone(),
        }];
        let properties = properties_of(&asset);

        let statuses = self
            .linker
            .link_across_accounts(&assets, ad_accounts, &jobs, &properties)
            .await;

        self.scratch.remove_later(vec![scratch_path]);
        Ok(statuses)
    }

    pub async fn list_by_view(&self, media_view: &str) -> Result<Vec<MediaAsset>, AppError> {
        self.store.list_by_view(media_view).await
    }

    #[tracing::instrument(skip(self), fields(organization_id = %self.organization_id))]
    pub async fn list_ad_accounts(&self) -> Result<Vec<AdAccount>, AppError> {
        let token = self.tokens.access_token().await?;
        let accounts = self
            .api
            .list_ad_accounts(&token, &self.organization_id)
            .await?;
        Ok(accounts)
    }
}

fn properties_of(asset: &MediaAsset) -> MediaProperties {
    let mut properties = MediaProperties::default();
    if let Some(view) = &asset.media_view {
        properties.insert(adreel_core::models::MEDIA_VIEW_PROPERTY, view.clone());
    }
    properties
}
