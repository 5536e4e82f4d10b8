//! Service initialization: record stores, marketing client, token provider and pipeline

use crate::state::AppState;
use adreel_core::{Config, FileValidator, RecordStore};
use adreel_db::{
    MediaAssetRepository, MediaAssetStore, MemoryMediaAssetStore, MemoryTokenStore,
    TokenRepository, TokenStore,
};
use adreel_marketing::{
    MarketingApi, MarketingClient, StaticTokenProvider, StoredTokenProvider, TokenProvider,
};
use adreel_pipeline::{HttpMediaFetcher, MediaFetcher, MediaPipeline, ScratchDir};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use super::database;

/// Build every long-lived service from configuration
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let (media_store, token_store): (Arc<dyn MediaAssetStore>, Arc<dyn TokenStore>) =
        match config.database.record_store {
            RecordStore::Postgres => {
                let pool = database::setup_database(config).await?;
                (
                    Arc::new(MediaAssetRepository::new(pool.clone())),
                    Arc::new(TokenRepository::new(pool)),
                )
            }
            RecordStore::Memory => {
                tracing::warn!("Using in-memory record store; media links are lost on restart");
                (
                    Arc::new(MemoryMediaAssetStore::new()),
                    Arc::new(MemoryTokenStore::new()),
                )
            }
        };

    let api: Arc<dyn MarketingApi> = Arc::new(
        MarketingClient::new(&config.marketing).context("Failed to create marketing client")?,
    );

    let tokens: Arc<dyn TokenProvider> = match &config.marketing.access_token {
        Some(token) => {
            tracing::info!("Using static marketing access token");
            Arc::new(StaticTokenProvider::new(token.clone()))
        }
        None => Arc::new(StoredTokenProvider::new(
            api.clone(),
            token_store,
            config.marketing.refresh_token.clone(),
        )),
    };

    let fetcher: Arc<dyn MediaFetcher> = Arc::new(HttpMediaFetcher::new(Duration::from_secs(
        config.marketing.http_timeout_secs,
    ))?);

    let scratch = ScratchDir::create(&config.pipeline.upload_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory {}",
                config.pipeline.upload_dir.display()
            )
        })?;

    tracing::info!(
        record_store = %config.database.record_store,
        upload_dir = %config.pipeline.upload_dir.display(),
        fan_out_concurrency = config.pipeline.fan_out_concurrency,
        upload_concurrency = config.pipeline.upload_concurrency,
        poll_max_attempts = config.pipeline.poll_max_attempts,
        "Services initialized"
    );

    Ok(build_state(
        config.clone(),
        api,
        tokens,
        media_store,
        fetcher,
        scratch,
    ))
}

/// Assemble application state from already-built services
pub fn build_state(
    config: Config,
    api: Arc<dyn MarketingApi>,
    tokens: Arc<dyn TokenProvider>,
    media_store: Arc<dyn MediaAssetStore>,
    fetcher: Arc<dyn MediaFetcher>,
    scratch: ScratchDir,
) -> Arc<AppState> {
    let pipeline = MediaPipeline::new(
        api,
        tokens,
        media_store,
        fetcher,
        scratch,
        &config.pipeline,
        config.marketing.organization_id.clone(),
    );

    Arc::new(AppState {
        config,
        pipeline,
        validator: FileValidator::default(),
    })
}
