//! Test helpers: build AppState and router for integration tests.
//!
//! The marketing platform is the scripted `MockMarketingApi`; media assets live in a
//! `MemoryMediaAssetStore` the test can inspect.

#![allow(dead_code)]

use adreel_api::constants;
use adreel_api::setup::{routes, services};
use adreel_core::{Config, RecordStore};
use adreel_db::{MediaAssetStore, MemoryMediaAssetStore};
use adreel_marketing::test_helpers::MockMarketingApi;
use adreel_marketing::{StaticTokenProvider, TokenProvider};
use adreel_pipeline::{HttpMediaFetcher, MediaFetcher, ScratchDir};
use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, mocks and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub api: MockMarketingApi,
    pub store: MemoryMediaAssetStore,
    pub upload_dir: std::path::PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of calls to the marketing platform whose log line starts with `prefix`.
    pub fn remote_calls(&self, prefix: &str) -> usize {
        self.api
            .calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

pub fn test_config(upload_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.database.record_store = RecordStore::Memory;
    config.marketing.access_token = Some("test-token".to_string());
    config.marketing.organization_id = "org-test".to_string();
    config.pipeline.upload_dir = upload_dir.to_path_buf();
    config.pipeline.poll_interval = Duration::from_millis(1);
    config.pipeline.poll_max_attempts = 3;
    config
}

/// Setup test app with default mocks.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(MockMarketingApi::new(), MemoryMediaAssetStore::new(), |_| {}).await
}

/// Setup test app with a scripted platform, a pre-seeded store and config overrides.
pub async fn setup_test_app_with(
    api: MockMarketingApi,
    store: MemoryMediaAssetStore,
    configure: impl FnOnce(&mut Config),
) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let upload_dir = temp_dir.path().join("upload");

    let mut config = test_config(&upload_dir);
    configure(&mut config);

    let scratch = ScratchDir::create(&upload_dir)
        .await
        .expect("Failed to create scratch directory");
    let tokens: Arc<dyn TokenProvider> = Arc::new(StaticTokenProvider::new("test-token"));
    let media_store: Arc<dyn MediaAssetStore> = Arc::new(store.clone());
    let fetcher: Arc<dyn MediaFetcher> = Arc::new(
        HttpMediaFetcher::new(Duration::from_secs(5)).expect("Failed to create fetcher"),
    );

    let state = services::build_state(
        config.clone(),
        Arc::new(api.clone()),
        tokens,
        media_store,
        fetcher,
        scratch,
    );
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        api,
        store,
        upload_dir,
        _temp_dir: temp_dir,
    }
}

/// Wait until the upload directory is empty (cleanup runs in a spawned task).
pub async fn wait_for_empty_dir(dir: &std::path::Path) -> bool {
    for _ in 0..100 {
        let empty = std::fs::read_dir(dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(true);
        if empty {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
