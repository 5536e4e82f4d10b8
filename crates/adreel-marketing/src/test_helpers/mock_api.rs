//! Mock marketing platform for testing

use adreel_core::models::AdAccount;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::MarketingApi;
use crate::error::MarketingError;
use crate::models::{
    CreateMediaItem, MediaEnvelope, MediaResponse, RemoteMedia, TokenResponse,
    UploadMediaResponse, MEDIA_STATUS_READY,
};

/// Shared, ordered record of calls. Hand the same log to other test doubles to observe
/// cross-component ordering.
pub type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Default)]
struct Script {
    create_failures_by_file: HashSet<String>,
    create_failures_by_account: HashSet<String>,
    upload_failures: HashSet<String>,
    never_ready: HashSet<String>,
    ready_after: HashMap<String, u32>,
    status_query_errors: HashSet<String>,
    ad_accounts: Vec<AdAccount>,
}

#[derive(Clone)]
struct MockMedia {
    file_name: String,
    ad_account_id: String,
    media_type: String,
    polls: u32,
}

/// Scripted marketing platform.
///
/// By default every create and upload succeeds and media becomes ready on the first
/// status query. Builder methods script failures per file name or per ad account.
#[derive(Clone)]
pub struct MockMarketingApi {
    script: Arc<Mutex<Script>>,
    media: Arc<Mutex<HashMap<String, MockMedia>>>,
    next_id: Arc<AtomicU64>,
    calls: CallLog,
}

impl Default for MockMarketingApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketingApi {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(Script::default())),
            media: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record calls into `log` instead of a private log.
    pub fn with_call_log(mut self, log: CallLog) -> Self {
        self.calls = log;
        self
    }

    pub fn fail_create_for_file(self, file_name: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .create_failures_by_file
            .insert(file_name.to_string());
        self
    }

    pub fn fail_create_for_account(self, ad_account_id: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .create_failures_by_account
            .insert(ad_account_id.to_string());
        self
    }

    pub fn fail_upload_for_file(self, file_name: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .upload_failures
            .insert(file_name.to_string());
        self
    }

    pub fn never_ready_for_file(self, file_name: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .never_ready
            .insert(file_name.to_string());
        self
    }

    /// Media for `file_name` reports READY on the `polls`-th status query.
    pub fn ready_after(self, file_name: &str, polls: u32) -> Self {
        self.script
            .lock()
            .unwrap()
            .ready_after
            .insert(file_name.to_string(), polls);
        self
    }

    /// Status queries for `file_name` fail with a 500.
    pub fn error_on_status_query(self, file_name: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .status_query_errors
            .insert(file_name.to_string());
        self
    }

    pub fn with_ad_accounts(self, accounts: Vec<AdAccount>) -> Self {
        self.script.lock().unwrap().ad_accounts = accounts;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Ad account a created media id belongs to.
    pub fn media_account(&self, media_id: &str) -> Option<String> {
        self.media
            .lock()
            .unwrap()
            .get(media_id)
            .map(|m| m.ad_account_id.clone())
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn remote_media(id: &str, media: &MockMedia, status: &str) -> RemoteMedia {
        RemoteMedia {
            id: id.to_string(),
            name: media.file_name.clone(),
            media_type: Some(media.media_type.clone()),
            ad_account_id: Some(media.ad_account_id.clone()),
            media_status: Some(status.to_string()),
            download_link: Some(format!("https://cdn.example.test/{}", id)),
            created_at: Some("2025-01-01T00:00:00.000Z".to_string()),
            updated_at: None,
        }
    }
}

#[async_trait]
impl MarketingApi for MockMarketingApi {
    async fn create_media(
        &self,
        _token: &str,
        ad_account_id: &str,
        items: &[CreateMediaItem],
    ) -> Result<MediaResponse, MarketingError> {
        let mut envelopes = Vec::new();
        for item in items {
            self.record(format!("create_media:{}:{}", ad_account_id, item.name));

            let rejected = {
                let script = self.script.lock().unwrap();
                script.create_failures_by_file.contains(&item.name)
                    || script.create_failures_by_account.contains(ad_account_id)
            };
            if rejected {
                return Ok(MediaResponse {
                    request_status: "ERROR".to_string(),
                    request_id: None,
                    media: Vec::new(),
                });
            }

            let id = format!("media-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
            let media = MockMedia {
                file_name: item.name.clone(),
                ad_account_id: ad_account_id.to_string(),
                media_type: item.media_type.to_string(),
                polls: 0,
            };
            envelopes.push(MediaEnvelope {
                sub_request_status: Some("SUCCESS".to_string()),
                media: Self::remote_media(&id, &media, "PENDING_UPLOAD"),
            });
            self.media.lock().unwrap().insert(id, media);
        }

        Ok(MediaResponse {
            request_status: "SUCCESS".to_string(),
            request_id: None,
            media: envelopes,
        })
    }

    async fn upload_media(
        &self,
        _token: &str,
        media_id: &str,
        file_name: &str,
        file_path: &Path,
    ) -> Result<UploadMediaResponse, MarketingError> {
        self.record(format!("upload_media:{}:{}", media_id, file_name));
        tokio::fs::metadata(file_path).await?;

        let failed = self
            .script
            .lock()
            .unwrap()
            .upload_failures
            .contains(file_name);
        Ok(UploadMediaResponse {
            request_status: if failed { "ERROR" } else { "SUCCESS" }.to_string(),
            request_id: None,
        })
    }

    async fn get_media(&self, _token: &str, media_id: &str) -> Result<MediaResponse, MarketingError> {
        self.record(format!("get_media:{}", media_id));

        let mut media = self.media.lock().unwrap();
        let Some(entry) = media.get_mut(media_id) else {
            return Err(MarketingError::Status {
                status: 404,
                body: format!("media {} not found", media_id),
            });
        };

        let script = self.script.lock().unwrap();
        if script.status_query_errors.contains(&entry.file_name) {
            return Err(MarketingError::Status {
                status: 500,
                body: "status lookup failed".to_string(),
            });
        }

        entry.polls += 1;
        let ready_at = script.ready_after.get(&entry.file_name).copied().unwrap_or(1);
        let ready = !script.never_ready.contains(&entry.file_name) && entry.polls >= ready_at;
        let status = if ready { MEDIA_STATUS_READY } else { "PENDING_UPLOAD" };

        Ok(MediaResponse {
            request_status: "SUCCESS".to_string(),
            request_id: None,
            media: vec![MediaEnvelope {
                sub_request_status: Some("SUCCESS".to_string()),
                media: Self::remote_media(media_id, entry, status),
            }],
        })
    }

    async fn list_ad_accounts(
        &self,
        _token: &str,
        organization_id: &str,
    ) -> Result<Vec<AdAccount>, MarketingError> {
        self.record(format!("list_ad_accounts:{}", organization_id));
        Ok(self.script.lock().unwrap().ad_accounts.clone())
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenResponse, MarketingError> {
        self.record(format!("refresh_token:{}", refresh_token));
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(TokenResponse {
            access_token: format!("mock-access-{}", n),
            refresh_token: format!("mock-refresh-{}", n),
            expires_in: 1800,
            token_type: Some("Bearer".to_string()),
            scope: Some("snapchat-marketing-api".to_string()),
        })
    }
}
