//! Create, upload, and wait for one file on one ad account.

use adreel_core::models::{AdAccount, UploadJob, UploadStatus};
use adreel_marketing::{
    CreateMediaItem, MarketingApi, MarketingError, RemoteMedia, TokenProvider,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

use crate::poller::{PollOutcome, StatusPoller};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Finalized descriptor of the ready media
    Uploaded(RemoteMedia),
    Failed(String),
}

/// A file that made it all the way to READY on one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub file_name: String,
    pub media: RemoteMedia,
}

/// Outcome of one file batch on one ad account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUpload {
    pub uploaded: Vec<UploadedMedia>,
    pub status: UploadStatus,
}

impl AccountUpload {
    /// Finalized media for `file_name`, if that file succeeded.
    ///
    /// Matches on the submitted name, so when a batch holds two files with the same name
    /// both resolve to whichever of them finished first.
    pub fn media_for(&self, file_name: &str) -> Option<&RemoteMedia> {
        self.uploaded
            .iter()
            .find(|u| u.file_name == file_name)
            .map(|u| &u.media)
    }
}

#[derive(Clone)]
pub struct UploadOrchestrator {
    api: Arc<dyn MarketingApi>,
    tokens: Arc<dyn TokenProvider>,
    poller: StatusPoller,
    upload_concurrency: usize,
}

impl UploadOrchestrator {
    pub fn new(
        api: Arc<dyn MarketingApi>,
        tokens: Arc<dyn TokenProvider>,
        poller: StatusPoller,
        upload_concurrency: usize,
    ) -> Self {
        Self {
            api,
            tokens,
            poller,
            upload_concurrency: upload_concurrency.max(1),
        }
    }

    /// Run create, upload and poll for one file. Never errors: any failure becomes
    /// [`UploadOutcome::Failed`] for this file and account only.
    #[tracing::instrument(skip(self, job, ad_account), fields(file_name = %job.file_name, ad_account_id = %ad_account.id))]
    pub async fn create_and_upload(&self, job: &UploadJob, ad_account: &AdAccount) -> UploadOutcome {
        match self.try_create_and_upload(job, ad_account).await {
            Ok(outcome) => {
                if let UploadOutcome::Failed(reason) = &outcome {
                    tracing::warn!(reason = %reason, "Media upload failed");
                }
                outcome
            }
            Err(e) => {
                tracing::warn!(error = %e, "Media upload aborted by remote error");
                UploadOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_create_and_upload(
        &self,
        job: &UploadJob,
        ad_account: &AdAccount,
    ) -> Result<UploadOutcome, MarketingError> {
        let Some(media_kind) = job.media_kind() else {
            return Ok(UploadOutcome::Failed(format!(
                "unsupported media type {}",
                job.mime_type
            )));
        };

        let token = self.tokens.access_token().await?;
        tracing::debug!(media_kind = %media_kind, "Creating media placeholder");
        let items = [CreateMediaItem {
            name: job.file_name.clone(),
            media_type: media_kind,
            ad_account_id: ad_account.id.clone(),
        }];
        let created = self.api.create_media(&token, &ad_account.id, &items).await?;
        let placeholder = match created.first_media() {
            Some(media) if created.is_success() => media.id.clone(),
            _ => {
                return Ok(UploadOutcome::Failed(format!(
                    "create media rejected with request_status {}",
                    created.request_status
                )))
            }
        };

        let uploaded = self
            .api
            .upload_media(&token, &placeholder, &job.file_name, &job.file_path)
            .await?;
        if !uploaded.is_success() {
            return Ok(UploadOutcome::Failed(format!(
                "upload rejected with request_status {}",
                uploaded.request_status
            )));
        }

        match self.poller.await_ready(&placeholder).await? {
            PollOutcome::Ready(media) => Ok(UploadOutcome::Uploaded(media)),
            PollOutcome::Exhausted { attempts } => Ok(UploadOutcome::Failed(format!(
                "media {} not ready after {} status queries",
                placeholder, attempts
            ))),
        }
    }

    /// Upload every job to `ad_account`, files racing independently.
    pub async fn upload_batch(&self, jobs: &[UploadJob], ad_account: &AdAccount) -> AccountUpload {
        let outcomes: Vec<(String, UploadOutcome)> = stream::iter(jobs.iter().cloned())
            .map(|job| async move {
                let outcome = self.create_and_upload(&job, ad_account).await;
                (job.file_name, outcome)
            })
            .buffer_unordered(self.upload_concurrency)
            .collect()
            .await;

        let mut result = AccountUpload {
            uploaded: Vec::new(),
            status: UploadStatus::for_account(&ad_account.id),
        };
        for (file_name, outcome) in outcomes {
            match outcome {
                UploadOutcome::Uploaded(media) => {
                    result.status.upload_success.push(file_name.clone());
                    result.uploaded.push(UploadedMedia { file_name, media });
                }
                UploadOutcome::Failed(_) => result.status.upload_fails.push(file_name),
            }
        }

        tracing::info!(
            ad_account_id = %ad_account.id,
            succeeded = result.status.upload_success.len(),
            failed = result.status.upload_fails.len(),
            "Account upload batch finished"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::PollerConfig;
    use adreel_marketing::test_helpers::MockMarketingApi;
    use adreel_marketing::StaticTokenProvider;
    use std::time::Duration;
    use tempfile::TempDir;

    fn orchestrator(api: &MockMarketingApi) -> UploadOrchestrator {
        let api: Arc<dyn MarketingApi> = Arc::new(api.clone());
        let tokens: Arc<dyn TokenProvider> = Arc::new(StaticTokenProvider::new("tok"));
        let poller = StatusPoller::new(
            api.clone(),
            tokens.clone(),
            PollerConfig {
                interval: Duration::from_millis(1),
                max_attempts: 3,
            },
        );
        UploadOrchestrator::new(api, tokens, poller, 4)
    }

    fn job(dir: &TempDir, file_name: &str, mime_type: &str) -> UploadJob {
        let path = dir.path().join(file_name);
        std::fs::write(&path, b"bytes").unwrap();
        UploadJob::new(path, file_name, mime_type)
    }

    #[tokio::test]
    async fn returns_descriptor_when_every_step_succeeds() {
        let dir = TempDir::new().unwrap();
        let api = MockMarketingApi::new();

        let outcome = orchestrator(&api)
            .create_and_upload(&job(&dir, "file.png", "image/png"), &AdAccount::new("acc1", "A"))
            .await;

        match outcome {
            UploadOutcome::Uploaded(media) => {
                assert_eq!(media.name, "file.png");
                assert!(media.is_ready());
            }
            other => panic!("expected upload, got {:?}", other),
        }
        let calls = api.calls();
        assert!(calls[0].starts_with("create_media:acc1:file.png"));
        assert!(calls[1].starts_with("upload_media:"));
        assert!(calls[2].starts_with("get_media:"));
    }

    #[tokio::test]
    async fn create_rejection_fails_without_upload() {
        let dir = TempDir::new().unwrap();
        let api = MockMarketingApi::new().fail_create_for_file("file.png");

        let outcome = orchestrator(&api)
            .create_and_upload(&job(&dir, "file.png", "image/png"), &AdAccount::new("acc1", "A"))
            .await;

        assert!(matches!(outcome, UploadOutcome::Failed(_)));
        assert!(
            !api.calls().iter().any(|c| c.starts_with("upload_media:")),
            "upload must not run after a rejected create"
        );
    }

    #[tokio::test]
    async fn upload_rejection_fails_without_polling() {
        let dir = TempDir::new().unwrap();
        let api = MockMarketingApi::new().fail_upload_for_file("file.png");

        let outcome = orchestrator(&api)
            .create_and_upload(&job(&dir, "file.png", "image/png"), &AdAccount::new("acc1", "A"))
            .await;

        assert!(matches!(outcome, UploadOutcome::Failed(_)));
        assert!(!api.calls().iter().any(|c| c.starts_with("get_media:")));
    }

    #[tokio::test]
    async fn poll_exhaustion_fails_the_file() {
        let dir = TempDir::new().unwrap();
        let api = MockMarketingApi::new().never_ready_for_file("file.png");

        let outcome = orchestrator(&api)
            .create_and_upload(&job(&dir, "file.png", "image/png"), &AdAccount::new("acc1", "A"))
            .await;

        assert!(matches!(outcome, UploadOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn batch_splits_successes_and_failures() {
        let dir = TempDir::new().unwrap();
        let api = MockMarketingApi::new()
            .fail_upload_for_file("bad.mp4")
            .error_on_status_query("flaky.png");
        let jobs = vec![
            job(&dir, "good.png", "image/png"),
            job(&dir, "bad.mp4", "video/mp4"),
            job(&dir, "flaky.png", "image/png"),
        ];

        let result = orchestrator(&api)
            .upload_batch(&jobs, &AdAccount::new("acc1", "A"))
            .await;

        assert_eq!(result.status.ad_account_id, "acc1");
        assert_eq!(result.status.upload_success, vec!["good.png".to_string()]);
        let mut fails = result.status.upload_fails.clone();
        fails.sort();
        assert_eq!(fails, vec!["bad.mp4".to_string(), "flaky.png".to_string()]);
        assert!(result.media_for("good.png").is_some());
        assert!(result.media_for("bad.mp4").is_none());
    }

    #[test]
    fn media_for_resolves_a_repeated_name_to_the_first_finished() {
        let media = |id: &str| RemoteMedia {
            id: id.to_string(),
            ..RemoteMedia::default()
        };
        let upload = AccountUpload {
            uploaded: vec![
                UploadedMedia {
                    file_name: "same.png".to_string(),
                    media: media("m-1"),
                },
                UploadedMedia {
                    file_name: "same.png".to_string(),
                    media: media("m-2"),
                },
            ],
            status: UploadStatus::for_account("acc1"),
        };

        assert_eq!(upload.media_for("same.png").map(|m| m.id.as_str()), Some("m-1"));
    }
}
