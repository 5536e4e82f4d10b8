//! Waits for one remote media item to finish processing.
//!
//! Fixed interval, bounded number of queries, no backoff. A failed status query is not
//! retried: it ends the wait with an error.

use adreel_core::PipelineConfig;
use adreel_marketing::{MarketingApi, MarketingError, RemoteMedia, TokenProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval: Duration,
    /// Upper bound on status queries per item
    pub max_attempts: u32,
}

impl From<&PipelineConfig> for PollerConfig {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            interval: config.poll_interval,
            max_attempts: config.poll_max_attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Ready(RemoteMedia),
    Exhausted { attempts: u32 },
}

#[derive(Clone)]
pub struct StatusPoller {
    api: Arc<dyn MarketingApi>,
    tokens: Arc<dyn TokenProvider>,
    config: PollerConfig,
}

impl StatusPoller {
    pub fn new(
        api: Arc<dyn MarketingApi>,
        tokens: Arc<dyn TokenProvider>,
        config: PollerConfig,
    ) -> Self {
        Self {
            api,
            tokens,
            config,
        }
    }

    /// Query `media_id` every interval until it reports READY or the attempt budget runs out.
    ///
    /// The first query happens one interval after the call, so the wait is bounded by
    /// `max_attempts * interval`.
    #[tracing::instrument(skip(self), fields(media_id = %media_id))]
    pub async fn await_ready(&self, media_id: &str) -> Result<PollOutcome, MarketingError> {
        let mut attempts = 0;

        while attempts < self.config.max_attempts {
            sleep(self.config.interval).await;
            attempts += 1;

            let token = self.tokens.access_token().await?;
            let response = self.api.get_media(&token, media_id).await?;

            match response.first_media() {
                Some(media) if media.is_ready() => {
                    tracing::info!(media_id = %media_id, attempts, "Media ready");
                    return Ok(PollOutcome::Ready(media.clone()));
                }
                media => {
                    tracing::debug!(
                        media_id = %media_id,
                        attempt = attempts,
                        status = ?media.and_then(|m| m.media_status.as_deref()),
                        "Media not ready yet"
                    );
                }
            }
        }

        tracing::warn!(
            media_id = %media_id,
            attempts,
            "Media did not become ready within the polling budget"
        );
        Ok(PollOutcome::Exhausted { attempts })
    }
}
