use adreel_core::models::AdAccount;
use async_trait::async_trait;
use std::path::Path;

use crate::error::MarketingError;
use crate::models::{CreateMediaItem, MediaResponse, TokenResponse, UploadMediaResponse};

/// Operations the pipeline needs from the marketing platform.
///
/// Every call is a single request. A non-2xx HTTP status surfaces as
/// [`MarketingError::Status`]; a 2xx response whose `request_status` is not success is
/// returned as-is for the caller to inspect.
#[async_trait]
pub trait MarketingApi: Send + Sync {
    /// Create media placeholders under `ad_account_id`.
    async fn create_media(
        &self,
        token: &str,
        ad_account_id: &str,
        items: &[CreateMediaItem],
    ) -> Result<MediaResponse, MarketingError>;

    /// Upload the bytes at `file_path` into the placeholder `media_id`.
    async fn upload_media(
        &self,
        token: &str,
        media_id: &str,
        file_name: &str,
        file_path: &Path,
    ) -> Result<UploadMediaResponse, MarketingError>;

    async fn get_media(&self, token: &str, media_id: &str) -> Result<MediaResponse, MarketingError>;

    async fn list_ad_accounts(
        &self,
        token: &str,
        organization_id: &str,
    ) -> Result<Vec<AdAccount>, MarketingError>;

    /// Exchange a refresh token for a new access token.
    async fn refresh_access_token(&self, refresh_token: &str)
        -> Result<TokenResponse, MarketingError>;
}
