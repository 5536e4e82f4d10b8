use adreel_core::models::{AccessToken, LinkedAdAccount, MediaAsset};
use adreel_core::AppError;
use async_trait::async_trait;

/// Result of a link write against the media asset table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new asset record was inserted
    Created,
    /// The link was appended to an existing asset (or merged into one on insert conflict)
    Appended,
    /// The account was already linked; nothing changed
    AlreadyLinked,
    /// No asset with that id exists
    Missing,
}

/// Record store for media assets.
///
/// Link writes are atomic per asset: concurrent writers for the same id never lose each
/// other's links and never produce duplicate `ad_account_id` entries.
#[async_trait]
pub trait MediaAssetStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<MediaAsset>, AppError>;

    /// Append `link` to the asset unless its account is already present.
    async fn append_link(&self, id: &str, link: &LinkedAdAccount) -> Result<LinkOutcome, AppError>;

    /// Insert `asset`, or merge its links into the existing record when the id is taken.
    async fn create_or_append(&self, asset: &MediaAsset) -> Result<LinkOutcome, AppError>;

    async fn list_by_view(&self, media_view: &str) -> Result<Vec<MediaAsset>, AppError>;
}

/// Record store for the single marketing platform token
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get_token(&self) -> Result<Option<AccessToken>, AppError>;

    async fn save_token(&self, token: &AccessToken) -> Result<(), AppError>;
}
