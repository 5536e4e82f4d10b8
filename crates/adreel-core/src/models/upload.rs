use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use utoipa::ToSchema;

use super::MediaKind;

/// Form field carrying the display grouping of an upload
pub const MEDIA_VIEW_PROPERTY: &str = "mediaView";

/// One file awaiting upload to one or more ad accounts. Lives only for the owning operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    /// Unique scratch path holding the bytes
    pub file_path: PathBuf,
    /// Original file name; used for remote naming and in result lists
    pub file_name: String,
    pub mime_type: String,
}

impl UploadJob {
    pub fn new(
        file_path: impl Into<PathBuf>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn media_kind(&self) -> Option<MediaKind> {
        MediaKind::from_mime_type(&self.mime_type)
    }
}

/// Per-account outcome of an upload batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatus {
    pub upload_fails: Vec<String>,
    pub upload_success: Vec<String>,
    pub ad_account_id: String,
}

impl UploadStatus {
    pub fn for_account(ad_account_id: impl Into<String>) -> Self {
        Self {
            ad_account_id: ad_account_id.into(),
            ..Self::default()
        }
    }
}

/// Free-form media properties submitted alongside an upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaProperties(BTreeMap<String, String>);

impl MediaProperties {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn media_view(&self) -> Option<&str> {
        self.get(MEDIA_VIEW_PROPERTY).filter(|v| !v.is_empty())
    }
}
