//! Wire types for the marketing platform API

use adreel_core::models::{AdAccount, MediaKind};
use serde::{Deserialize, Serialize};

/// Terminal processing state of a media item
pub const MEDIA_STATUS_READY: &str = "READY";

/// True when a `request_status` value reports success (compared case-insensitively).
pub fn is_success_status(request_status: &str) -> bool {
    request_status.eq_ignore_ascii_case("success")
}

/// One media placeholder to create under an ad account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMediaItem {
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: MediaKind,
    pub ad_account_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateMediaRequest<'a> {
    pub media: &'a [CreateMediaItem],
}

/// Media descriptor as returned by the platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMedia {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub ad_account_id: Option<String>,
    #[serde(default)]
    pub media_status: Option<String>,
    #[serde(default)]
    pub download_link: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl RemoteMedia {
    pub fn is_ready(&self) -> bool {
        self.media_status.as_deref() == Some(MEDIA_STATUS_READY)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEnvelope {
    #[serde(default)]
    pub sub_request_status: Option<String>,
    pub media: RemoteMedia,
}

/// Response shape shared by create-media and get-media
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResponse {
    pub request_status: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub media: Vec<MediaEnvelope>,
}

impl MediaResponse {
    pub fn is_success(&self) -> bool {
        is_success_status(&self.request_status)
    }

    pub fn first_media(&self) -> Option<&RemoteMedia> {
        self.media.first().map(|envelope| &envelope.media)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMediaResponse {
    pub request_status: String,
    #[serde(default)]
    pub request_id: Option<String>,
}

impl UploadMediaResponse {
    pub fn is_success(&self) -> bool {
        is_success_status(&self.request_status)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RemoteAdAccount {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AdAccountEnvelope {
    pub adaccount: RemoteAdAccount,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AdAccountListResponse {
    pub request_status: String,
    #[serde(default)]
    pub adaccounts: Vec<AdAccountEnvelope>,
}

impl AdAccountListResponse {
    pub fn into_ad_accounts(self) -> Vec<AdAccount> {
        self.adaccounts
            .into_iter()
            .map(|envelope| AdAccount::new(envelope.adaccount.id, envelope.adaccount.name))
            .collect()
    }
}

/// OAuth token endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_status_is_case_insensitive() {
        assert!(is_success_status("SUCCESS"));
        assert!(is_success_status("success"));
        assert!(!is_success_status("ERROR"));
    }

    #[test]
    fn media_response_exposes_first_media() {
        let response: MediaResponse = serde_json::from_value(json!({
            "request_status": "SUCCESS",
            "request_id": "req-1",
            "media": [{
                "sub_request_status": "SUCCESS",
                "media": {
                    "id": "m-1",
                    "name": "file.png",
                    "type": "IMAGE",
                    "ad_account_id": "acc1",
                    "media_status": "READY",
                    "download_link": "https://cdn.example.com/m-1"
                }
            }]
        }))
        .unwrap();

        assert!(response.is_success());
        let media = response.first_media().unwrap();
        assert_eq!(media.id, "m-1");
        assert!(media.is_ready());
    }

    #[test]
    fn pending_media_is_not_ready() {
        let media = RemoteMedia {
            id: "m-1".to_string(),
            media_status: Some("PENDING_UPLOAD".to_string()),
            ..RemoteMedia::default()
        };
        assert!(!media.is_ready());
    }

    #[test]
    fn create_item_serializes_type_in_uppercase() {
        let item = CreateMediaItem {
            name: "clip.mp4".to_string(),
            media_type: MediaKind::Video,
            ad_account_id: "acc1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"name": "clip.mp4", "type": "VIDEO", "ad_account_id": "acc1"})
        );
    }
}
