use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Coarse media kind understood by the marketing platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Derive the kind from the primary component of a MIME type (`image/png` -> `Image`).
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        let primary = mime_type.split('/').next()?.trim();
        match primary.to_ascii_lowercase().as_str() {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "IMAGE",
            MediaKind::Video => "VIDEO",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// One advertiser account a media asset has been replicated to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAdAccount {
    pub ad_account_id: String,
    pub ad_account_name: String,
    /// Media id the platform assigned for this account's copy
    pub remote_media_id: String,
}

/// Durable media record keyed by the media id of the first successful upload.
///
/// `linked_ad_accounts` is append-only and unique by `ad_account_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub id: String,
    pub name: String,
    /// IMAGE or VIDEO, as reported by the platform
    pub media_type: String,
    pub status: String,
    pub download_link: Option<String>,
    /// Remote creation timestamp, verbatim from the platform
    pub created_at: Option<String>,
    /// Local insertion time
    pub created_on: DateTime<Utc>,
    pub media_view: Option<String>,
    pub linked_ad_accounts: Vec<LinkedAdAccount>,
}

impl MediaAsset {
    pub fn is_linked_to(&self, ad_account_id: &str) -> bool {
        self.linked_ad_accounts
            .iter()
            .any(|link| link.ad_account_id == ad_account_id)
    }

    /// Append `link` unless the account is already linked. Returns whether anything changed.
    pub fn push_link(&mut self, link: LinkedAdAccount) -> bool {
        if self.is_linked_to(&link.ad_account_id) {
            return false;
        }
        self.linked_ad_accounts.push(link);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(account: &str, remote: &str) -> LinkedAdAccount {
        LinkedAdAccount {
            ad_account_id: account.to_string(),
            ad_account_name: format!("{} name", account),
            remote_media_id: remote.to_string(),
        }
    }

    #[test]
    fn media_kind_from_mime_type() {
        assert_eq!(MediaKind::from_mime_type("image/png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_mime_type("video/H264"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_mime_type("text/pdf"), None);
        assert_eq!(MediaKind::Video.to_string(), "VIDEO");
    }

    #[test]
    fn push_link_keeps_accounts_unique() {
        let mut asset = MediaAsset {
            id: "m-1".to_string(),
            name: "file.png".to_string(),
            media_type: "IMAGE".to_string(),
            status: "READY".to_string(),
            download_link: None,
            created_at: None,
            created_on: Utc::now(),
            media_view: Some("grid".to_string()),
            linked_ad_accounts: vec![link("acc1", "m-1")],
        };

        assert!(asset.push_link(link("acc2", "m-2")));
        assert!(!asset.push_link(link("acc1", "m-9")), "duplicate account must be ignored");
        assert_eq!(asset.linked_ad_accounts.len(), 2);
        assert_eq!(asset.linked_ad_accounts[0].remote_media_id, "m-1");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(link("acc1", "m-1")).unwrap();
        assert_eq!(value["adAccountId"], "acc1");
        assert_eq!(value["remoteMediaId"], "m-1");
    }
}
