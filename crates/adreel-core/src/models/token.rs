use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens are treated as expired this long before the platform's own deadline.
pub const TOKEN_EXPIRY_SKEW_SECS: i64 = 60;

/// Stored marketing platform OAuth token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_EXPIRY_SKEW_SECS) >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_honours_skew() {
        let created_at = Utc::now();
        let token = AccessToken {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            token_type: Some("Bearer".to_string()),
            scope: None,
            created_at,
            expires_at: created_at + Duration::seconds(1800),
        };

        assert!(!token.is_expired_at(created_at));
        assert!(token.is_expired_at(created_at + Duration::seconds(1750)));
        assert!(token.is_expired_at(created_at + Duration::seconds(3600)));
    }
}
