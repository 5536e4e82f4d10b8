//! Bearer token supply
//!
//! The pipeline asks for a token before every remote call. [`StoredTokenProvider`] keeps the
//! token in the record store and refreshes it through the platform's token endpoint once it
//! expires. Initial OAuth consent is out of scope: a refresh token must already be stored or
//! configured.

use adreel_core::models::AccessToken;
use adreel_db::TokenStore;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::MarketingApi;
use crate::error::MarketingError;

#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, MarketingError>;
}

/// Always hands out the same token
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, MarketingError> {
        Ok(self.token.clone())
    }
}

pub struct StoredTokenProvider {
    api: Arc<dyn MarketingApi>,
    store: Arc<dyn TokenStore>,
    seed_refresh_token: Option<String>,
    // Held only while refreshing
    refresh_lock: Mutex<()>,
}

impl StoredTokenProvider {
    pub fn new(
        api: Arc<dyn MarketingApi>,
        store: Arc<dyn TokenStore>,
        seed_refresh_token: Option<String>,
    ) -> Self {
        Self {
            api,
            store,
            seed_refresh_token,
            refresh_lock: Mutex::new(()),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, MarketingError> {
        let response = self.api.refresh_access_token(refresh_token).await?;
        let created_at = Utc::now();
        let token = AccessToken {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type,
            scope: response.scope,
            created_at,
            expires_at: created_at + Duration::seconds(response.expires_in),
        };
        self.store.save_token(&token).await?;

        tracing::info!(expires_at = %token.expires_at, "Marketing access token refreshed");
        Ok(token.access_token)
    }
}

#[async_trait]
impl TokenProvider for StoredTokenProvider {
    async fn access_token(&self) -> Result<String, MarketingError> {
        if let Some(token) = self.store.get_token().await? {
            if !token.is_expired() {
                return Ok(token.access_token);
            }
        }

        let _guard = self.refresh_lock.lock().await;
        // Another caller may have refreshed while we waited
        let stored = self.store.get_token().await?;
        if let Some(token) = &stored {
            if !token.is_expired() {
                return Ok(token.access_token.clone());
            }
        }

        let refresh_token = stored
            .map(|token| token.refresh_token)
            .or_else(|| self.seed_refresh_token.clone())
            .ok_or_else(|| {
                MarketingError::Token(
                    "no stored token and no MARKETING_REFRESH_TOKEN configured".to_string(),
                )
            })?;

        self.refresh(&refresh_token).await
    }
}
