//! reqwest implementation of [`MarketingApi`]

use adreel_core::models::AdAccount;
use adreel_core::MarketingConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::Path;
use std::time::Duration;
use tokio_util::io::ReaderStream;

use crate::api::MarketingApi;
use crate::error::MarketingError;
use crate::models::{
    AdAccountListResponse, CreateMediaItem, CreateMediaRequest, MediaResponse, TokenResponse,
    UploadMediaResponse,
};

const REFRESH_TOKEN_GRANT: &str = "refresh_token";

pub struct MarketingClient {
    http_client: Client,
    api_base_url: String,
    accounts_base_url: String,
    client_id: String,
    client_secret: String,
}

impl Debug for MarketingClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MarketingClient")
            .field("api_base_url", &self.api_base_url)
            .field("accounts_base_url", &self.accounts_base_url)
            .finish()
    }
}

impl MarketingClient {
    pub fn new(config: &MarketingConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("Failed to create HTTP client for the marketing platform")?;

        Ok(Self {
            http_client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            accounts_base_url: config.accounts_base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path)
    }

    /// Turn a non-2xx response into [`MarketingError::Status`] carrying the body text.
    async fn ensure_success(response: Response) -> Result<Response, MarketingError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(MarketingError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: Response,
        what: &str,
    ) -> Result<T, MarketingError> {
        let response = Self::ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| MarketingError::Decode(format!("{}: {}", what, e)))
    }
}

#[async_trait]
impl MarketingApi for MarketingClient {
    #[tracing::instrument(skip(self, token, items), fields(ad_account_id = %ad_account_id, items = items.len()))]
    async fn create_media(
        &self,
        token: &str,
        ad_account_id: &str,
        items: &[CreateMediaItem],
    ) -> Result<MediaResponse, MarketingError> {
        let response = self
            .http_client
            .post(self.api_url(&format!("adaccounts/{}/media", ad_account_id)))
            .bearer_auth(token)
            .json(&CreateMediaRequest { media: items })
            .send()
            .await?;

        Self::decode(response, "create media").await
    }

    #[tracing::instrument(skip(self, token, file_path), fields(media_id = %media_id, file_name = %file_name))]
    async fn upload_media(
        &self,
        token: &str,
        media_id: &str,
        file_name: &str,
        file_path: &Path,
    ) -> Result<UploadMediaResponse, MarketingError> {
        let file = tokio::fs::File::open(file_path).await?;
        let length = file.metadata().await?.len();
        let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), length)
            .file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let response = self
            .http_client
            .post(self.api_url(&format!("media/{}/upload", media_id)))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        Self::decode(response, "upload media").await
    }

    #[tracing::instrument(skip(self, token), fields(media_id = %media_id))]
    async fn get_media(&self, token: &str, media_id: &str) -> Result<MediaResponse, MarketingError> {
        let response = self
            .http_client
            .get(self.api_url(&format!("media/{}", media_id)))
            .bearer_auth(token)
            .send()
            .await?;

        Self::decode(response, "get media").await
    }

    #[tracing::instrument(skip(self, token), fields(organization_id = %organization_id))]
    async fn list_ad_accounts(
        &self,
        token: &str,
        organization_id: &str,
    ) -> Result<Vec<AdAccount>, MarketingError> {
        let response = self
            .http_client
            .get(self.api_url(&format!("organizations/{}/adaccounts", organization_id)))
            .bearer_auth(token)
            .send()
            .await?;

        let accounts: AdAccountListResponse = Self::decode(response, "list ad accounts").await?;
        if !crate::models::is_success_status(&accounts.request_status) {
            return Err(MarketingError::Decode(format!(
                "list ad accounts returned request_status {}",
                accounts.request_status
            )));
        }
        Ok(accounts.into_ad_accounts())
    }

    #[tracing::instrument(skip_all)]
    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenResponse, MarketingError> {
        let response = self
            .http_client
            .post(format!("{}/login/oauth2/access_token", self.accounts_base_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", refresh_token),
                ("refresh_token", refresh_token),
                ("grant_type", REFRESH_TOKEN_GRANT),
            ])
            .send()
            .await?;

        Self::decode(response, "refresh access token").await
    }
}
