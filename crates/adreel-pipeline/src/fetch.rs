//! Downloads an asset's binary from its durable download link.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Stream `url` into `dest`, returning the number of bytes written.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64>;
}

pub struct HttpMediaFetcher {
    http_client: Client,
}

impl HttpMediaFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for media downloads")?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    #[tracing::instrument(skip(self, dest), fields(url = %url))]
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .context("Failed to download media")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Media download failed: {} - {}",
                status,
                error_text
            ));
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .with_context(|| format!("Failed to create {}", dest.display()))?;
        let mut written = 0u64;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.context("Media download interrupted")?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::debug!(bytes = written, "Media downloaded");
        Ok(written)
    }
}
