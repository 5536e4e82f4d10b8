//! Common utilities for the multipart upload handler

use adreel_core::AppError;
use axum::extract::multipart::Field;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Result of spooling one multipart file field to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpoolOutcome {
    Written(u64),
    /// The field exceeded the size ceiling; nothing is left on disk
    TooLarge,
}

/// Stream a multipart field into `dest`, stopping once more than `max_bytes` arrive.
pub async fn spool_field(
    mut field: Field<'_>,
    dest: &Path,
    max_bytes: usize,
) -> Result<SpoolOutcome, AppError> {
    let mut file = tokio::fs::File::create(dest).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?
    {
        written += chunk.len() as u64;
        if written > max_bytes as u64 {
            drop(file);
            if let Err(e) = tokio::fs::remove_file(dest).await {
                tracing::warn!(error = %e, path = %dest.display(), "Failed to remove oversized upload");
            }
            return Ok(SpoolOutcome::TooLarge);
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(SpoolOutcome::Written(written))
}
