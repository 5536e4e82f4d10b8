use std::path::PathBuf;
use std::sync::Arc;

use adreel_core::models::{AdAccount, MediaProperties, UploadJob, UploadStatus};
use adreel_core::validation::normalize_mime_type;
use adreel_core::AppError;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::constants::AD_ACCOUNT_FIELD;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{spool_field, SpoolOutcome};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadMediaResponse {
    pub upload_status: Vec<UploadStatus>,
    pub invalid_file_sizes: Vec<String>,
    pub invalid_file_types: Vec<String>,
}

/// Everything pulled out of the multipart body
#[derive(Default)]
struct UploadForm {
    ad_accounts: Vec<AdAccount>,
    properties: MediaProperties,
    jobs: Vec<UploadJob>,
    scratch_paths: Vec<PathBuf>,
    invalid_file_sizes: Vec<String>,
    invalid_file_types: Vec<String>,
}

/// Upload media files to one or more ad accounts
///
/// Files are checked against the MIME allow-list and the size ceiling while the body
/// streams in. Accepted files are uploaded to the first account, then to the rest.
/// Rejected files are reported by name and never reach the marketing platform.
#[utoipa::path(
    post,
    path = "/api/v0/media/upload",
    tag = "media",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Field `adAccount` (JSON array of {id, name}), media property fields such as `mediaView`, and one or more files"),
    responses(
        (status = 200, description = "Per-account upload outcome plus rejected files", body = UploadMediaResponse),
        (status = 400, description = "Malformed form or adAccount JSON", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_media"))]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadMediaResponse>, HttpAppError> {
    let mut form = UploadForm::default();
    if let Err(e) = read_form(&state, multipart, &mut form).await {
        state.scratch().remove_later(form.scratch_paths);
        return Err(e.into());
    }

    tracing::info!(
        accepted = form.jobs.len(),
        invalid_sizes = form.invalid_file_sizes.len(),
        invalid_types = form.invalid_file_types.len(),
        accounts = form.ad_accounts.len(),
        "Upload form parsed"
    );

    let upload_status = state
        .pipeline
        .initiate_upload(&form.jobs, &form.ad_accounts, &form.properties)
        .await;

    state.scratch().remove_later(form.scratch_paths);

    Ok(Json(UploadMediaResponse {
        upload_status,
        invalid_file_sizes: form.invalid_file_sizes,
        invalid_file_types: form.invalid_file_types,
    }))
}

async fn read_form(
    state: &AppState,
    mut multipart: Multipart,
    form: &mut UploadForm,
) -> Result<(), AppError> {
    let max_bytes = state.config.max_upload_size_bytes();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read field {}: {}", field_name, e)))?;
            if field_name == AD_ACCOUNT_FIELD {
                form.ad_accounts = parse_ad_accounts(&value)?;
            } else {
                form.properties.insert(field_name, value);
            }
            continue;
        };

        let mime_type = normalize_mime_type(
            field.content_type().unwrap_or("application/octet-stream"),
        )
        .to_string();
        if !state.validator.validate(&file_name, &mime_type) {
            tracing::debug!(file_name = %file_name, mime_type = %mime_type, "Rejected file type");
            form.invalid_file_types.push(file_name);
            continue;
        }

        // Scratch paths never derive from the submitted name beyond its extension
        let path = state.scratch().allocate(&file_name);
        match spool_field(field, &path, max_bytes).await {
            Ok(SpoolOutcome::Written(bytes)) => {
                tracing::debug!(file_name = %file_name, bytes, "File spooled");
                form.scratch_paths.push(path.clone());
                form.jobs.push(UploadJob::new(path, file_name, mime_type));
            }
            Ok(SpoolOutcome::TooLarge) => {
                tracing::debug!(file_name = %file_name, max_bytes, "Rejected oversized file");
                form.invalid_file_sizes.push(file_name);
            }
            Err(e) => {
                form.scratch_paths.push(path);
                return Err(e);
            }
        }
    }

    Ok(())
}

fn parse_ad_accounts(value: &str) -> Result<Vec<AdAccount>, AppError> {
    serde_json::from_str(value)
        .map_err(|e| AppError::BadRequest(format!("Invalid {} JSON: {}", AD_ACCOUNT_FIELD, e)))
}
