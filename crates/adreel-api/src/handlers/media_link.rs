use std::sync::Arc;

use adreel_core::models::{AdAccount, UploadStatus};
use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkMediaRequest {
    #[validate(length(min = 1, message = "mediaId must not be empty"))]
    pub media_id: String,
    #[validate(length(min = 1, message = "adAccounts must not be empty"), nested)]
    pub ad_accounts: Vec<AdAccount>,
}

/// Link a stored media asset to more ad accounts
///
/// The asset is downloaded again and uploaded to every listed account as new remote
/// media. An unknown `mediaId` yields an empty list.
#[utoipa::path(
    post,
    path = "/api/v0/media/link",
    tag = "media",
    request_body = LinkMediaRequest,
    responses(
        (status = 200, description = "Per-account upload outcome", body = [UploadStatus]),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 502, description = "Stored media could not be downloaded", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(media_id = %request.media_id, accounts = request.ad_accounts.len())
)]
pub async fn link_media(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LinkMediaRequest>,
) -> Result<Json<Vec<UploadStatus>>, HttpAppError> {
    let statuses = state
        .pipeline
        .link_existing(&request.media_id, &request.ad_accounts)
        .await?;
    Ok(Json(statuses))
}
