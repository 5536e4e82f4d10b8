use std::sync::Arc;

use adreel_core::models::MediaAsset;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct MediaListResponse {
    pub status: &'static str,
    pub data: Vec<MediaAsset>,
}

/// List stored media assets for one media view
#[utoipa::path(
    get,
    path = "/api/v0/media/{media_view}",
    tag = "media",
    params(
        ("media_view" = String, Path, description = "Display grouping the assets were uploaded under")
    ),
    responses(
        (status = 200, description = "Assets in the view, newest first", body = MediaListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(media_view = %media_view))]
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    Path(media_view): Path<String>,
) -> Result<Json<MediaListResponse>, HttpAppError> {
    let data = state.pipeline.list_by_view(&media_view).await?;
    Ok(Json(MediaListResponse {
        status: "success",
        data,
    }))
}
