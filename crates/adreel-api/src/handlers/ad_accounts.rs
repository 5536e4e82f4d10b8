use std::sync::Arc;

use adreel_core::models::AdAccount;
use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct AdAccountListResponse {
    pub data: Vec<AdAccount>,
}

/// List the organization's ad accounts
#[utoipa::path(
    get,
    path = "/api/v0/adaccounts",
    tag = "adaccounts",
    responses(
        (status = 200, description = "Ad accounts of the configured organization", body = AdAccountListResponse),
        (status = 401, description = "Marketing platform rejected the credentials", body = ErrorResponse),
        (status = 502, description = "Marketing platform error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_ad_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdAccountListResponse>, HttpAppError> {
    let data = state.pipeline.list_ad_accounts().await?;
    Ok(Json(AdAccountListResponse { data }))
}
