//! OpenAPI documentation.
//! Served at `crate::constants::OPENAPI_JSON_PATH` and browsable through RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use adreel_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Adreel API",
        version = "0.1.0",
        description = "Uploads creative media to marketing platform ad accounts, waits for processing, and links the same asset across several accounts. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::media_upload::upload_media,
        handlers::media_link::link_media,
        handlers::media_list::list_media,
        handlers::ad_accounts::list_ad_accounts,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::AdAccount,
            models::LinkedAdAccount,
            models::MediaAsset,
            models::UploadStatus,
            handlers::media_upload::UploadMediaResponse,
            handlers::media_link::LinkMediaRequest,
            handlers::media_list::MediaListResponse,
            handlers::ad_accounts::AdAccountListResponse,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "media", description = "Media upload, linking and listing"),
        (name = "adaccounts", description = "Marketing platform ad accounts"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
