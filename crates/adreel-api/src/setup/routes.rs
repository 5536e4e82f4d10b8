//! Route configuration and setup

use crate::constants::{API_PREFIX, OPENAPI_JSON_PATH};
use crate::handlers;
use crate::state::AppState;
use adreel_core::Config;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    tracing::info!(
        max_request_body_bytes = config.max_request_body_bytes(),
        max_upload_size_bytes = config.max_upload_size_bytes(),
        "Request body limits configured"
    );

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            OPENAPI_JSON_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(media_routes())
        .merge(ad_account_routes())
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_JSON_PATH).path("/docs"))
        // Multipart extraction would otherwise cap bodies at axum's 2 MB default
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_request_body_bytes()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Media routes
fn media_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/media/upload", API_PREFIX),
            post(handlers::media_upload::upload_media),
        )
        .route(
            &format!("{}/media/link", API_PREFIX),
            post(handlers::media_link::link_media),
        )
        .route(
            &format!("{}/media/{{media_view}}", API_PREFIX),
            get(handlers::media_list::list_media),
        )
}

/// Ad account routes
fn ad_account_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/adaccounts", API_PREFIX),
        get(handlers::ad_accounts::list_ad_accounts),
    )
}
