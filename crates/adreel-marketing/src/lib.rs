//! Marketing platform client
//!
//! Typed request/response operations against the remote advertising platform (create media,
//! upload binary, fetch status, list ad accounts, refresh the OAuth token) plus the token
//! provider the pipeline asks for a bearer token before every call. No retry logic lives
//! here.

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod token;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use api::MarketingApi;
pub use client::MarketingClient;
pub use error::MarketingError;
pub use models::{
    CreateMediaItem, MediaEnvelope, MediaResponse, RemoteMedia, TokenResponse,
    UploadMediaResponse, MEDIA_STATUS_READY,
};
pub use token::{StaticTokenProvider, StoredTokenProvider, TokenProvider};
