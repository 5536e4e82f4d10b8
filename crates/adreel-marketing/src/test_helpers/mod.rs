//! Test helpers for the marketing platform seam
//!
//! A scripted in-memory [`MarketingApi`](crate::MarketingApi) so the pipeline and the HTTP
//! layer can be exercised without network access.

pub mod mock_api;

pub use mock_api::{CallLog, MockMarketingApi};
