//! Adreel record store
//!
//! Store traits for media assets and marketing tokens, their PostgreSQL repositories, and
//! in-process implementations used by tests and local runs.

pub mod db;

pub use db::{
    LinkOutcome, MediaAssetRepository, MediaAssetStore, MemoryMediaAssetStore, MemoryTokenStore,
    TokenRepository, TokenStore,
};
