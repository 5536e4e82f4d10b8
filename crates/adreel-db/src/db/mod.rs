//! Database repositories for the data access layer
//
// Store traits shared by every backend
pub mod traits;
//
// PostgreSQL repositories
pub mod media_asset;
pub mod token;
//
// In-process stores
pub mod memory;

pub use media_asset::MediaAssetRepository;
pub use memory::{MemoryMediaAssetStore, MemoryTokenStore};
pub use token::TokenRepository;
pub use traits::{LinkOutcome, MediaAssetStore, TokenStore};
