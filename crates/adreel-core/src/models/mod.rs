//! Data models for the application
//!
//! Durable records (media assets, marketing tokens), reference entities (ad accounts) and the
//! transient per-upload types the pipeline passes around.

mod ad_account;
mod media_asset;
mod token;
mod upload;

pub use ad_account::*;
pub use media_asset::*;
pub use token::*;
pub use upload::*;
