//! Adreel Core Library
//!
//! This crate provides the domain models, error types, configuration, and file validation
//! shared by every adreel component.

pub mod config;
pub mod error;
pub mod models;
pub mod store_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, DatabaseConfig, MarketingConfig, PipelineConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use store_types::RecordStore;
pub use validation::FileValidator;
