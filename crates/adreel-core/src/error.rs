//! Workspace error type
//!
//! Stores, the marketing client and the pipeline all surface failures as `AppError`.
//! `ErrorMetadata` says how each variant looks once it reaches the HTTP boundary.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Level an error is logged at when it reaches the HTTP boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Caller mistakes: malformed forms, empty link requests
    Debug,
    /// The marketing platform or its credentials misbehaved
    Warn,
    Error,
}

/// How an error is presented to API clients
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Stable code clients can branch on, e.g. `REMOTE_SERVICE_ERROR`
    fn error_code(&self) -> &'static str;

    /// True when repeating the same request may succeed
    fn is_recoverable(&self) -> bool;

    fn suggested_action(&self) -> Option<&'static str>;

    fn client_message(&self) -> String;

    /// Sensitive errors never expose details, whatever the environment
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Remote platform error: {0}")]
    RemoteService(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

struct Presentation {
    status: u16,
    code: &'static str,
    recoverable: bool,
    action: Option<&'static str>,
    sensitive: bool,
    log_level: LogLevel,
}

impl AppError {
    fn presentation(&self) -> Presentation {
        match self {
            AppError::Database(_) => Presentation {
                status: 500,
                code: "DATABASE_ERROR",
                recoverable: true,
                action: Some("Retry after a short delay"),
                sensitive: true,
                log_level: LogLevel::Error,
            },
            AppError::InvalidInput(_) => Presentation {
                status: 400,
                code: "INVALID_INPUT",
                recoverable: false,
                action: Some("Check request parameters and try again"),
                sensitive: false,
                log_level: LogLevel::Debug,
            },
            AppError::BadRequest(_) => Presentation {
                status: 400,
                code: "BAD_REQUEST",
                recoverable: false,
                action: Some("Check the multipart fields and the adAccount JSON"),
                sensitive: false,
                log_level: LogLevel::Debug,
            },
            AppError::RemoteService(_) => Presentation {
                status: 502,
                code: "REMOTE_SERVICE_ERROR",
                recoverable: true,
                action: Some("Retry after a short delay"),
                sensitive: false,
                log_level: LogLevel::Warn,
            },
            AppError::Unauthorized(_) => Presentation {
                status: 401,
                code: "UNAUTHORIZED",
                recoverable: false,
                action: Some("Refresh the marketing platform credentials"),
                sensitive: false,
                log_level: LogLevel::Warn,
            },
            AppError::Internal(_) | AppError::InternalWithSource { .. } => Presentation {
                status: 500,
                code: "INTERNAL_ERROR",
                recoverable: true,
                action: None,
                sensitive: true,
                log_level: LogLevel::Error,
            },
        }
    }

    /// Variant name reported as `error_type` outside production
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::RemoteService(_) => "RemoteService",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Display text followed by up to five `Caused by:` lines from the source chain
    pub fn detailed_message(&self) -> String {
        const MAX_CAUSES: usize = 5;

        use std::error::Error;

        let mut details = self.to_string();
        let mut cause = self.source();
        for _ in 0..MAX_CAUSES {
            let Some(err) = cause else {
                return details;
            };
            details.push_str(&format!("\n  Caused by: {}", err));
            cause = err.source();
        }
        if cause.is_some() {
            details.push_str("\n  ... (truncated)");
        }
        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.presentation().status
    }

    fn error_code(&self) -> &'static str {
        self.presentation().code
    }

    fn is_recoverable(&self) -> bool {
        self.presentation().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.presentation().action
    }

    fn is_sensitive(&self) -> bool {
        self.presentation().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.presentation().log_level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access the record store".to_string(),
            AppError::RemoteService(_) => "The marketing platform request failed".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
            AppError::InvalidInput(msg) | AppError::BadRequest(msg) | AppError::Unauthorized(msg) => {
                msg.clone()
            }
        }
    }
}
