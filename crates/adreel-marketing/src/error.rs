use adreel_core::AppError;

#[derive(Debug, thiserror::Error)]
pub enum MarketingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Marketing API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to read media file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected marketing API response: {0}")]
    Decode(String),

    #[error("Access token unavailable: {0}")]
    Token(String),

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<MarketingError> for AppError {
    fn from(err: MarketingError) -> Self {
        match err {
            MarketingError::Store(inner) => inner,
            MarketingError::Token(msg) => AppError::Unauthorized(msg),
            MarketingError::Status { status: 401, body } => AppError::Unauthorized(body),
            other => AppError::RemoteService(other.to_string()),
        }
    }
}
