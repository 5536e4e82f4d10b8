//! Configuration module
//!
//! Configuration structures for the HTTP server, the record store, the marketing platform
//! client, and the upload pipeline. Everything is read from the environment (after loading
//! `.env` when present) and validated before the application starts.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::store_types::RecordStore;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MARKETING_HTTP_TIMEOUT_SECS: u64 = 300;
const MAX_UPLOAD_SIZE_BYTES: usize = 33_554_432;
const MAX_FILES_PER_REQUEST: usize = 10;
const POLL_INTERVAL_SECS: u64 = 10;
const POLL_MAX_ATTEMPTS: u32 = 8;
const FAN_OUT_CONCURRENCY: usize = 4;
const UPLOAD_CONCURRENCY: usize = 4;

/// Server settings shared by every entry point
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Ceiling for a whole multipart request (all files plus form fields)
    pub max_request_body_bytes: usize,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            max_request_body_bytes: MAX_UPLOAD_SIZE_BYTES * MAX_FILES_PER_REQUEST,
        }
    }
}

/// Record store settings
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub record_store: RecordStore,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            record_store: RecordStore::Memory,
            database_url: None,
            max_connections: MAX_CONNECTIONS,
            timeout_seconds: CONNECTION_TIMEOUT_SECS,
        }
    }
}

/// Marketing platform (remote media service) settings
#[derive(Clone, Debug)]
pub struct MarketingConfig {
    pub api_base_url: String,
    pub accounts_base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub organization_id: String,
    /// Seed refresh token used when the token table is still empty
    pub refresh_token: Option<String>,
    /// Fixed bearer token; bypasses the token table entirely when set
    pub access_token: Option<String>,
    pub http_timeout_secs: u64,
}

impl Default for MarketingConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://adsapi.snapchat.com/v1".to_string(),
            accounts_base_url: "https://accounts.snapchat.com".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            organization_id: String::new(),
            refresh_token: None,
            access_token: None,
            http_timeout_secs: MARKETING_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Upload, polling and fan-out settings
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Scratch directory holding uploaded and re-downloaded bytes during an operation
    pub upload_dir: PathBuf,
    pub max_upload_size_bytes: usize,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
    pub fan_out_concurrency: usize,
    pub upload_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./upload"),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_BYTES,
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            poll_max_attempts: POLL_MAX_ATTEMPTS,
            fan_out_concurrency: FAN_OUT_CONCURRENCY,
            upload_concurrency: UPLOAD_CONCURRENCY,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub base: BaseConfig,
    pub database: DatabaseConfig,
    pub marketing: MarketingConfig,
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_bytes = env::var("MAX_UPLOAD_SIZE_BYTES")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_BYTES.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_BYTES);

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            max_request_body_bytes: env::var("MAX_REQUEST_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(max_upload_size_bytes * MAX_FILES_PER_REQUEST),
        };

        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        let record_store = match env::var("RECORD_STORE") {
            Ok(value) => value.parse()?,
            Err(_) if database_url.is_some() => RecordStore::Postgres,
            Err(_) => RecordStore::Memory,
        };

        let database = DatabaseConfig {
            record_store,
            database_url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
        };

        let marketing_defaults = MarketingConfig::default();
        let marketing = MarketingConfig {
            api_base_url: env::var("MARKETING_API_BASE_URL")
                .unwrap_or(marketing_defaults.api_base_url),
            accounts_base_url: env::var("MARKETING_ACCOUNTS_BASE_URL")
                .unwrap_or(marketing_defaults.accounts_base_url),
            client_id: env::var("MARKETING_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("MARKETING_CLIENT_SECRET").unwrap_or_default(),
            organization_id: env::var("MARKETING_ORGANIZATION_ID").unwrap_or_default(),
            refresh_token: env::var("MARKETING_REFRESH_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
            access_token: env::var("MARKETING_ACCESS_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
            http_timeout_secs: env::var("MARKETING_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| MARKETING_HTTP_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(MARKETING_HTTP_TIMEOUT_SECS),
        };

        let pipeline = PipelineConfig {
            upload_dir: env::var("MEDIA_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./upload")),
            max_upload_size_bytes,
            poll_interval: Duration::from_secs(
                env::var("MEDIA_POLL_INTERVAL_SECS")
                    .unwrap_or_else(|_| POLL_INTERVAL_SECS.to_string())
                    .parse()
                    .unwrap_or(POLL_INTERVAL_SECS),
            ),
            poll_max_attempts: env::var("MEDIA_POLL_MAX_ATTEMPTS")
                .unwrap_or_else(|_| POLL_MAX_ATTEMPTS.to_string())
                .parse()
                .unwrap_or(POLL_MAX_ATTEMPTS),
            fan_out_concurrency: env::var("FAN_OUT_CONCURRENCY")
                .unwrap_or_else(|_| FAN_OUT_CONCURRENCY.to_string())
                .parse()
                .unwrap_or(FAN_OUT_CONCURRENCY),
            upload_concurrency: env::var("UPLOAD_CONCURRENCY")
                .unwrap_or_else(|_| UPLOAD_CONCURRENCY.to_string())
                .parse()
                .unwrap_or(UPLOAD_CONCURRENCY),
        };

        let config = Config {
            base,
            database,
            marketing,
            pipeline,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.database.record_store == RecordStore::Postgres {
            match self.database.database_url.as_deref() {
                Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {}
                _ => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string when RECORD_STORE=postgres"
                    ))
                }
            }
        }

        if self.marketing.access_token.is_none() {
            if self.marketing.client_id.is_empty() || self.marketing.client_secret.is_empty() {
                return Err(anyhow::anyhow!(
                    "MARKETING_CLIENT_ID and MARKETING_CLIENT_SECRET must be set unless MARKETING_ACCESS_TOKEN is provided"
                ));
            }
        }

        if self.pipeline.poll_max_attempts == 0 {
            return Err(anyhow::anyhow!("MEDIA_POLL_MAX_ATTEMPTS must be at least 1"));
        }

        if self.pipeline.fan_out_concurrency == 0 || self.pipeline.upload_concurrency == 0 {
            return Err(anyhow::anyhow!(
                "FAN_OUT_CONCURRENCY and UPLOAD_CONCURRENCY must be at least 1"
            ));
        }

        if self.pipeline.max_upload_size_bytes > self.base.max_request_body_bytes {
            return Err(anyhow::anyhow!(
                "MAX_REQUEST_BODY_BYTES must not be smaller than MAX_UPLOAD_SIZE_BYTES"
            ));
        }

        Ok(())
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.pipeline.max_upload_size_bytes
    }

    pub fn max_request_body_bytes(&self) -> usize {
        self.base.max_request_body_bytes
    }
}
