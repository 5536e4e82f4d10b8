//! API constants
//!
//! All versioned endpoints live under [`API_PREFIX`].

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Current API version
pub const API_VERSION: &str = "v0";

/// Versioned route prefix, e.g. `/api/v0`
pub const API_PREFIX: &str = "/api/v0";

/// Location of the generated OpenAPI document
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Multipart field carrying the JSON array of target ad accounts
pub const AD_ACCOUNT_FIELD: &str = "adAccount";
