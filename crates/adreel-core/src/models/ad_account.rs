use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Advertiser account on the marketing platform. Not owned by adreel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct AdAccount {
    #[validate(length(min = 1, message = "ad account id must not be empty"))]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl AdAccount {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
