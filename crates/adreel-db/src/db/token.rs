use adreel_core::{models::AccessToken, AppError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres};

use super::traits::TokenStore;

/// The token table holds a single row under this id.
pub const TOKEN_ROW_ID: &str = "marketing-token";

#[derive(FromRow)]
struct TokenRow {
    access_token: String,
    refresh_token: String,
    token_type: Option<String>,
    scope: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<TokenRow> for AccessToken {
    fn from(row: TokenRow) -> Self {
        AccessToken {
            access_token: row.access_token,
            refresh_token: row.refresh_token,
            token_type: row.token_type,
            scope: row.scope,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

/// Repository for the marketing platform OAuth token
#[derive(Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for TokenRepository {
    #[tracing::instrument(skip(self), fields(db.table = "marketing_tokens", db.operation = "select"))]
    async fn get_token(&self) -> Result<Option<AccessToken>, AppError> {
        let row = sqlx::query_as::<Postgres, TokenRow>(
            r#"
            SELECT access_token, refresh_token, token_type, scope, created_at, expires_at
            FROM marketing_tokens
            WHERE id = $1
            "#,
        )
        .bind(TOKEN_ROW_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AccessToken::from))
    }

    #[tracing::instrument(skip(self, token), fields(db.table = "marketing_tokens", db.operation = "upsert"))]
    async fn save_token(&self, token: &AccessToken) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO marketing_tokens (id, access_token, refresh_token, token_type, scope, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET access_token = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                token_type = EXCLUDED.token_type,
                scope = EXCLUDED.scope,
                created_at = EXCLUDED.created_at,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(TOKEN_ROW_ID)
        .bind(&token.access_token)
        .bind(&token.refresh_token)
        .bind(&token.token_type)
        .bind(&token.scope)
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
