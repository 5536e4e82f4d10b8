use adreel_core::{
    models::{LinkedAdAccount, MediaAsset},
    AppError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};

use super::traits::{LinkOutcome, MediaAssetStore};

const ASSET_COLUMNS: &str = "id, name, media_type, status, download_link, remote_created_at, created_on, media_view, linked_ad_accounts";

#[derive(FromRow)]
struct MediaAssetRow {
    id: String,
    name: String,
    media_type: String,
    status: String,
    download_link: Option<String>,
    remote_created_at: Option<String>,
    created_on: DateTime<Utc>,
    media_view: Option<String>,
    linked_ad_accounts: Json<Vec<LinkedAdAccount>>,
}

impl From<MediaAssetRow> for MediaAsset {
    fn from(row: MediaAssetRow) -> Self {
        MediaAsset {
            id: row.id,
            name: row.name,
            media_type: row.media_type,
            status: row.status,
            download_link: row.download_link,
            created_at: row.remote_created_at,
            created_on: row.created_on,
            media_view: row.media_view,
            linked_ad_accounts: row.linked_ad_accounts.0,
        }
    }
}

/// Repository for media assets and their ad account links
#[derive(Clone)]
pub struct MediaAssetRepository {
    pool: PgPool,
}

impl MediaAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM media_assets WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[async_trait]
impl MediaAssetStore for MediaAssetRepository {
    #[tracing::instrument(skip(self), fields(db.table = "media_assets", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: &str) -> Result<Option<MediaAsset>, AppError> {
        let row = sqlx::query_as::<Postgres, MediaAssetRow>(&format!(
            "SELECT {} FROM media_assets WHERE id = $1",
            ASSET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MediaAsset::from))
    }

    /// Single conditional UPDATE; the containment guard keeps `ad_account_id` unique.
    #[tracing::instrument(skip(self, link), fields(db.table = "media_assets", db.operation = "update", db.record_id = %id, ad_account_id = %link.ad_account_id))]
    async fn append_link(&self, id: &str, link: &LinkedAdAccount) -> Result<LinkOutcome, AppError> {
        let updated = sqlx::query_scalar::<Postgres, String>(
            r#"
            UPDATE media_assets
            SET linked_ad_accounts = linked_ad_accounts || jsonb_build_array($2::jsonb),
                updated_at = NOW()
            WHERE id = $1
              AND NOT linked_ad_accounts @> jsonb_build_array(jsonb_build_object('adAccountId', $3::text))
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(Json(link))
        .bind(&link.ad_account_id)
        .fetch_optional(&self.pool)
        .await?;

        if updated.is_some() {
            return Ok(LinkOutcome::Appended);
        }

        if self.exists(id).await? {
            Ok(LinkOutcome::AlreadyLinked)
        } else {
            Ok(LinkOutcome::Missing)
        }
    }

    /// Insert-or-merge in one statement so two first-writers for the same id converge.
    #[tracing::instrument(skip(self, asset), fields(db.table = "media_assets", db.operation = "upsert", db.record_id = %asset.id))]
    async fn create_or_append(&self, asset: &MediaAsset) -> Result<LinkOutcome, AppError> {
        let inserted = sqlx::query_scalar::<Postgres, bool>(
            r#"
            INSERT INTO media_assets (
                id, name, media_type, status, download_link, remote_created_at,
                created_on, media_view, linked_ad_accounts
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE
            SET linked_ad_accounts = media_assets.linked_ad_accounts || (
                    SELECT COALESCE(jsonb_agg(link), '[]'::jsonb)
                    FROM jsonb_array_elements(EXCLUDED.linked_ad_accounts) AS link
                    WHERE NOT media_assets.linked_ad_accounts
                        @> jsonb_build_array(jsonb_build_object('adAccountId', link->'adAccountId'))
                ),
                updated_at = NOW()
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(&asset.id)
        .bind(&asset.name)
        .bind(&asset.media_type)
        .bind(&asset.status)
        .bind(&asset.download_link)
        .bind(&asset.created_at)
        .bind(asset.created_on)
        .bind(&asset.media_view)
        .bind(Json(&asset.linked_ad_accounts))
        .fetch_one(&self.pool)
        .await?;

        Ok(if inserted {
            LinkOutcome::Created
        } else {
            LinkOutcome::Appended
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_assets", db.operation = "select"))]
    async fn list_by_view(&self, media_view: &str) -> Result<Vec<MediaAsset>, AppError> {
        let rows = sqlx::query_as::<Postgres, MediaAssetRow>(&format!(
            "SELECT {} FROM media_assets WHERE media_view = $1 ORDER BY created_on DESC",
            ASSET_COLUMNS
        ))
        .bind(media_view)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MediaAsset::from).collect())
    }
}
