//! Database helpers for image rows.

use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::types::ImageResponse;
use crate::api::error::ApiError;

#[derive(Debug)]
pub(crate) struct ImageRow {
    pub(crate) id: Uuid,
    pub(crate) uri: String,
    pub(crate) hits: i64,
    pub(crate) owner_id: Uuid,
    pub(crate) created_at: String,
    pub(crate) deleted_at: Option<String>,
}

impl ImageRow {
    /// Convert to the API payload; drops `owner_id` on purpose.
    pub(crate) fn into_response(self) -> ImageResponse {
        ImageResponse {
            id: self.id.to_string(),
            uri: self.uri,
            hits: self.hits,
            created_at: self.created_at,
            deleted_at: self.deleted_at,
        }
    }
}

const IMAGE_COLUMNS: &str = r#"id, uri, hits, owner_id,
       to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
       to_char(deleted_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS deleted_at"#;

fn image_from_row(row: &sqlx::postgres::PgRow) -> ImageRow {
    ImageRow {
        id: row.get("id"),
        uri: row.get("uri"),
        hits: row.get("hits"),
        owner_id: row.get("owner_id"),
        created_at: row.get("created_at"),
        deleted_at: row.get("deleted_at"),
    }
}

pub(crate) async fn insert_image(
    pool: &PgPool,
    uri: &str,
    owner_id: Uuid,
) -> Result<ImageRow, ApiError> {
    let query = format!(
        r"INSERT INTO images (uri, owner_id)
          VALUES ($1, $2)
          RETURNING {IMAGE_COLUMNS}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = %query
    );
    let row = sqlx::query(&query)
        .bind(uri)
        .bind(owner_id)
        .fetch_one(pool)
        .instrument(span)
        .await?;

    Ok(image_from_row(&row))
}

/// Load an image by id. Soft-deleted rows are only visible when
/// `include_deleted` is set (admin reads).
pub(crate) async fn find_image(
    pool: &PgPool,
    id: Uuid,
    include_deleted: bool,
) -> Result<Option<ImageRow>, ApiError> {
    let filter = if include_deleted {
        ""
    } else {
        " AND deleted_at IS NULL"
    };
    let query = format!("SELECT {IMAGE_COLUMNS} FROM images WHERE id = $1{filter}");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = %query
    );
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.as_ref().map(image_from_row))
}

/// Bump the hit counter and return the new value.
pub(crate) async fn increment_hits(pool: &PgPool, id: Uuid) -> Result<i64, ApiError> {
    let query = "UPDATE images SET hits = hits + 1 WHERE id = $1 RETURNING hits";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(id)
        .fetch_one(pool)
        .instrument(span)
        .await?;

    Ok(row.get("hits"))
}

/// Patch `uri` and `hits`; absent fields keep their stored values.
pub(crate) async fn update_image(
    pool: &PgPool,
    id: Uuid,
    uri: Option<&str>,
    hits: Option<i64>,
) -> Result<ImageRow, ApiError> {
    let query = format!(
        r"UPDATE images
          SET uri = COALESCE($2, uri),
              hits = COALESCE($3, hits)
          WHERE id = $1
          RETURNING {IMAGE_COLUMNS}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = %query
    );
    let row = sqlx::query(&query)
        .bind(id)
        .bind(uri)
        .bind(hits)
        .fetch_one(pool)
        .instrument(span)
        .await?;

    Ok(image_from_row(&row))
}

/// Soft delete: stamp `deleted_at`, keep the row.
pub(crate) async fn soft_delete_image(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let query = "UPDATE images SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(id)
        .execute(pool)
        .instrument(span)
        .await?;

    Ok(())
}
