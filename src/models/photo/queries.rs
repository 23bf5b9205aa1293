use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::types::*;
use crate::errors::AppError;

#[derive(sqlx::FromRow)]
struct PhotoRecord {
    id: i64,
    file_key: String,
    tag: String,
    mime_type: String,
    byte_size: i64,
    created_at: DateTime<Utc>,
}

/// All photos, newest first, with their versions attached.
pub async fn find_all(pool: &PgPool) -> Result<Vec<PhotoDetail>, AppError> {
    let photos = sqlx::query_as::<_, PhotoRecord>(
        "SELECT id, file_key, tag, mime_type, byte_size, created_at \
         FROM photos ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    let versions = sqlx::query_as::<_, PhotoVersion>(
        "SELECT photo_id, tier, width, height, byte_size, path \
         FROM photo_versions ORDER BY photo_id, width DESC",
    )
    .fetch_all(pool)
    .await?;

    let items = photos
        .into_iter()
        .map(|p| PhotoDetail {
            versions: versions.iter().filter(|v| v.photo_id == p.id).cloned().collect(),
            id: p.id,
            file_key: p.file_key,
            tag: p.tag,
            mime_type: p.mime_type,
            byte_size: p.byte_size,
            created_at: p.created_at,
        })
        .collect();

    Ok(items)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<PhotoDetail>, AppError> {
    let record = sqlx::query_as::<_, PhotoRecord>(
        "SELECT id, file_key, tag, mime_type, byte_size, created_at FROM photos WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(p) = record else {
        return Ok(None);
    };

    let versions = sqlx::query_as::<_, PhotoVersion>(
        "SELECT photo_id, tier, width, height, byte_size, path \
         FROM photo_versions WHERE photo_id = $1 ORDER BY width DESC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(PhotoDetail {
        id: p.id,
        file_key: p.file_key,
        tag: p.tag,
        mime_type: p.mime_type,
        byte_size: p.byte_size,
        created_at: p.created_at,
        versions,
    }))
}

/// Record a processed upload and its versions in one transaction.
pub async fn create(pool: &PgPool, photo: &NewPhoto) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO photos (file_key, tag, mime_type, byte_size) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&photo.file_key)
    .bind(photo.tag.trim())
    .bind(&photo.mime_type)
    .bind(photo.byte_size)
    .fetch_one(&mut *tx)
    .await?;

    for v in &photo.versions {
        sqlx::query(
            "INSERT INTO photo_versions (photo_id, tier, width, height, byte_size, path) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(&v.tier)
        .bind(v.width)
        .bind(v.height)
        .bind(v.byte_size)
        .bind(&v.path)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(id)
}

pub async fn update_tag(pool: &PgPool, id: i64, tag: &str) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE photos SET tag = $2 WHERE id = $1")
        .bind(id)
        .bind(tag.trim())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Delete a photo; versions go with it through ON DELETE CASCADE.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM photos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
