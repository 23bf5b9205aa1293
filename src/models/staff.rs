use sqlx::PgPool;

use crate::errors::AppError;

/// Staff account as needed by the login flow.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Staff {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Staff>, AppError> {
    let staff = sqlx::query_as::<_, Staff>(
        "SELECT id, username, display_name, password_hash FROM staff WHERE username = $1",
    )
    .bind(username.trim())
    .fetch_optional(pool)
    .await?;
    Ok(staff)
}

pub async fn create(
    pool: &PgPool,
    username: &str,
    display_name: &str,
    password_hash: &str,
) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO staff (username, display_name, password_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(username)
    .bind(display_name)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn count(pool: &PgPool) -> Result<i64, AppError> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM staff")
        .fetch_one(pool)
        .await?;
    Ok(n)
}
