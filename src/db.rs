use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::errors::AppError;
use crate::models::staff;

pub type DbPool = PgPool;

pub async fn init_pool(database_url: &str) -> Result<DbPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Create the initial `admin` staff account when no staff exists yet.
pub async fn seed_admin(pool: &DbPool, password_hash: &str) -> Result<(), AppError> {
    if staff::count(pool).await? > 0 {
        return Ok(());
    }
    staff::create(pool, "admin", "Administrator", password_hash).await?;
    log::warn!("Seeded default 'admin' account; change its password");
    Ok(())
}
