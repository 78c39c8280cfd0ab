use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::auth::password;
use crate::errors::AppError;
use crate::models::admin;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR.run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Create the initial admin account if no admin exists yet.
/// Returns true when an account was created.
pub async fn seed_admin(pool: &PgPool, username: &str, plain_password: &str) -> Result<bool, AppError> {
    let count = admin::count(pool).await?;
    if count > 0 {
        log::info!("{count} admin account(s) present, skipping admin seed");
        return Ok(false);
    }

    let hash = password::hash_password(plain_password).map_err(AppError::Hash)?;
    admin::create(pool, username, &hash).await?;
    log::info!("Seeded admin account '{username}'");
    Ok(true)
}
