use sqlx::PgPool;

use crate::errors::AppError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

pub async fn count(pool: &PgPool) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(pool: &PgPool, username: &str, password_hash: &str) -> Result<i64, AppError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO admins (username, password_hash) VALUES ($1, $2) RETURNING id",
    )
    .bind(username.trim())
    .bind(password_hash)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Admin>, AppError> {
    let admin = sqlx::query_as::<_, Admin>(
        "SELECT id, username, password_hash FROM admins WHERE username = $1",
    )
    .bind(username.trim())
    .fetch_optional(pool)
    .await?;
    Ok(admin)
}
