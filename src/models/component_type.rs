use sqlx::PgPool;

use crate::errors::AppError;

/// Catalog entry for a component variant offered in the builder.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ComponentType {
    pub id: i64,
    pub name: String,
    pub label: String,
    pub sort_order: i64,
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<ComponentType>, AppError> {
    let types = sqlx::query_as::<_, ComponentType>(
        "SELECT id, name, label, sort_order FROM component_types ORDER BY sort_order, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(types)
}

pub async fn find(pool: &PgPool, id: i64) -> Result<ComponentType, AppError> {
    sqlx::query_as::<_, ComponentType>(
        "SELECT id, name, label, sort_order FROM component_types WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}
