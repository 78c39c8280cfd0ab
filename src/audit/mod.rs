use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::errors::AppError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub admin_id: i64,
    pub username: String,
    pub action: String,
    pub target_type: String,
    pub target_id: i64,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// Record a mutation. `details` should carry a human readable `summary`.
pub async fn log(
    pool: &PgPool,
    admin_id: i64,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO audit_log (admin_id, action, target_type, target_id, details) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(admin_id)
    .bind(action)
    .bind(target_type)
    .bind(target_id)
    .bind(details.to_string())
    .execute(pool)
    .await?;
    Ok(())
}

/// Same as [`log`], but failures are only logged. Used from request handlers
/// where the mutation has already succeeded.
pub async fn record(
    pool: &PgPool,
    admin_id: i64,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) {
    if let Err(e) = log(pool, admin_id, action, target_type, target_id, details).await {
        log::warn!("Audit log failed for {action} on {target_type} {target_id}: {e}");
    }
}

/// Most recent entries first.
pub async fn find_recent(pool: &PgPool, limit: i64) -> Result<Vec<AuditEntry>, AppError> {
    let entries = sqlx::query_as::<_, AuditEntry>(
        "SELECT a.id, a.admin_id, COALESCE(ad.username, 'unknown') AS username, \
                a.action, a.target_type, a.target_id, \
                COALESCE(a.details::jsonb ->> 'summary', '') AS summary, \
                a.created_at \
         FROM audit_log a \
         LEFT JOIN admins ad ON ad.id = a.admin_id \
         ORDER BY a.created_at DESC, a.id DESC \
         LIMIT $1",
    )
    .bind(limit.clamp(1, 500))
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Delete entries older than the retention window. Returns the number removed.
pub async fn cleanup_old_entries(pool: &PgPool, retention_days: i64) -> Result<u64, AppError> {
    if retention_days <= 0 {
        return Ok(0);
    }
    let cutoff = Utc::now() - Duration::days(retention_days);
    let result = sqlx::query("DELETE FROM audit_log WHERE created_at < $1")
        .bind(cutoff)
        .execute(pool)
        .await?;
    let removed = result.rows_affected();
    if removed > 0 {
        log::info!("Removed {removed} audit entries older than {retention_days} days");
    }
    Ok(removed)
}
