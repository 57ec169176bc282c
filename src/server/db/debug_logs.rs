//! Debug log database operations

use sqlx::PgPool;
use uuid::Uuid;
use crate::models::{DebugLog, NewDebugLog};

pub async fn insert(pool: &PgPool, entry: &NewDebugLog) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO debug_logs (id, function_name, error_type, payload,
                                raw_response, stack_trace, metadata)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&entry.function_name)
    .bind(&entry.error_type)
    .bind(&entry.payload)
    .bind(&entry.raw_response)
    .bind(&entry.stack_trace)
    .bind(&entry.metadata)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_recent(pool: &PgPool, limit: i64) -> Result<Vec<DebugLog>, sqlx::Error> {
    sqlx::query_as::<_, DebugLog>(
        r#"
        SELECT id, function_name, error_type, payload,
               raw_response, stack_trace, metadata, created_at
        FROM debug_logs
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
