//! Call log database operations

use sqlx::PgPool;
use crate::models::{CallLog, CallLogUpdate, PlaceCallRequest};

const CALL_LOG_COLUMNS: &str = r#"
    id, external_call_id, customer_name, customer_number,
    company_id, prospect_id, product_name,
    status, outcome, connection_status,
    duration_display, transcript, summary, cost,
    created_at, updated_at
"#;

/// Create the queued row at call placement time.
pub async fn insert_queued(
    pool: &PgPool,
    external_call_id: &str,
    req: &PlaceCallRequest,
) -> Result<CallLog, sqlx::Error> {
    sqlx::query_as::<_, CallLog>(&format!(
        r#"
        INSERT INTO call_logs (external_call_id, customer_name, customer_number,
                               company_id, prospect_id, product_name, status)
        VALUES ($1, $2, $3, $4, $5, $6, 'queued')
        RETURNING {CALL_LOG_COLUMNS}
        "#
    ))
    .bind(external_call_id)
    .bind(&req.customer_name)
    .bind(&req.phone_number)
    .bind(&req.company_id)
    .bind(&req.prospect_id)
    .bind(&req.product_name)
    .fetch_one(pool)
    .await
}

/// Finalize the row for an ended call. Update-only: a missing row, or one
/// already completed by an earlier delivery of the same event, affects
/// zero rows.
pub async fn finalize(
    pool: &PgPool,
    external_call_id: &str,
    update: &CallLogUpdate,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE call_logs
        SET status = 'completed',
            outcome = $2,
            connection_status = $3,
            duration_display = $4,
            transcript = $5,
            summary = $6,
            cost = $7,
            updated_at = NOW()
        WHERE external_call_id = $1 AND status <> 'completed'
        "#,
    )
    .bind(external_call_id)
    .bind(update.outcome)
    .bind(update.connection_status)
    .bind(&update.duration_display)
    .bind(&update.transcript)
    .bind(&update.summary)
    .bind(update.cost)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn get_recent(pool: &PgPool, limit: i64) -> Result<Vec<CallLog>, sqlx::Error> {
    sqlx::query_as::<_, CallLog>(&format!(
        r#"
        SELECT {CALL_LOG_COLUMNS}
        FROM call_logs
        ORDER BY created_at DESC
        LIMIT $1
        "#
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}
