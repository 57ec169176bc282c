//! Tenant integration credential lookups

use sqlx::PgPool;
use crate::models::Integration;

pub async fn get_enabled(
    pool: &PgPool,
    tenant_id: &str,
    provider: &str,
) -> Result<Option<Integration>, sqlx::Error> {
    sqlx::query_as::<_, Integration>(
        r#"
        SELECT tenant_id, provider, account_sid, auth_token, sender_number,
               regional_sender_number, enabled, updated_at
        FROM integrations
        WHERE tenant_id = $1 AND provider = $2 AND enabled
        "#,
    )
    .bind(tenant_id)
    .bind(provider)
    .fetch_optional(pool)
    .await
}
