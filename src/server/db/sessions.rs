//! Pricing session database operations

use sqlx::PgPool;
use crate::models::PricingSession;

/// Upsert the session with the discounted price. The row may not exist yet
/// when the agent offers a discount before the CRM created the session.
pub async fn apply_discount(
    pool: &PgPool,
    session_id: &str,
    new_price: f64,
) -> Result<PricingSession, sqlx::Error> {
    sqlx::query_as::<_, PricingSession>(
        r#"
        INSERT INTO pricing_sessions (id, status, price, updated_at)
        VALUES ($1, 'discounted', $2, NOW())
        ON CONFLICT (id) DO UPDATE
        SET status = 'discounted', price = $2, updated_at = NOW()
        RETURNING id, status, price, sms_sent, updated_at
        "#,
    )
    .bind(session_id)
    .bind(new_price)
    .fetch_one(pool)
    .await
}

/// Record that a pitch SMS went out for this session.
pub async fn mark_sms_sent(pool: &PgPool, session_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO pricing_sessions (id, sms_sent, updated_at)
        VALUES ($1, TRUE, NOW())
        ON CONFLICT (id) DO UPDATE
        SET sms_sent = TRUE, updated_at = NOW()
        "#,
    )
    .bind(session_id)
    .execute(pool)
    .await?;
    Ok(())
}
