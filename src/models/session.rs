use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// CRM pricing session, keyed by the session id carried in call metadata.
#[derive(sqlx::FromRow)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSession {
    pub id: String,
    pub status: String,
    pub price: Option<f64>,
    #[serde(rename = "smsSent")]
    pub sms_sent: bool,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
