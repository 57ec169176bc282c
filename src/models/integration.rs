use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Tenant-owned provider credentials, keyed by (tenant_id, provider).
#[derive(sqlx::FromRow)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    #[serde(rename = "tenantId")]
    pub tenant_id: String,
    pub provider: String,
    #[serde(rename = "accountSid")]
    pub account_sid: Option<String>,
    #[serde(rename = "authToken")]
    pub auth_token: Option<String>,
    #[serde(rename = "senderNumber")]
    pub sender_number: Option<String>,
    #[serde(rename = "regionalSenderNumber")]
    pub regional_sender_number: Option<String>,
    pub enabled: bool,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
