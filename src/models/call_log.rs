use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLog {
    pub id: i64,
    #[serde(rename = "externalCallId")]
    pub external_call_id: String,
    #[serde(rename = "customerName")]
    pub customer_name: Option<String>,
    #[serde(rename = "customerNumber")]
    pub customer_number: Option<String>,
    #[serde(rename = "companyId")]
    pub company_id: Option<String>,
    #[serde(rename = "prospectId")]
    pub prospect_id: Option<String>,
    #[serde(rename = "productName")]
    pub product_name: Option<String>,
    pub status: CallLogStatus,
    pub outcome: Option<CallOutcome>,
    #[serde(rename = "connectionStatus")]
    pub connection_status: Option<ConnectionStatus>,
    #[serde(rename = "durationDisplay")]
    pub duration_display: Option<String>,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub cost: Option<f64>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::Type)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "call_log_status", rename_all = "lowercase")]
pub enum CallLogStatus {
    Queued,
    Completed,
}

/// Categorical outcome derived by the classifier at end of call.
#[derive(sqlx::Type)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "call_outcome", rename_all = "lowercase")]
pub enum CallOutcome {
    Completed,
    Issue,
    Sale,
}

#[derive(sqlx::Type)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "connection_status", rename_all = "UPPERCASE")]
pub enum ConnectionStatus {
    Success,
    Fail,
}

/// Fields written back to the call log by the end-of-call reconciler.
#[derive(Debug, Clone, PartialEq)]
pub struct CallLogUpdate {
    pub outcome: CallOutcome,
    pub connection_status: ConnectionStatus,
    pub duration_display: String,
    pub transcript: String,
    pub summary: String,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceCallRequest {
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "customerName")]
    pub customer_name: Option<String>,
    #[serde(rename = "companyId")]
    pub company_id: Option<String>,
    #[serde(rename = "prospectId")]
    pub prospect_id: Option<String>,
    #[serde(rename = "productName")]
    pub product_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceCallResponse {
    #[serde(rename = "callId")]
    pub call_id: i64,
    #[serde(rename = "externalCallId")]
    pub external_call_id: String,
}
