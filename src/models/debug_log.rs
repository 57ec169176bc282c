use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A diagnostic entry about to be written. Everything beyond the function
/// name and error-type tag is optional.
#[derive(Debug, Clone, Default)]
pub struct NewDebugLog {
    pub function_name: String,
    pub error_type: String,
    pub payload: Option<serde_json::Value>,
    pub raw_response: Option<String>,
    pub stack_trace: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Append-only diagnostic record. Written best-effort; never read back by
/// the request path.
#[derive(sqlx::FromRow)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugLog {
    pub id: Uuid,
    #[serde(rename = "functionName")]
    pub function_name: String,
    #[serde(rename = "errorType")]
    pub error_type: String,
    pub payload: Option<serde_json::Value>,
    #[serde(rename = "rawResponse")]
    pub raw_response: Option<String>,
    #[serde(rename = "stackTrace")]
    pub stack_trace: Option<String>,
    pub metadata: Option<serde_json::Value>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
