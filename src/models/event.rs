use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical event categories after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    ToolCalls,
    EndOfCall,
    CallUpdate,
    Unknown,
}

/// A single event from the voice provider, resolved from whichever of the
/// historical payload shapes it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvent {
    pub kind: EventKind,
    pub call: Option<CallSnapshot>,
    pub tool_calls: Vec<ToolCallRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub number: Option<String>,
}

/// Metadata attached to the call when it was placed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallMetadata {
    #[serde(rename = "companyId")]
    pub company_id: Option<String>,
    #[serde(rename = "prospectId")]
    pub prospect_id: Option<String>,
    #[serde(rename = "productName")]
    pub product_name: Option<String>,
}

/// Read-only snapshot of the provider's call object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallSnapshot {
    pub id: String,
    pub customer: CustomerInfo,
    pub duration_seconds: f64,
    pub ended_reason: String,
    pub analysis_summary: String,
    pub transcript: String,
    pub cost: f64,
    pub tool_calls_used: Vec<ToolCallRequest>,
    pub metadata: CallMetadata,
}

/// An action the voice agent asked the backend to perform mid-call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    #[serde(rename = "functionName")]
    pub function_name: String,
    /// Either a JSON-encoded string or a structured object.
    pub arguments: Value,
}

impl ToolCallRequest {
    /// Resolve `arguments` to a structured map. A malformed JSON string
    /// resolves to the empty map rather than failing the dispatch.
    pub fn parsed_arguments(&self) -> Map<String, Value> {
        match &self.arguments {
            Value::Object(map) => map.clone(),
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
            _ => Map::new(),
        }
    }
}

/// Per-request dispatch outcome. Exactly one of `result`/`error` is set,
/// and the response sequence mirrors the request sequence 1:1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    #[serde(rename = "toolCallId")]
    pub tool_call_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolCallResult {
    pub fn ok(tool_call_id: &str, result: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.to_string(),
            result: Some(result.into()),
            error: None,
        }
    }

    pub fn err(tool_call_id: &str, error: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.to_string(),
            result: None,
            error: Some(error.into()),
        }
    }
}
