//! Inbound voice-provider webhook
//!
//! The provider has shipped several payload shapes over time: the call
//! object at the root or under `message`, tool calls at either level or
//! inside the call object, and tool-call events that omit the declared
//! type entirely. The normalizer accepts all of them and produces one
//! typed event; missing fields at any depth come out as "absent", never
//! as an error.
//!
//! The handler always answers 200 with a JSON body. The provider retries
//! aggressively on anything else, and a retry means duplicate side
//! effects.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::models::{
    CallMetadata, CallSnapshot, CustomerInfo, EventKind, NewDebugLog, NormalizedEvent,
    ToolCallRequest,
};
use super::dispatch::CallContext;
use super::outcome::classify;
use super::AppState;

/// Resolve a raw inbound payload into a typed event. Total: any JSON value
/// normalizes, a non-object just normalizes to `Unknown`.
pub fn normalize_event(body: &Value) -> NormalizedEvent {
    let call_value = body
        .get("call")
        .filter(|v| v.is_object())
        .or_else(|| body.pointer("/message/call").filter(|v| v.is_object()));

    let declared_kind = body
        .get("type")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/message/type").and_then(Value::as_str));

    let tool_calls = first_tool_call_list(body, call_value);

    // Some historical shapes omit the type field on tool-call events, so a
    // non-empty tool-call list wins over whatever the payload declares.
    let kind = if !tool_calls.is_empty() {
        EventKind::ToolCalls
    } else {
        match declared_kind {
            Some("tool-calls") => EventKind::ToolCalls,
            Some("end-of-call-report") => EventKind::EndOfCall,
            Some("status-update") => EventKind::CallUpdate,
            _ => EventKind::Unknown,
        }
    };

    NormalizedEvent {
        kind,
        call: call_value.map(|call| snapshot_from_value(call, body)),
        tool_calls,
    }
}

/// First defined, non-empty tool-call sequence among the known locations.
fn first_tool_call_list(body: &Value, call: Option<&Value>) -> Vec<ToolCallRequest> {
    let candidates = [
        body.get("toolCalls"),
        body.pointer("/message/toolCalls"),
        call.and_then(|c| c.get("toolCalls")),
    ];

    for candidate in candidates {
        let parsed = tool_call_list(candidate);
        if !parsed.is_empty() {
            return parsed;
        }
    }
    Vec::new()
}

fn tool_call_list(value: Option<&Value>) -> Vec<ToolCallRequest> {
    value
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(parse_tool_call).collect())
        .unwrap_or_default()
}

/// Accepts both the flat `{id, functionName, arguments}` shape and the
/// nested `{id, function: {name, arguments}}` one. Entries without an id
/// or name cannot be correlated back to the provider and are dropped.
fn parse_tool_call(value: &Value) -> Option<ToolCallRequest> {
    let id = value.get("id").and_then(Value::as_str)?.to_string();
    let function = value.get("function").filter(|v| v.is_object());

    let function_name = value
        .get("functionName")
        .and_then(Value::as_str)
        .or_else(|| function.and_then(|f| f.get("name")).and_then(Value::as_str))
        .or_else(|| value.get("name").and_then(Value::as_str))?
        .to_string();

    let arguments = value
        .get("arguments")
        .or_else(|| function.and_then(|f| f.get("arguments")))
        .cloned()
        .unwrap_or(Value::Null);

    Some(ToolCallRequest {
        id,
        function_name,
        arguments,
    })
}

/// Build the read-only call snapshot, probing the call object first and the
/// surrounding message for fields older shapes kept at the top level.
fn snapshot_from_value(call: &Value, body: &Value) -> CallSnapshot {
    let message = body.get("message").unwrap_or(&Value::Null);

    CallSnapshot {
        id: call
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        customer: CustomerInfo {
            name: call
                .pointer("/customer/name")
                .and_then(Value::as_str)
                .map(str::to_string),
            number: call
                .pointer("/customer/number")
                .and_then(Value::as_str)
                .or_else(|| call.pointer("/customer/phoneNumber").and_then(Value::as_str))
                .map(str::to_string),
        },
        duration_seconds: call
            .get("durationSeconds")
            .and_then(Value::as_f64)
            .or_else(|| message.get("durationSeconds").and_then(Value::as_f64))
            .or_else(|| body.get("durationSeconds").and_then(Value::as_f64))
            .unwrap_or(0.0),
        ended_reason: call
            .get("endedReason")
            .and_then(Value::as_str)
            .or_else(|| message.get("endedReason").and_then(Value::as_str))
            .unwrap_or_default()
            .to_string(),
        analysis_summary: call
            .pointer("/analysis/summary")
            .and_then(Value::as_str)
            .or_else(|| message.pointer("/analysis/summary").and_then(Value::as_str))
            .or_else(|| call.get("summary").and_then(Value::as_str))
            .or_else(|| message.get("summary").and_then(Value::as_str))
            .unwrap_or_default()
            .to_string(),
        transcript: call
            .pointer("/artifact/transcript")
            .and_then(Value::as_str)
            .or_else(|| call.get("transcript").and_then(Value::as_str))
            .or_else(|| message.get("transcript").and_then(Value::as_str))
            .unwrap_or_default()
            .to_string(),
        cost: call
            .get("cost")
            .and_then(Value::as_f64)
            .or_else(|| message.get("cost").and_then(Value::as_f64))
            .unwrap_or(0.0),
        tool_calls_used: tool_call_list(
            call.get("toolCallsUsed")
                .or_else(|| message.get("toolCallsUsed")),
        ),
        metadata: call
            .get("metadata")
            .or_else(|| message.get("metadata"))
            .and_then(|v| serde_json::from_value::<CallMetadata>(v.clone()).ok())
            .unwrap_or_default(),
    }
}

/// The webhook entry point. Accepts the body as a raw string so even a
/// malformed payload gets a 200 acknowledgement instead of a transport
/// error the provider would retry.
pub async fn handle_voice_webhook(State(state): State<Arc<AppState>>, body: String) -> Json<Value> {
    let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let event = normalize_event(&payload);

    match event.kind {
        EventKind::ToolCalls => {
            let ctx = event
                .call
                .as_ref()
                .map(CallContext::from_snapshot)
                .unwrap_or_default();

            tracing::info!(
                "Dispatching {} tool call(s) (tenant: {:?})",
                event.tool_calls.len(),
                ctx.tenant_id
            );

            let results = state.dispatcher.dispatch_all(&event.tool_calls, &ctx).await;
            Json(json!({ "results": results }))
        }
        EventKind::EndOfCall => {
            let Some(call) = event.call else {
                state
                    .debug
                    .log(NewDebugLog {
                        function_name: "voiceWebhook".to_string(),
                        error_type: "missing_call".to_string(),
                        payload: Some(payload),
                        ..Default::default()
                    })
                    .await;
                return Json(json!({ "error": "end-of-call event with no call object" }));
            };

            let (outcome, connection_status) = classify(&call);
            tracing::info!(
                "End of call {}: outcome {:?}, connection {:?}",
                call.id,
                outcome,
                connection_status
            );

            match state.reconciler.reconcile(&call, outcome, connection_status).await {
                Ok(_) => Json(json!({ "success": true })),
                Err(e) => {
                    tracing::error!("Call log reconciliation failed for {}: {}", call.id, e);
                    state
                        .debug
                        .log(NewDebugLog {
                            function_name: "voiceWebhook".to_string(),
                            error_type: "reconcile_error".to_string(),
                            raw_response: Some(e.to_string()),
                            metadata: Some(json!({ "callId": call.id })),
                            ..Default::default()
                        })
                        .await;
                    Json(json!({ "error": e.to_string() }))
                }
            }
        }
        EventKind::CallUpdate => Json(json!({ "success": true })),
        EventKind::Unknown => {
            state
                .debug
                .log(NewDebugLog {
                    function_name: "voiceWebhook".to_string(),
                    error_type: "unknown_event".to_string(),
                    payload: Some(payload),
                    ..Default::default()
                })
                .await;
            Json(json!({ "success": true }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call_object() -> Value {
        json!({
            "id": "call-123",
            "customer": { "name": "Dana", "number": "+14165551234" },
            "durationSeconds": 95.0,
            "endedReason": "customer-ended-call",
            "analysis": { "summary": "went well" },
            "metadata": { "companyId": "acme", "prospectId": "p-9", "productName": "Starter Kit" }
        })
    }

    fn tool_calls() -> Value {
        json!([
            { "id": "tc-1", "functionName": "sendSms", "arguments": { "phoneNumber": "+14155551212", "message": "hi" } }
        ])
    }

    #[test]
    fn three_historical_shapes_normalize_identically() {
        let root_shape = json!({
            "type": "tool-calls",
            "call": call_object(),
            "toolCalls": tool_calls(),
        });
        let message_shape = json!({
            "message": {
                "type": "tool-calls",
                "call": call_object(),
                "toolCalls": tool_calls(),
            }
        });
        let mixed_shape = json!({
            "call": {
                "id": "call-123",
                "customer": { "name": "Dana", "number": "+14165551234" },
                "durationSeconds": 95.0,
                "endedReason": "customer-ended-call",
                "analysis": { "summary": "went well" },
                "metadata": { "companyId": "acme", "prospectId": "p-9", "productName": "Starter Kit" },
                "toolCalls": tool_calls(),
            }
        });

        let a = normalize_event(&root_shape);
        let b = normalize_event(&message_shape);
        let c = normalize_event(&mixed_shape);

        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.kind, EventKind::ToolCalls);
        assert_eq!(a.tool_calls.len(), 1);
        assert_eq!(a.tool_calls[0].function_name, "sendSms");
        assert_eq!(a.call.as_ref().map(|c| c.id.as_str()), Some("call-123"));
    }

    #[test]
    fn empty_payload_normalizes_without_error() {
        for payload in [json!({}), Value::Null, json!([]), json!("noise")] {
            let event = normalize_event(&payload);
            assert_eq!(event.kind, EventKind::Unknown);
            assert!(event.call.is_none());
            assert!(event.tool_calls.is_empty());
        }
    }

    #[test]
    fn tool_call_presence_beats_declared_type() {
        let payload = json!({
            "type": "status-update",
            "toolCalls": tool_calls(),
        });
        assert_eq!(normalize_event(&payload).kind, EventKind::ToolCalls);
    }

    #[test]
    fn empty_tool_call_list_does_not_force_tool_calls_kind() {
        let payload = json!({
            "type": "status-update",
            "toolCalls": [],
        });
        assert_eq!(normalize_event(&payload).kind, EventKind::CallUpdate);
    }

    #[test]
    fn end_of_call_report_resolves_from_message_level_fields() {
        let payload = json!({
            "message": {
                "type": "end-of-call-report",
                "endedReason": "assistant-ended-call",
                "durationSeconds": 42.0,
                "analysis": { "summary": "short call" },
                "call": { "id": "call-7" },
            }
        });

        let event = normalize_event(&payload);
        assert_eq!(event.kind, EventKind::EndOfCall);
        let call = event.call.expect("call snapshot");
        assert_eq!(call.id, "call-7");
        assert_eq!(call.ended_reason, "assistant-ended-call");
        assert_eq!(call.duration_seconds, 42.0);
        assert_eq!(call.analysis_summary, "short call");
    }

    #[test]
    fn nested_function_tool_call_shape_is_accepted() {
        let payload = json!({
            "toolCalls": [
                { "id": "tc-9", "function": { "name": "reportIssue", "arguments": "{\"subject\":\"x\"}" } }
            ]
        });

        let event = normalize_event(&payload);
        assert_eq!(event.tool_calls.len(), 1);
        assert_eq!(event.tool_calls[0].function_name, "reportIssue");
        assert_eq!(
            event.tool_calls[0].parsed_arguments().get("subject"),
            Some(&json!("x"))
        );
    }

    #[test]
    fn unparseable_tool_entries_are_dropped() {
        let payload = json!({
            "toolCalls": [
                { "no": "id" },
                { "id": "tc-1", "functionName": "sendSms" }
            ]
        });
        let event = normalize_event(&payload);
        assert_eq!(event.tool_calls.len(), 1);
        assert_eq!(event.tool_calls[0].id, "tc-1");
    }
}
