//! Tool-call dispatch
//!
//! Executes agent-requested actions against external systems. Requests run
//! strictly in order (later tools may depend on state earlier ones wrote,
//! and the providers are rate-sensitive) and every request gets exactly one
//! result in the same position, whatever happens to its siblings.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use sqlx::PgPool;

use crate::models::{CallSnapshot, NewDebugLog, ToolCallRequest, ToolCallResult};
use super::credentials::{CredentialError, CredentialResolver};
use super::db;
use super::debug_log::DebugLogger;
use super::twilio::SmsGateway;
use super::zendesk::{TicketRequest, TicketSink};

/// Argument key aliases the agent has been observed using.
const PHONE_KEYS: &[&str] = &["phoneNumber", "number", "recipient", "to", "phone"];
const MESSAGE_KEYS: &[&str] = &["message", "body", "content", "text", "smsMessage"];

/// Ambient call metadata carried into every tool-call branch.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    pub tenant_id: Option<String>,
    /// Doubles as the pricing-session key.
    pub prospect_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_number: Option<String>,
}

impl CallContext {
    pub fn from_snapshot(call: &CallSnapshot) -> Self {
        Self {
            tenant_id: call.metadata.company_id.clone(),
            prospect_id: call.metadata.prospect_id.clone(),
            customer_name: call.customer.name.clone(),
            customer_number: call.customer.number.clone(),
        }
    }
}

/// Pricing-session persistence seam.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn apply_discount(&self, session_id: &str, new_price: f64) -> Result<(), sqlx::Error>;
    async fn mark_sms_sent(&self, session_id: &str) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl SessionStore for PgPool {
    async fn apply_discount(&self, session_id: &str, new_price: f64) -> Result<(), sqlx::Error> {
        db::sessions::apply_discount(self, session_id, new_price).await?;
        Ok(())
    }

    async fn mark_sms_sent(&self, session_id: &str) -> Result<(), sqlx::Error> {
        db::sessions::mark_sms_sent(self, session_id).await
    }
}

pub struct ToolDispatcher {
    resolver: CredentialResolver,
    sms: Arc<dyn SmsGateway>,
    tickets: Arc<dyn TicketSink>,
    sessions: Arc<dyn SessionStore>,
    debug: DebugLogger,
}

impl ToolDispatcher {
    pub fn new(
        resolver: CredentialResolver,
        sms: Arc<dyn SmsGateway>,
        tickets: Arc<dyn TicketSink>,
        sessions: Arc<dyn SessionStore>,
        debug: DebugLogger,
    ) -> Self {
        Self {
            resolver,
            sms,
            tickets,
            sessions,
            debug,
        }
    }

    /// One result per request, same order. A failure in one request never
    /// touches its siblings.
    pub async fn dispatch_all(
        &self,
        requests: &[ToolCallRequest],
        ctx: &CallContext,
    ) -> Vec<ToolCallResult> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.dispatch_one(request, ctx).await);
        }
        results
    }

    async fn dispatch_one(&self, request: &ToolCallRequest, ctx: &CallContext) -> ToolCallResult {
        match request.function_name.as_str() {
            "sendSms" => self.send_sms(request, ctx).await,
            "reportIssue" => self.report_issue(request, ctx).await,
            "offerDiscount" => self.offer_discount(request, ctx).await,
            other => {
                tracing::warn!("Unsupported tool call: {}", other);
                ToolCallResult::err(&request.id, format!("unsupported tool: {}", other))
            }
        }
    }

    async fn send_sms(&self, request: &ToolCallRequest, ctx: &CallContext) -> ToolCallResult {
        let args = request.parsed_arguments();

        let Some(to) = first_string(&args, PHONE_KEYS) else {
            return ToolCallResult::err(&request.id, "missing phone number");
        };
        let Some(body) = first_string(&args, MESSAGE_KEYS) else {
            return ToolCallResult::err(&request.id, "missing message body");
        };

        let credentials = match self.resolver.resolve_sms(ctx.tenant_id.as_deref(), &to).await {
            Ok(credentials) => credentials,
            Err(CredentialError::Insufficient) => {
                return ToolCallResult::err(&request.id, "missing credentials");
            }
        };

        match self
            .sms
            .send(&to, &credentials.sender_number, &body, &credentials)
            .await
        {
            Ok(receipt) => {
                if let Some(session_id) = ctx.prospect_id.as_deref() {
                    if let Err(e) = self.sessions.mark_sms_sent(session_id).await {
                        tracing::warn!("Failed to mark SMS sent for session {}: {}", session_id, e);
                    }
                }
                ToolCallResult::ok(&request.id, format!("SMS sent ({})", receipt.message_sid))
            }
            Err(e) => {
                self.debug
                    .log(NewDebugLog {
                        function_name: "sendSms".to_string(),
                        error_type: "provider_error".to_string(),
                        payload: Some(json!({ "to": to })),
                        raw_response: Some(e.to_string()),
                        ..Default::default()
                    })
                    .await;
                ToolCallResult::err(&request.id, format!("failed to send SMS: {}", e))
            }
        }
    }

    async fn report_issue(&self, request: &ToolCallRequest, ctx: &CallContext) -> ToolCallResult {
        let mut args = request.parsed_arguments();

        // Ambient call metadata rides along with whatever the agent supplied.
        if let Some(prospect_id) = &ctx.prospect_id {
            args.insert("prospectId".to_string(), json!(prospect_id));
        }
        if let Some(name) = &ctx.customer_name {
            args.insert("customerName".to_string(), json!(name));
        }
        if let Some(number) = &ctx.customer_number {
            args.insert("customerNumber".to_string(), json!(number));
        }
        if let Some(tenant_id) = &ctx.tenant_id {
            args.insert("companyId".to_string(), json!(tenant_id));
        }

        let subject = first_string(&args, &["subject", "title", "issue"])
            .unwrap_or_else(|| "Issue reported during call".to_string());
        let description =
            first_string(&args, &["description", "details", "message"]).unwrap_or_default();
        let context_block =
            serde_json::to_string_pretty(&Value::Object(args)).unwrap_or_default();

        let ticket = TicketRequest {
            subject,
            body: format!("{}\n\n{}", description, context_block),
            tags: vec!["voice-agent".to_string()],
            priority: "normal".to_string(),
        };

        match self.tickets.create_ticket(&ticket).await {
            Ok(receipt) => {
                ToolCallResult::ok(&request.id, format!("Ticket {} created", receipt.ticket_id))
            }
            Err(e) => {
                self.debug
                    .log(NewDebugLog {
                        function_name: "reportIssue".to_string(),
                        error_type: "provider_error".to_string(),
                        payload: Some(request.arguments.clone()),
                        raw_response: Some(e.to_string()),
                        ..Default::default()
                    })
                    .await;
                ToolCallResult::err(&request.id, format!("failed to create ticket: {}", e))
            }
        }
    }

    async fn offer_discount(&self, request: &ToolCallRequest, ctx: &CallContext) -> ToolCallResult {
        let args = request.parsed_arguments();
        let new_price = args.get("newPrice").and_then(value_as_f64);

        match (ctx.prospect_id.as_deref(), new_price) {
            (Some(session_id), Some(price)) => {
                match self.sessions.apply_discount(session_id, price).await {
                    Ok(()) => ToolCallResult::ok(
                        &request.id,
                        format!("Discount applied to session {}", session_id),
                    ),
                    Err(e) => {
                        self.debug
                            .log(NewDebugLog {
                                function_name: "offerDiscount".to_string(),
                                error_type: "persistence_error".to_string(),
                                payload: Some(json!({ "sessionId": session_id, "newPrice": price })),
                                raw_response: Some(e.to_string()),
                                ..Default::default()
                            })
                            .await;
                        ToolCallResult::err(&request.id, format!("failed to apply discount: {}", e))
                    }
                }
            }
            _ => ToolCallResult::err(&request.id, "missing sessionId or newPrice"),
        }
    }
}

/// First usable value among the aliased keys.
fn first_string(args: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match args.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Prices arrive as numbers or numeric strings.
fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_string_walks_aliases_in_order() {
        let args = serde_json::from_value::<Map<String, Value>>(json!({
            "number": "+14155551212",
            "phone": "+10000000000"
        }))
        .unwrap();
        assert_eq!(
            first_string(&args, PHONE_KEYS),
            Some("+14155551212".to_string())
        );
    }

    #[test]
    fn first_string_skips_empty_and_non_string_values() {
        let args = serde_json::from_value::<Map<String, Value>>(json!({
            "phoneNumber": "",
            "number": null,
            "recipient": "+14155551212"
        }))
        .unwrap();
        assert_eq!(
            first_string(&args, PHONE_KEYS),
            Some("+14155551212".to_string())
        );
    }

    #[test]
    fn prices_parse_from_numbers_and_strings() {
        assert_eq!(value_as_f64(&json!(49.99)), Some(49.99));
        assert_eq!(value_as_f64(&json!("49.99")), Some(49.99));
        assert_eq!(value_as_f64(&json!(" 50 ")), Some(50.0));
        assert_eq!(value_as_f64(&json!("not a price")), None);
        assert_eq!(value_as_f64(&Value::Null), None);
    }
}
