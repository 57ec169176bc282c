//! End-of-call outcome classification

use crate::models::{CallOutcome, CallSnapshot, ConnectionStatus};

/// Reasons the provider reports when the customer or the assistant hung up
/// normally. Anything else counts as a failed connection.
const GRACEFUL_ENDINGS: &[&str] = &["customer-ended-call", "assistant-ended-call"];

/// Derive the categorical outcome and connection flag for a finished call.
///
/// This is an override chain, not independent conditions: an SMS sent
/// during the call means the pitch link went out, and that reading wins
/// even when the summary also mentions a problem.
pub fn classify(call: &CallSnapshot) -> (CallOutcome, ConnectionStatus) {
    let mut outcome = CallOutcome::Completed;

    let summary = call.analysis_summary.to_lowercase();
    if summary.contains("issue") || summary.contains("problem") {
        outcome = CallOutcome::Issue;
    }

    if call
        .tool_calls_used
        .iter()
        .any(|tool| tool.function_name == "sendSms")
    {
        outcome = CallOutcome::Sale;
    }

    let connection = if GRACEFUL_ENDINGS.contains(&call.ended_reason.as_str()) {
        ConnectionStatus::Success
    } else {
        ConnectionStatus::Fail
    };

    (outcome, connection)
}
