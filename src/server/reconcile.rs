//! End-of-call reconciliation
//!
//! Persists the classified outcome against the call-log row created at
//! placement, and fires the detached sales-board notification for
//! conversions. Nothing in here may fail the webhook response.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::{CallLogUpdate, CallOutcome, CallSnapshot, ConnectionStatus, NewDebugLog};
use super::db;
use super::debug_log::DebugLogger;
use super::monday::SalesBoard;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Call-log persistence seam. Update-only: rows are created when the call
/// is placed, never here.
#[async_trait]
pub trait CallLogStore: Send + Sync {
    /// Returns the number of rows affected. Zero (no matching row, or a row
    /// already completed) is a valid no-op.
    async fn finalize(
        &self,
        external_call_id: &str,
        update: &CallLogUpdate,
    ) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl CallLogStore for PgPool {
    async fn finalize(
        &self,
        external_call_id: &str,
        update: &CallLogUpdate,
    ) -> Result<u64, sqlx::Error> {
        db::call_logs::finalize(self, external_call_id, update).await
    }
}

pub struct CallLogReconciler {
    store: Arc<dyn CallLogStore>,
    board: Arc<dyn SalesBoard>,
    debug: DebugLogger,
}

impl CallLogReconciler {
    pub fn new(store: Arc<dyn CallLogStore>, board: Arc<dyn SalesBoard>, debug: DebugLogger) -> Self {
        Self {
            store,
            board,
            debug,
        }
    }

    /// Write the final outcome for `call`. Returns the affected row count;
    /// a replayed end-of-call event for an already-completed call affects
    /// zero rows and fires nothing.
    pub async fn reconcile(
        &self,
        call: &CallSnapshot,
        outcome: CallOutcome,
        connection_status: ConnectionStatus,
    ) -> Result<u64, ReconcileError> {
        let update = CallLogUpdate {
            outcome,
            connection_status,
            duration_display: format_duration(call.duration_seconds),
            transcript: call.transcript.clone(),
            summary: call.analysis_summary.clone(),
            cost: call.cost,
        };

        let affected = self.store.finalize(&call.id, &update).await?;
        if affected == 0 {
            tracing::warn!("No open call log row for external call {}", call.id);
            return Ok(0);
        }

        if outcome == CallOutcome::Sale {
            self.notify_sale(call);
        }

        Ok(affected)
    }

    /// Detached: the webhook response never waits on the sales board, and a
    /// board failure surfaces only in the logs.
    fn notify_sale(&self, call: &CallSnapshot) {
        let board = Arc::clone(&self.board);
        let debug = self.debug.clone();
        let call_id = call.id.clone();

        let product = call
            .metadata
            .product_name
            .clone()
            .unwrap_or_else(|| "Bundle".to_string());
        let customer = call
            .customer
            .name
            .clone()
            .or_else(|| call.customer.number.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let item_name = format!("Sale: {} - {}", product, customer);

        tokio::spawn(async move {
            if let Err(e) = board.create_board_item(&item_name, "Sale").await {
                tracing::error!("Sales board notification failed for call {}: {}", call_id, e);
                debug
                    .log(NewDebugLog {
                        function_name: "notifySale".to_string(),
                        error_type: "board_error".to_string(),
                        raw_response: Some(e.to_string()),
                        metadata: Some(serde_json::json!({
                            "callId": call_id,
                            "itemName": item_name,
                        })),
                        ..Default::default()
                    })
                    .await;
            }
        });
    }
}

/// Zero-padded minutes:seconds.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_duration_zero_padded() {
        assert_eq!(format_duration(0.0), "00:00");
        assert_eq!(format_duration(7.0), "00:07");
        assert_eq!(format_duration(65.0), "01:05");
        assert_eq!(format_duration(600.0), "10:00");
        assert_eq!(format_duration(3725.0), "62:05");
    }

    #[test]
    fn fractional_and_negative_durations_stay_sane() {
        assert_eq!(format_duration(89.6), "01:30");
        assert_eq!(format_duration(-5.0), "00:00");
    }
}
