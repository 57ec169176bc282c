//! Best-effort diagnostics sink
//!
//! Every anomaly path writes through here for later inspection. A failure
//! to persist the entry is written to the local log and swallowed; this
//! component is unconditionally non-fatal to its callers.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::NewDebugLog;
use super::db;

#[async_trait]
pub trait DebugSink: Send + Sync {
    async fn insert(&self, entry: &NewDebugLog) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl DebugSink for PgPool {
    async fn insert(&self, entry: &NewDebugLog) -> Result<(), sqlx::Error> {
        db::debug_logs::insert(self, entry).await
    }
}

#[derive(Clone)]
pub struct DebugLogger {
    sink: Arc<dyn DebugSink>,
}

impl DebugLogger {
    pub fn new(sink: Arc<dyn DebugSink>) -> Self {
        Self { sink }
    }

    /// Append one diagnostic entry. Never fails.
    pub async fn log(&self, entry: NewDebugLog) {
        if let Err(e) = self.sink.insert(&entry).await {
            tracing::error!(
                "Debug log write failed ({} / {}): {}",
                entry.function_name,
                entry.error_type,
                e
            );
        }
    }
}
