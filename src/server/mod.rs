//! Server-side code for the sales automation backend
//!
//! This module contains all backend functionality:
//! - Database access (PostgreSQL via sqlx)
//! - Voice-provider webhook routing (tool calls, end-of-call reports)
//! - Outbound integrations (Twilio SMS, Zendesk tickets, Monday sales board)
//! - Outbound call placement through the voice AI provider
#![allow(dead_code)]

pub mod db;
pub mod config;
pub mod credentials;
pub mod debug_log;
pub mod webhook;
pub mod dispatch;
pub mod outcome;
pub mod reconcile;
pub mod twilio;
pub mod zendesk;
pub mod monday;
pub mod voice;


use axum::{
    routing::{get, post},
    Router,
    extract::State,
    http::StatusCode,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::{CorsLayer, Any};
use axum::http::Method;
use tower_http::trace::TraceLayer;

use crate::models::{CallLog, DebugLog, PlaceCallRequest, PlaceCallResponse};
use config::AppConfig;
use credentials::CredentialResolver;
use debug_log::DebugLogger;
use dispatch::ToolDispatcher;
use reconcile::CallLogReconciler;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub voice: voice::VoiceClient,
    pub dispatcher: Arc<ToolDispatcher>,
    pub reconciler: Arc<CallLogReconciler>,
    pub debug: DebugLogger,
}

/// Create the Axum router with all API routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/api/health", get(health_check))

        // Voice provider webhooks
        .route("/api/webhooks/voice", post(webhook::handle_voice_webhook))

        // Call placement
        .route("/api/calls/place", post(place_call))

        // Operator read endpoints
        .route("/api/call-logs", get(get_call_logs))
        .route("/api/debug-logs", get(get_debug_logs))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

// Health check
async fn health_check() -> &'static str {
    "OK"
}

/// Place an outbound call and create its queued call-log row. The row is
/// the anchor the end-of-call reconciler updates later.
async fn place_call(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaceCallRequest>,
) -> Result<Json<PlaceCallResponse>, StatusCode> {
    let placed = state.voice.place_call(&req).await.map_err(|e| {
        tracing::error!("Voice dial error: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let log = db::call_logs::insert_queued(&state.db, &placed.id, &req)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create call log for {}: {}", placed.id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    tracing::info!("Placed call {} to {}", placed.id, req.phone_number);
    Ok(Json(PlaceCallResponse {
        call_id: log.id,
        external_call_id: placed.id,
    }))
}

async fn get_call_logs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CallLog>>, StatusCode> {
    db::call_logs::get_recent(&state.db, 100)
        .await
        .map(Json)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn get_debug_logs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DebugLog>>, StatusCode> {
    db::debug_logs::get_recent(&state.db, 100)
        .await
        .map(Json)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Initialize and start the server
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    // Initialize database
    let pool = db::init_pool(&config.database_url).await?;

    // Run migrations (non-fatal if already applied)
    if let Err(e) = db::run_migrations(&pool).await {
        tracing::warn!("Migration warning (may be already applied): {}", e);
    }

    let debug = DebugLogger::new(Arc::new(pool.clone()));

    let resolver = CredentialResolver::new(Arc::new(pool.clone()), config.sms_defaults.clone());
    let dispatcher = ToolDispatcher::new(
        resolver,
        Arc::new(twilio::TwilioClient::new()),
        Arc::new(zendesk::ZendeskClient::new(&config.zendesk)),
        Arc::new(pool.clone()),
        debug.clone(),
    );
    let reconciler = CallLogReconciler::new(
        Arc::new(pool.clone()),
        Arc::new(monday::MondayClient::new(&config.monday)),
        debug.clone(),
    );
    let voice = voice::VoiceClient::new(&config.voice);

    let state = AppState {
        db: pool,
        voice,
        dispatcher: Arc::new(dispatcher),
        reconciler: Arc::new(reconciler),
        debug,
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!("Server running on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
