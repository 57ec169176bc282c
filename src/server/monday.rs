//! Monday.com sales board client
//!
//! Used only for the best-effort conversion notification; callers treat
//! every failure as non-fatal.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::config::MondayConfig;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {message}")]
    Api { message: String },
}

/// Sales-tracking board seam.
#[async_trait]
pub trait SalesBoard: Send + Sync {
    async fn create_board_item(&self, name: &str, status_label: &str) -> Result<(), BoardError>;
}

#[derive(Clone)]
pub struct MondayClient {
    client: Client,
    api_token: String,
    board_id: String,
    base_url: String,
}

impl MondayClient {
    pub fn new(config: &MondayConfig) -> Self {
        Self {
            client: Client::new(),
            api_token: config.api_token.clone(),
            board_id: config.board_id.clone(),
            base_url: "https://api.monday.com/v2".to_string(),
        }
    }
}

#[async_trait]
impl SalesBoard for MondayClient {
    async fn create_board_item(&self, name: &str, status_label: &str) -> Result<(), BoardError> {
        let column_values = serde_json::json!({ "status": { "label": status_label } }).to_string();
        let query = format!(
            r#"mutation {{ create_item (board_id: {}, item_name: {}, column_values: {}) {{ id }} }}"#,
            self.board_id,
            serde_json::json!(name),
            serde_json::json!(column_values),
        );

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", &self.api_token)
            .json(&GraphQlRequest { query: &query })
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(BoardError::Api {
                message: error_text,
            });
        }

        // Monday reports GraphQL failures inside a 200 body.
        let body: Value = response.json().await?;
        if let Some(errors) = body.get("errors") {
            return Err(BoardError::Api {
                message: errors.to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
}
