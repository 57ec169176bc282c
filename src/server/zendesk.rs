//! Zendesk ticketing API client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::ZendeskConfig;

#[derive(Error, Debug)]
pub enum TicketError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {message}")]
    Api { message: String },
}

#[derive(Debug, Clone)]
pub struct TicketRequest {
    pub subject: String,
    pub body: String,
    pub tags: Vec<String>,
    pub priority: String,
}

#[derive(Debug, Clone)]
pub struct TicketReceipt {
    pub ticket_id: i64,
}

/// Ticketing seam.
#[async_trait]
pub trait TicketSink: Send + Sync {
    async fn create_ticket(&self, ticket: &TicketRequest) -> Result<TicketReceipt, TicketError>;
}

#[derive(Clone)]
pub struct ZendeskClient {
    client: Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl ZendeskClient {
    pub fn new(config: &ZendeskConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl TicketSink for ZendeskClient {
    async fn create_ticket(&self, ticket: &TicketRequest) -> Result<TicketReceipt, TicketError> {
        let request = CreateTicketRequest {
            ticket: TicketBody {
                subject: &ticket.subject,
                comment: TicketComment {
                    body: &ticket.body,
                },
                tags: &ticket.tags,
                priority: &ticket.priority,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/v2/tickets.json", self.base_url))
            .basic_auth(format!("{}/token", self.email), Some(&self.api_token))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TicketError::Api {
                message: error_text,
            });
        }

        let created: CreateTicketResponse = response.json().await?;
        Ok(TicketReceipt {
            ticket_id: created.ticket.id,
        })
    }
}

#[derive(Serialize)]
struct CreateTicketRequest<'a> {
    ticket: TicketBody<'a>,
}

#[derive(Serialize)]
struct TicketBody<'a> {
    subject: &'a str,
    comment: TicketComment<'a>,
    tags: &'a [String],
    priority: &'a str,
}

#[derive(Serialize)]
struct TicketComment<'a> {
    body: &'a str,
}

#[derive(Deserialize)]
struct CreateTicketResponse {
    ticket: CreatedTicket,
}

#[derive(Deserialize)]
struct CreatedTicket {
    id: i64,
}
