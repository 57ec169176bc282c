//! Voice AI provider client (outbound call placement)
//!
//! The provider runs the conversation itself and reports back through the
//! webhook; this client only places calls and tags them with the metadata
//! the webhook router later reads back.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::PlaceCallRequest;
use super::config::VoiceConfig;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {message}")]
    Api { message: String },
}

#[derive(Clone)]
pub struct VoiceClient {
    client: Client,
    api_key: String,
    assistant_id: String,
    phone_number_id: String,
    base_url: String,
}

#[derive(Debug)]
pub struct PlacedCall {
    pub id: String,
}

impl VoiceClient {
    pub fn new(config: &VoiceConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            assistant_id: config.assistant_id.clone(),
            phone_number_id: config.phone_number_id.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Place an outbound call. Returns the provider's call id, which keys
    /// the call-log row for the lifetime of the call.
    pub async fn place_call(&self, req: &PlaceCallRequest) -> Result<PlacedCall, VoiceError> {
        let request = CreateCallRequest {
            assistant_id: &self.assistant_id,
            phone_number_id: &self.phone_number_id,
            customer: CallCustomer {
                number: &req.phone_number,
                name: req.customer_name.as_deref(),
            },
            metadata: CallMetadataBody {
                company_id: req.company_id.as_deref(),
                prospect_id: req.prospect_id.as_deref(),
                product_name: req.product_name.as_deref(),
            },
        };

        let response = self
            .client
            .post(format!("{}/call", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VoiceError::Api {
                message: error_text,
            });
        }

        let created: CreateCallResponse = response.json().await?;
        Ok(PlacedCall { id: created.id })
    }
}

#[derive(Serialize)]
struct CreateCallRequest<'a> {
    #[serde(rename = "assistantId")]
    assistant_id: &'a str,
    #[serde(rename = "phoneNumberId")]
    phone_number_id: &'a str,
    customer: CallCustomer<'a>,
    metadata: CallMetadataBody<'a>,
}

#[derive(Serialize)]
struct CallCustomer<'a> {
    number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct CallMetadataBody<'a> {
    #[serde(rename = "companyId", skip_serializing_if = "Option::is_none")]
    company_id: Option<&'a str>,
    #[serde(rename = "prospectId", skip_serializing_if = "Option::is_none")]
    prospect_id: Option<&'a str>,
    #[serde(rename = "productName", skip_serializing_if = "Option::is_none")]
    product_name: Option<&'a str>,
}

#[derive(Deserialize)]
struct CreateCallResponse {
    id: String,
}
