//! Twilio Messaging API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::credentials::SmsCredentials;

#[derive(Error, Debug)]
pub enum SmsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {message}")]
    Api { message: String },
}

/// Outbound messaging seam. Credentials arrive per call since they are
/// resolved per tenant and per destination.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(
        &self,
        to: &str,
        from: &str,
        body: &str,
        credentials: &SmsCredentials,
    ) -> Result<SmsReceipt, SmsError>;
}

#[derive(Debug, Clone)]
pub struct SmsReceipt {
    pub message_sid: String,
}

#[derive(Clone)]
pub struct TwilioClient {
    client: Client,
    base_url: String,
}

impl TwilioClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "https://api.twilio.com".to_string(),
        }
    }
}

impl Default for TwilioClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsGateway for TwilioClient {
    async fn send(
        &self,
        to: &str,
        from: &str,
        body: &str,
        credentials: &SmsCredentials,
    ) -> Result<SmsReceipt, SmsError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, credentials.account_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&credentials.account_sid, Some(&credentials.auth_token))
            .form(&[("To", to), ("From", from), ("Body", body)])
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SmsError::Api {
                message: error_text,
            });
        }

        let message: MessageResponse = response.json().await?;
        Ok(SmsReceipt {
            message_sid: message.sid,
        })
    }
}

#[derive(Deserialize)]
struct MessageResponse {
    sid: String,
}
