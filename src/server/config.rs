//! Process configuration
//!
//! All environment access happens once, here, at startup. Modules receive
//! explicit configuration objects; nothing reads the environment after
//! `AppConfig::from_env` returns.

use thiserror::Error;

use super::credentials::SmsDefaults;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}")]
    InvalidVar(&'static str),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Process-wide messaging fallback, used when a tenant has no enabled
    /// integration row.
    pub sms_defaults: SmsDefaults,
    pub zendesk: ZendeskConfig,
    pub monday: MondayConfig,
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, Default)]
pub struct ZendeskConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

#[derive(Debug, Clone, Default)]
pub struct MondayConfig {
    pub api_token: String,
    pub board_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct VoiceConfig {
    pub api_key: String,
    pub assistant_id: String,
    pub phone_number_id: String,
    pub base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidVar("PORT"))?;

        Ok(Self {
            database_url,
            port,
            sms_defaults: SmsDefaults {
                account_sid: optional("TWILIO_ACCOUNT_SID"),
                auth_token: optional("TWILIO_AUTH_TOKEN"),
                sender_number: optional("TWILIO_SENDER_NUMBER"),
                ca_sender_number: optional("TWILIO_CA_SENDER_NUMBER"),
            },
            zendesk: ZendeskConfig {
                base_url: optional("ZENDESK_BASE_URL").unwrap_or_default(),
                email: optional("ZENDESK_EMAIL").unwrap_or_default(),
                api_token: optional("ZENDESK_API_TOKEN").unwrap_or_default(),
            },
            monday: MondayConfig {
                api_token: optional("MONDAY_API_TOKEN").unwrap_or_default(),
                board_id: optional("MONDAY_BOARD_ID").unwrap_or_default(),
            },
            voice: VoiceConfig {
                api_key: optional("VOICE_API_KEY").unwrap_or_default(),
                assistant_id: optional("VOICE_ASSISTANT_ID").unwrap_or_default(),
                phone_number_id: optional("VOICE_PHONE_NUMBER_ID").unwrap_or_default(),
                base_url: optional("VOICE_BASE_URL")
                    .unwrap_or_else(|| "https://api.vapi.ai".to_string()),
            },
        })
    }
}

/// Empty values are treated the same as unset ones.
fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
