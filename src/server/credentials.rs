//! Messaging credential resolution
//!
//! Picks the account and sender identity for an outbound SMS: tenant
//! integration row first, process-wide defaults second, with a regional
//! (area-code based) sender override for Canadian destinations.
//! Credentials are resolved fresh on every dispatch; nothing is cached,
//! since tenant secrets may rotate between calls.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::Integration;
use super::db;

pub const SMS_PROVIDER: &str = "twilio";

/// Canadian area codes within the +1 country code.
const CA_AREA_CODES: &[&str] = &[
    "204", "226", "236", "249", "250", "263", "289", "306", "343", "354",
    "365", "367", "368", "382", "403", "416", "418", "428", "431", "437",
    "438", "450", "468", "474", "506", "514", "519", "548", "579", "581",
    "584", "587", "604", "613", "639", "647", "672", "683", "705", "709",
    "742", "753", "778", "780", "782", "807", "819", "825", "867", "873",
    "879", "902", "905",
];

/// Process-wide fallback configuration for the messaging provider.
#[derive(Debug, Clone, Default)]
pub struct SmsDefaults {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub sender_number: Option<String>,
    /// Sender used for Canadian destinations, when configured.
    pub ca_sender_number: Option<String>,
}

/// Fully resolved credentials for one send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub sender_number: String,
}

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("missing credentials")]
    Insufficient,
}

/// Lookup seam for tenant integration rows.
#[async_trait]
pub trait IntegrationStore: Send + Sync {
    /// The enabled integration row for (tenant, provider), if any. Lookup
    /// failures are treated as "no tenant configuration".
    async fn integration(&self, tenant_id: &str, provider: &str) -> Option<Integration>;
}

#[async_trait]
impl IntegrationStore for PgPool {
    async fn integration(&self, tenant_id: &str, provider: &str) -> Option<Integration> {
        match db::integrations::get_enabled(self, tenant_id, provider).await {
            Ok(row) => row,
            Err(e) => {
                tracing::error!("Integration lookup failed for tenant {}: {}", tenant_id, e);
                None
            }
        }
    }
}

pub struct CredentialResolver {
    store: Arc<dyn IntegrationStore>,
    defaults: SmsDefaults,
}

impl CredentialResolver {
    pub fn new(store: Arc<dyn IntegrationStore>, defaults: SmsDefaults) -> Self {
        Self { store, defaults }
    }

    /// Resolve credentials for a send to `destination`. An incomplete tenant
    /// row falls back to process defaults entirely; a missing field after
    /// both sources is an `Insufficient` error, which callers surface as a
    /// per-action failure.
    pub async fn resolve_sms(
        &self,
        tenant_id: Option<&str>,
        destination: &str,
    ) -> Result<SmsCredentials, CredentialError> {
        let tenant_row = match tenant_id {
            Some(tenant) => self.store.integration(tenant, SMS_PROVIDER).await,
            None => None,
        };

        let (account_sid, auth_token, mut sender, regional) = match tenant_row {
            Some(row)
                if row.account_sid.is_some()
                    && row.auth_token.is_some()
                    && row.sender_number.is_some() =>
            {
                (
                    row.account_sid,
                    row.auth_token,
                    row.sender_number,
                    row.regional_sender_number,
                )
            }
            _ => (
                self.defaults.account_sid.clone(),
                self.defaults.auth_token.clone(),
                self.defaults.sender_number.clone(),
                None,
            ),
        };

        // Regional sender only when one is actually configured; otherwise
        // the default silently stands.
        if is_ca_destination(destination) {
            if let Some(ca_sender) = regional.or_else(|| self.defaults.ca_sender_number.clone()) {
                sender = Some(ca_sender);
            }
        }

        match (account_sid, auth_token, sender) {
            (Some(sid), Some(token), Some(number))
                if !sid.is_empty() && !token.is_empty() && !number.is_empty() =>
            {
                Ok(SmsCredentials {
                    account_sid: sid,
                    auth_token: token,
                    sender_number: normalize_sender(&number),
                })
            }
            _ => Err(CredentialError::Insufficient),
        }
    }
}

/// True when the destination is a +1 number whose area code belongs to the
/// Canadian set.
pub fn is_ca_destination(number: &str) -> bool {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    let area = if digits.len() == 11 && digits.starts_with('1') {
        &digits[1..4]
    } else if digits.len() == 10 {
        &digits[0..3]
    } else {
        return false;
    };
    CA_AREA_CODES.contains(&area)
}

/// Normalize a sender to international format: a missing leading `+` gets
/// `+1` for 10-digit numbers and a bare `+` otherwise. A 9-digit sender
/// therefore comes out as e.g. `+905551234`; that quirk is load-bearing for
/// existing tenant configurations and is left as is.
pub fn normalize_sender(raw: &str) -> String {
    if raw.starts_with('+') {
        raw.to_string()
    } else if raw.len() == 10 {
        format!("+1{}", raw)
    } else {
        format!("+{}", raw)
    }
}
