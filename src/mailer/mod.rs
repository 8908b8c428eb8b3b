use std::sync::{Arc, Mutex};

use dotenvy::var;
use thiserror::Error;

mod resend;
pub mod templates;

pub use resend::ResendMailClient;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Email must have either HTML or text body")]
    EmptyBody,
    #[error("Failed to reach mail API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Mail API error: {status} - {body}")]
    Api { status: u16, body: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body_html: Option<String>,
    pub body_text: Option<String>,
}

#[async_trait::async_trait]
pub trait MailClient: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

pub type DynMailClient = Arc<dyn MailClient>;

#[derive(Clone)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub otp_from: String,
    pub contact_from: String,
    pub contact_to: String,
}

impl MailConfig {
    pub fn from_env() -> Self {
        let api_key = var("RESEND_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let api_url =
            var("RESEND_API_URL").unwrap_or_else(|_| "https://api.resend.com/emails".to_string());
        let otp_from = var("OTP_FROM_EMAIL").unwrap_or_else(|_| "onboarding@resend.dev".to_string());
        let contact_from =
            var("CONTACT_FROM_EMAIL").unwrap_or_else(|_| "contact@resend.dev".to_string());
        let contact_to = var("CONTACT_TO_EMAIL").unwrap_or_else(|_| "support@tiffin.local".to_string());
        Self {
            api_key,
            api_url,
            otp_from,
            contact_from,
            contact_to,
        }
    }
}

/// Picks the Resend client when an API key is configured, else one that only logs.
pub fn create_mail_client(config: &MailConfig) -> DynMailClient {
    match &config.api_key {
        Some(key) => Arc::new(ResendMailClient::new(&config.api_url, key)),
        None => {
            warn!("RESEND_API_KEY not set, outgoing mail will only be logged");
            Arc::new(LogMailClient)
        }
    }
}

pub struct LogMailClient;

#[async_trait::async_trait]
impl MailClient for LogMailClient {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        if message.body_html.is_none() && message.body_text.is_none() {
            return Err(MailError::EmptyBody);
        }
        info!(
            "mail (not sent): from={} to={} subject={:?}",
            message.from, message.to, message.subject
        );
        Ok(())
    }
}

/// Keeps every message in memory; optionally fails every send.
#[derive(Clone, Default)]
pub struct MemoryMailClient {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    fail: bool,
}

impl MemoryMailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    pub fn last_to(&self, to: &str) -> Option<EmailMessage> {
        self.sent().into_iter().rev().find(|m| m.to == to)
    }
}

#[async_trait::async_trait]
impl MailClient for MemoryMailClient {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Api {
                status: 503,
                body: "mail disabled".to_string(),
            });
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message);
        }
        Ok(())
    }
}
