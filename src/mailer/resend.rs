use reqwest::Client;
use serde::Serialize;

use super::{EmailMessage, MailClient, MailError};

pub struct ResendMailClient {
    client: Client,
    api_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

impl ResendMailClient {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl MailClient for ResendMailClient {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        if message.body_html.is_none() && message.body_text.is_none() {
            return Err(MailError::EmptyBody);
        }

        let email = ResendEmail {
            from: &message.from,
            to: vec![message.to.as_str()],
            subject: &message.subject,
            reply_to: message.reply_to.as_deref(),
            html: message.body_html.as_deref(),
            text: message.body_text.as_deref(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&email)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!("resend: API rejected mail to {}: {} {}", message.to, status, body);
            return Err(MailError::Api { status, body });
        }

        debug!("resend: sent {:?} to {}", message.subject, message.to);
        Ok(())
    }
}
