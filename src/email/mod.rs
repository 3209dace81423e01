use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::EmailConfig;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Email service is not configured")]
    NotConfigured,

    #[error("Email service rejected the message: {0}")]
    Rejected(String),

    #[error("Email transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A formatted transactional message ready for dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Hosted delivery boundary; returns the provider's delivery id.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<String, DeliveryError>;
}

/// Resend-backed mailer (JSON POST with a bearer key).
pub struct ResendMailer {
    client: reqwest::Client,
    config: EmailConfig,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: Option<String>,
    message: Option<String>,
}

static SHARED: Lazy<ResendMailer> =
    Lazy::new(|| ResendMailer::new(crate::config::config().email.clone()));

impl ResendMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Process-wide instance built from the config singleton.
    pub fn shared() -> &'static ResendMailer {
        &SHARED
    }

    pub fn is_configured(&self) -> bool {
        !self.config.resend_api_key.is_empty()
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<String, DeliveryError> {
        if !self.is_configured() {
            return Err(DeliveryError::NotConfigured);
        }

        let response = self
            .client
            .post("https://api.resend.com/emails")
            .bearer_auth(&self.config.resend_api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        let payload: ResendResponse = response.json().await?;

        if !status.is_success() {
            let reason = payload
                .message
                .unwrap_or_else(|| format!("delivery failed with status {}", status));
            return Err(DeliveryError::Rejected(reason));
        }

        match payload.id {
            Some(id) => {
                info!(delivery_id = %id, "email dispatched");
                Ok(id)
            }
            None => Err(DeliveryError::Rejected(
                "delivery response missing id".to_string(),
            )),
        }
    }
}

/// Minimal HTML escaping for user-supplied values interpolated into bodies.
pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<b>\"A&B\"</b>"),
            "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;"
        );
    }

    #[tokio::test]
    async fn unconfigured_mailer_refuses() {
        let mailer = ResendMailer::new(EmailConfig {
            resend_api_key: String::new(),
            from_address: "x@example.com".to_string(),
            inquiry_recipients: vec!["y@example.com".to_string()],
        });
        let email = OutboundEmail {
            from: "x@example.com".to_string(),
            to: vec!["y@example.com".to_string()],
            subject: "s".to_string(),
            html: "<p>hi</p>".to_string(),
            reply_to: None,
        };
        assert!(matches!(
            mailer.send(&email).await,
            Err(DeliveryError::NotConfigured)
        ));
    }
}
