//! Delivery of customer notifications.
//!
//! The approval workflow only knows the [`Notifier`] trait:
//! `send(recipient, subject, content)`. Implementations:
//! - [`WebhookNotifier`]: signs and POSTs the message to a mail relay
//! - [`LogNotifier`]: logs the message, used when no relay is configured
//! - [`RecordingNotifier`]: keeps messages in memory, used by tests
//!
//! # Error Handling
//!
//! Delivery failures are reported as [`NotifyError`] and stop there: callers
//! log them and carry on. A failed notification never undoes a booking change.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::models::notification::RelayMessage;

type HmacSha256 = Hmac<Sha256>;

/// Why a notification was not delivered.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Invalid relay URL: {0}")]
    InvalidRelayUrl(String),

    #[error("Relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Relay rejected message with status {status}")]
    Rejected { status: u16, body: Option<String> },

    #[error("Failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Sends a rendered message to one recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, content: &str)
    -> Result<(), NotifyError>;
}

/// Notifier posting messages to an HTTP mail relay.
///
/// # Headers Sent
///
/// - `Content-Type: application/json`
/// - `X-Relay-Signature: sha256=<hex>` (only when a secret is configured)
/// - `X-Relay-Event-Id: <uuid>`
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    relay_url: String,
    secret: Option<String>,
    from: String,
}

impl WebhookNotifier {
    /// Build a notifier for `relay_url`.
    ///
    /// # Rules
    ///
    /// - Must be a valid URL of at most 2048 characters
    /// - Must be HTTPS (HTTP localhost allowed for development)
    pub fn new(
        relay_url: &str,
        secret: Option<String>,
        from: String,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        validate_relay_url(relay_url)?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            relay_url: relay_url.to_string(),
            secret,
            from,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        content: &str,
    ) -> Result<(), NotifyError> {
        let event_id = Uuid::new_v4();
        let message = RelayMessage::new(event_id, &self.from, recipient, subject, content);
        let body = serde_json::to_string(&message)?;

        let mut request = self
            .client
            .post(&self.relay_url)
            .header("Content-Type", "application/json")
            .header("X-Relay-Event-Id", event_id.to_string());
        if let Some(secret) = &self.secret {
            request = request.header("X-Relay-Signature", generate_signature(secret, &body));
        }

        let response = request.body(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(%event_id, recipient, "Confirmation handed to mail relay");
        Ok(())
    }
}

/// Notifier that only logs; nothing leaves the process.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        content: &str,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            recipient,
            subject,
            bytes = content.len(),
            "No mail relay configured, confirmation not delivered"
        );
        Ok(())
    }
}

/// A message captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub recipient: String,
    pub subject: String,
    pub content: String,
}

/// Notifier that keeps every message in memory.
///
/// With `failing()` every send is recorded and then reported as rejected.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMessage>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        content: &str,
    ) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SentMessage {
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                content: content.to_string(),
            });

        if self.fail {
            return Err(NotifyError::Rejected {
                status: 503,
                body: None,
            });
        }
        Ok(())
    }
}

/// Generate HMAC-SHA256 signature for a relay payload.
///
/// # Format
///
/// `sha256=<hex_encoded_hmac>`
pub fn generate_signature(secret: &str, payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC key length is valid");
    mac.update(payload.as_bytes());
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

fn validate_relay_url(relay_url: &str) -> Result<(), NotifyError> {
    if relay_url.len() > 2048 {
        return Err(NotifyError::InvalidRelayUrl(
            "URL exceeds 2048 characters".to_string(),
        ));
    }

    let parsed = url::Url::parse(relay_url)
        .map_err(|_| NotifyError::InvalidRelayUrl("Invalid URL format".to_string()))?;

    match parsed.scheme() {
        "https" => Ok(()),
        "http" => match parsed.host_str() {
            Some("localhost") | Some("127.0.0.1") | Some("0.0.0.0") => Ok(()),
            _ => Err(NotifyError::InvalidRelayUrl(
                "HTTP is only allowed for localhost. Use HTTPS for production.".to_string(),
            )),
        },
        _ => Err(NotifyError::InvalidRelayUrl(
            "URL must use HTTP or HTTPS".to_string(),
        )),
    }
}
