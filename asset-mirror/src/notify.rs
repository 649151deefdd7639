//! Delivery of the run report to a chat.
//!
//! The engine never talks to the network; the driver hands the finished report
//! text to a [`Notifier`] it constructed and owns.

use crate::config::TelegramConfig;
use crate::utils::{MirrorError, Result};
use serde_json::{json, Value};
use std::future::Future;
use tracing::{info, warn};

/// Something that can deliver a report message
pub trait Notifier {
    fn notify(&self, text: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Sends reports through the Telegram Bot API `sendMessage` method
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    endpoint: String,
    chat_id: String,
    protect_content: bool,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/bot{}/sendMessage",
                config.api_url.trim_end_matches('/'),
                config.token
            ),
            chat_id: config.chat_id.clone(),
            protect_content: config.protect_content,
        }
    }

    /// JSON body for `sendMessage`
    pub fn message_payload(&self, text: &str) -> Value {
        json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
            "protect_content": self.protect_content,
        })
    }
}

impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&self.message_payload(text))
            .send()
            .await?;

        let body: Value = resp.json().await?;
        check_response(&body)
    }
}

/// Telegram answers `{"ok": true, ...}` on success and `{"ok": false,
/// "description": ...}` otherwise, regardless of HTTP status.
fn check_response(body: &Value) -> Result<()> {
    if body.get("ok").and_then(Value::as_bool) == Some(true) {
        return Ok(());
    }

    let description = body
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("no description");
    Err(MirrorError::Notification(description.to_string()))
}

/// Deliver `text`, logging the outcome. A failed delivery never fails the run.
pub async fn deliver<N: Notifier>(notifier: &N, text: &str) -> bool {
    match notifier.notify(text).await {
        Ok(()) => {
            info!("Report notification sent");
            true
        }
        Err(e) => {
            warn!("Unable to send report notification: {}", e);
            false
        }
    }
}
