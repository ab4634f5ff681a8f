//! Webhook notification backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::types::{Notification, NotifyError, Notifier};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookNotifierConfig {
    pub webhook_url: String,

    /// Prefix added to every title, e.g. the deployment name.
    #[serde(default)]
    pub title_prefix: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    10
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    level: &'a str,
    title: String,
    body: &'a str,
    timestamp: String,
}

/// Posts each notification as JSON to a webhook URL.
pub struct WebhookNotifier {
    client: Client,
    config: WebhookNotifierConfig,
}

impl WebhookNotifier {
    pub fn new(config: WebhookNotifierConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotifyError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn payload<'a>(&self, notification: &'a Notification) -> WebhookPayload<'a> {
        let title = match &self.config.title_prefix {
            Some(prefix) => format!("[{}] {}", prefix, notification.title),
            None => notification.title.clone(),
        };
        WebhookPayload {
            level: notification.level.as_str(),
            title,
            body: &notification.body,
            timestamp: notification.timestamp.to_rfc3339(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&self.payload(notification))
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, message });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotifyLevel;

    #[test]
    fn test_payload_with_prefix() {
        let notifier = WebhookNotifier::new(WebhookNotifierConfig {
            webhook_url: "http://localhost/hook".to_string(),
            title_prefix: Some("prod".to_string()),
            timeout_secs: 1,
        })
        .unwrap();
        let notification = Notification::new(NotifyLevel::Warning, "Scrape failed", "details");

        let payload = notifier.payload(&notification);
        assert_eq!(payload.level, "warning");
        assert_eq!(payload.title, "[prod] Scrape failed");
        assert_eq!(payload.body, "details");
    }
}
