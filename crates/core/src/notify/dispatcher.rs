use std::sync::Arc;

use super::types::{Notification, NotifyLevel, Notifier};

/// Best-effort notification front end used by the pipeline stages.
///
/// Cheap to clone. Delivery failures are logged and swallowed so a broken
/// notification channel never changes the outcome of a run.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Send a notification, logging delivery failures.
    pub async fn notify(&self, level: NotifyLevel, title: &str, body: &str) {
        let notification = Notification::new(level, title, body);
        if let Err(e) = self.notifier.send(&notification).await {
            tracing::error!(level = %level, title, "Failed to send notification: {}", e);
        }
    }

    pub async fn info(&self, title: &str, body: &str) {
        self.notify(NotifyLevel::Info, title, body).await;
    }

    pub async fn warning(&self, title: &str, body: &str) {
        self.notify(NotifyLevel::Warning, title, body).await;
    }

    pub async fn error(&self, title: &str, body: &str) {
        self.notify(NotifyLevel::Error, title, body).await;
    }

    pub async fn success(&self, title: &str, body: &str) {
        self.notify(NotifyLevel::Success, title, body).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotifyError;
    use crate::testing::MockNotifier;

    #[tokio::test]
    async fn test_levels_are_forwarded() {
        let notifier = MockNotifier::new();
        let dispatcher = NotificationDispatcher::new(Arc::new(notifier.clone()));

        dispatcher.info("a", "1").await;
        dispatcher.warning("b", "2").await;
        dispatcher.error("c", "3").await;
        dispatcher.success("d", "4").await;

        let sent = notifier.sent().await;
        let levels: Vec<_> = sent.iter().map(|n| n.level).collect();
        assert_eq!(
            levels,
            vec![
                NotifyLevel::Info,
                NotifyLevel::Warning,
                NotifyLevel::Error,
                NotifyLevel::Success
            ]
        );
        assert_eq!(sent[2].title, "c");
        assert_eq!(sent[2].body, "3");
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let notifier = MockNotifier::new();
        notifier
            .set_next_error(NotifyError::Http("connection refused".to_string()))
            .await;
        let dispatcher = NotificationDispatcher::new(Arc::new(notifier.clone()));

        // Should not panic or propagate.
        dispatcher.error("pipeline failed", "boom").await;
        dispatcher.info("still", "working").await;

        assert_eq!(notifier.sent().await.len(), 1);
        assert_eq!(notifier.attempts().await, 2);
    }
}
