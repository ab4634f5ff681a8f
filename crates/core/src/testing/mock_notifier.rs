//! Mock notifier for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::notify::{Notification, NotifyError, NotifyLevel, Notifier};

/// Mock implementation of the Notifier trait.
///
/// Delivered notifications are recorded. A failed delivery counts as an
/// attempt but is not recorded as sent.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    sent: Arc<RwLock<Vec<Notification>>>,
    attempts: Arc<RwLock<usize>>,
    /// If set, the next send will fail with this error.
    next_error: Arc<RwLock<Option<NotifyError>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the next send to fail with the given error.
    pub async fn set_next_error(&self, error: NotifyError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get delivered notifications, in order.
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }

    /// Delivered notifications of one level.
    pub async fn sent_with_level(&self, level: NotifyLevel) -> Vec<Notification> {
        self.sent
            .read()
            .await
            .iter()
            .filter(|n| n.level == level)
            .cloned()
            .collect()
    }

    /// Number of send calls, including failed ones.
    pub async fn attempts(&self) -> usize {
        *self.attempts.read().await
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        *self.attempts.write().await += 1;

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        self.sent.write().await.push(notification.clone());
        Ok(())
    }
}
