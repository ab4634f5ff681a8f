//! Operator notifications.
//!
//! Stages talk to a [`NotificationDispatcher`], which forwards to any
//! [`Notifier`] backend and never fails the caller.

mod dispatcher;
mod types;
mod webhook;

pub use dispatcher::NotificationDispatcher;
pub use types::{LogNotifier, Notification, NotifyError, NotifyLevel, Notifier};
pub use webhook::{WebhookNotifier, WebhookNotifierConfig};
