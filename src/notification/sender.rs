//! Notification sender port and built-in senders.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use super::Notification;

/// A failed delivery attempt. Never propagated past the dispatcher.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The transport rejected or failed to deliver the message.
    #[error("delivery to {recipient} failed: {message}")]
    Delivery {
        /// Destination address.
        recipient: String,
        /// Transport-specific description.
        message: String,
    },
}

/// The templated-email pipeline, seen from this engine.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Delivers one notification.
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSender;

#[async_trait]
impl NotificationSender for LogSender {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        info!(
            recipient = %notification.recipient,
            subject = %notification.template.subject,
            link = %notification.template.link,
            "Notification sent"
        );
        Ok(())
    }
}

/// Keeps every delivered notification in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryOutbox {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryOutbox {
    /// Creates an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything delivered so far, in delivery order.
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl NotificationSender for MemoryOutbox {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        self.sent.lock().await.push(notification.clone());
        Ok(())
    }
}
