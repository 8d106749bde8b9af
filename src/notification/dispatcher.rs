//! Fire-and-forget dispatch of status notifications.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::NotificationSettings;
use crate::models::{Actor, AdvanceRequest, AdvanceStatus};

use super::{NotificationSender, route};

/// Sends status-change notifications on detached tasks.
///
/// Each routed notification gets exactly one delivery attempt. Failures are
/// logged and dropped; they never reach the caller of [`Self::notify`].
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: Arc<dyn NotificationSender>,
    settings: NotificationSettings,
}

impl NotificationDispatcher {
    /// Creates a dispatcher over `sender`.
    pub fn new(sender: Arc<dyn NotificationSender>, settings: NotificationSettings) -> Self {
        Self { sender, settings }
    }

    /// Routes the status change and spawns its delivery.
    ///
    /// Returns immediately. The handle may be awaited to observe completion;
    /// dropping it does not cancel delivery. Must be called from within a
    /// tokio runtime.
    pub fn notify(
        &self,
        request: &AdvanceRequest,
        status: AdvanceStatus,
        actor: &Actor,
        employee_email: &str,
    ) -> JoinHandle<()> {
        let notifications = route(request, status, actor, employee_email, &self.settings);
        let sender = Arc::clone(&self.sender);
        let request_id = request.id;

        tokio::spawn(async move {
            for notification in notifications {
                match sender.send(&notification).await {
                    Ok(()) => debug!(
                        request_id = %request_id,
                        to_status = %status,
                        recipient = %notification.recipient,
                        "Notification delivered"
                    ),
                    Err(err) => warn!(
                        request_id = %request_id,
                        to_status = %status,
                        recipient = %notification.recipient,
                        error = %err,
                        "Notification delivery failed"
                    ),
                }
            }
        })
    }
}
