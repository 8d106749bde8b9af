//! Status-change notifications.
//!
//! Notifications are a best-effort side effect of committed writes. The
//! routing table picks recipients and templates, a [`NotificationSender`]
//! delivers them, and the [`NotificationDispatcher`] runs delivery on a
//! detached task so a failure can never undo or fail the write that caused it.

mod dispatcher;
mod sender;
mod templates;

pub use dispatcher::NotificationDispatcher;
pub use sender::{LogSender, MemoryOutbox, NotificationError, NotificationSender};
pub use templates::{Audience, Notification, NotificationTemplate, route};
