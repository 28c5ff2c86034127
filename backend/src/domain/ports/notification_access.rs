//! Driving port for a user's own notification inbox.

use async_trait::async_trait;

use crate::domain::{Error, Notification, NotificationId, Page, PageRequest, UserId};

/// Port through which authenticated users read and acknowledge their
/// notifications.
///
/// Every operation is scoped to the calling user; a notification id owned
/// by someone else is indistinguishable from a missing one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationAccess: Send + Sync {
    /// List the user's notifications, newest first.
    ///
    /// `read` narrows the page to read or unread entries; `None` lists both.
    async fn list(
        &self,
        user_id: &UserId,
        request: PageRequest,
        read: Option<bool>,
    ) -> Result<Page<Notification>, Error>;

    /// Count the user's unread notifications.
    async fn unread_count(&self, user_id: &UserId) -> Result<i64, Error>;

    /// Mark one notification read and return its updated record.
    async fn mark_read(
        &self,
        user_id: &UserId,
        notification_id: &NotificationId,
    ) -> Result<Notification, Error>;

    /// Mark all of the user's notifications read, returning the count updated.
    async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, Error>;
}
