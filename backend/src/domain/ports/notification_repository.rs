//! Port for notification persistence.

use async_trait::async_trait;

use crate::domain::{Notification, NotificationId, Page, PageRequest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification repository query failed: {message}",
    }
}

/// Port for storing and querying persisted notifications.
///
/// Mutations that take a `user_id` are owner-filtered: a notification id
/// belonging to another user behaves as if it did not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a notification and return the stored record.
    async fn insert(
        &self,
        notification: &Notification,
    ) -> Result<Notification, NotificationRepositoryError>;

    /// List a user's notifications, newest first.
    ///
    /// `read` narrows the page to read or unread entries; `None` lists both.
    async fn page_for_user(
        &self,
        user_id: &UserId,
        request: PageRequest,
        read: Option<bool>,
    ) -> Result<Page<Notification>, NotificationRepositoryError>;

    /// Count a user's unread notifications.
    async fn unread_count(&self, user_id: &UserId)
    -> Result<i64, NotificationRepositoryError>;

    /// Mark one notification read and return it.
    ///
    /// Returns `None` when the id does not exist or belongs to another user.
    async fn mark_read(
        &self,
        user_id: &UserId,
        notification_id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationRepositoryError>;

    /// Mark every unread notification for the user read.
    ///
    /// Returns the number of rows updated.
    async fn mark_all_read(&self, user_id: &UserId)
    -> Result<usize, NotificationRepositoryError>;

    /// Record that at least one push delivery succeeded for the notification.
    async fn mark_push_sent(
        &self,
        notification_id: &NotificationId,
    ) -> Result<(), NotificationRepositoryError>;
}

/// Fixture implementation with no backing store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationRepository;

#[async_trait]
impl NotificationRepository for FixtureNotificationRepository {
    async fn insert(
        &self,
        notification: &Notification,
    ) -> Result<Notification, NotificationRepositoryError> {
        Ok(notification.clone())
    }

    async fn page_for_user(
        &self,
        _user_id: &UserId,
        request: PageRequest,
        _read: Option<bool>,
    ) -> Result<Page<Notification>, NotificationRepositoryError> {
        Ok(Page::new(Vec::new(), request, 0))
    }

    async fn unread_count(
        &self,
        _user_id: &UserId,
    ) -> Result<i64, NotificationRepositoryError> {
        Ok(0)
    }

    async fn mark_read(
        &self,
        _user_id: &UserId,
        _notification_id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        Ok(None)
    }

    async fn mark_all_read(
        &self,
        _user_id: &UserId,
    ) -> Result<usize, NotificationRepositoryError> {
        Ok(0)
    }

    async fn mark_push_sent(
        &self,
        _notification_id: &NotificationId,
    ) -> Result<(), NotificationRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_repository_pages_empty_results() {
        let repo = FixtureNotificationRepository;
        let page = repo
            .page_for_user(&UserId::random(), PageRequest::default(), None)
            .await
            .expect("page");
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(repo.unread_count(&UserId::random()).await.expect("count"), 0);
    }
}
