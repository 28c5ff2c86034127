//! Notification inbox domain service.
//!
//! Implements the [`NotificationAccess`] driving port on top of a
//! [`NotificationRepository`], mapping repository failures to API errors and
//! enforcing owner scoping for acknowledgements.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    NotificationAccess, NotificationRepository, NotificationRepositoryError,
};
use crate::domain::{Error, Notification, NotificationId, Page, PageRequest, UserId};

/// Inbox service implementing [`NotificationAccess`].
#[derive(Clone)]
pub struct NotificationStore<R> {
    repo: Arc<R>,
}

impl<R> NotificationStore<R> {
    /// Create a new store backed by the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> NotificationStore<R>
where
    R: NotificationRepository,
{
    fn map_repository_error(error: NotificationRepositoryError) -> Error {
        match error {
            NotificationRepositoryError::Connection { message } => {
                Error::service_unavailable(format!(
                    "notification repository unavailable: {message}"
                ))
            }
            NotificationRepositoryError::Query { message } => {
                Error::internal(format!("notification repository error: {message}"))
            }
        }
    }
}

#[async_trait]
impl<R> NotificationAccess for NotificationStore<R>
where
    R: NotificationRepository,
{
    async fn list(
        &self,
        user_id: &UserId,
        request: PageRequest,
        read: Option<bool>,
    ) -> Result<Page<Notification>, Error> {
        self.repo
            .page_for_user(user_id, request, read)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn unread_count(&self, user_id: &UserId) -> Result<i64, Error> {
        self.repo
            .unread_count(user_id)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn mark_read(
        &self,
        user_id: &UserId,
        notification_id: &NotificationId,
    ) -> Result<Notification, Error> {
        self.repo
            .mark_read(user_id, notification_id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found("notification not found"))
    }

    async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, Error> {
        self.repo
            .mark_all_read(user_id)
            .await
            .map_err(Self::map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::domain::ports::MockNotificationRepository;
    use crate::domain::{ErrorCode, NotificationKind};

    fn sample_notification(user_id: UserId) -> Notification {
        Notification {
            id: NotificationId::random(),
            user_id,
            kind: NotificationKind::JobAlert,
            title: "New job match".into(),
            body: "Staff Nurse".into(),
            data: json!({"jobId": "j-1"}),
            read: false,
            push_sent: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn mark_read_surfaces_the_updated_record() {
        let user_id = UserId::random();
        let mut updated = sample_notification(user_id);
        updated.read = true;
        let expected_id = updated.id;

        let mut repo = MockNotificationRepository::new();
        let returned = updated.clone();
        repo.expect_mark_read()
            .withf(move |uid, nid| *uid == user_id && *nid == expected_id)
            .return_once(move |_, _| Ok(Some(returned)));

        let store = NotificationStore::new(Arc::new(repo));
        let result = store
            .mark_read(&user_id, &expected_id)
            .await
            .expect("mark read");
        assert!(result.read);
        assert_eq!(result.id, expected_id);
    }

    #[tokio::test]
    async fn mark_read_maps_missing_or_foreign_records_to_not_found() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read().return_once(|_, _| Ok(None));

        let store = NotificationStore::new(Arc::new(repo));
        let err = store
            .mark_read(&UserId::random(), &NotificationId::random())
            .await
            .expect_err("should miss");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn connection_failures_map_to_service_unavailable() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_unread_count()
            .return_once(|_| Err(NotificationRepositoryError::connection("refused")));

        let store = NotificationStore::new(Arc::new(repo));
        let err = store
            .unread_count(&UserId::random())
            .await
            .expect_err("should fail");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn mark_all_read_reports_the_updated_count() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_all_read().return_once(|_| Ok(7));

        let store = NotificationStore::new(Arc::new(repo));
        assert_eq!(
            store.mark_all_read(&UserId::random()).await.expect("count"),
            7
        );
    }
}
