//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.
//!
//! Listing pages newest-first and every mutation that takes a user id folds
//! the owner check into the SQL predicate, so a foreign notification id
//! simply matches zero rows.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{
    Notification, NotificationId, NotificationKind, Page, PageRequest, UserId,
};

use super::diesel_error_mapping::map_diesel_error;
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

/// Diesel-backed implementation of the `NotificationRepository` port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotificationRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            NotificationRepositoryError::connection(message)
        }
    }
}

fn map_query_error(error: diesel::result::Error) -> NotificationRepositoryError {
    map_diesel_error(
        error,
        NotificationRepositoryError::connection,
        NotificationRepositoryError::query,
    )
}

fn row_to_notification(row: NotificationRow) -> Notification {
    let kind = row.kind.parse::<NotificationKind>().unwrap_or_else(|err| {
        tracing::warn!(
            notification_id = %row.id,
            error = %err,
            "unrecognised kind, treating as ADMIN_ANNOUNCEMENT"
        );
        NotificationKind::AdminAnnouncement
    });
    Notification {
        id: NotificationId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        kind,
        title: row.title,
        body: row.body,
        data: row.data,
        read: row.read,
        push_sent: row.push_sent,
        created_at: row.created_at,
    }
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(
        &self,
        notification: &Notification,
    ) -> Result<Notification, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewNotificationRow {
            id: *notification.id.as_uuid(),
            user_id: *notification.user_id.as_uuid(),
            kind: notification.kind.as_str(),
            title: &notification.title,
            body: &notification.body,
            data: &notification.data,
            read: notification.read,
            push_sent: notification.push_sent,
            created_at: notification.created_at,
        };
        let row: NotificationRow = diesel::insert_into(notifications::table)
            .values(&new_row)
            .returning(NotificationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_query_error)?;

        Ok(row_to_notification(row))
    }

    async fn page_for_user(
        &self,
        user_id: &UserId,
        request: PageRequest,
        read: Option<bool>,
    ) -> Result<Page<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut count_query = notifications::table
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .count()
            .into_boxed();
        let mut page_query = notifications::table
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .select(NotificationRow::as_select())
            .into_boxed();
        if let Some(read) = read {
            count_query = count_query.filter(notifications::read.eq(read));
            page_query = page_query.filter(notifications::read.eq(read));
        }

        let total: i64 = count_query
            .get_result(&mut conn)
            .await
            .map_err(map_query_error)?;

        let rows: Vec<NotificationRow> = page_query
            .order(notifications::created_at.desc())
            .offset(request.offset())
            .limit(i64::from(request.limit()))
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;

        let items = rows.into_iter().map(row_to_notification).collect();
        Ok(Page::new(
            items,
            request,
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn unread_count(
        &self,
        user_id: &UserId,
    ) -> Result<i64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        notifications::table
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .filter(notifications::read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_query_error)
    }

    async fn mark_read(
        &self,
        user_id: &UserId,
        notification_id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<NotificationRow> = diesel::update(
            notifications::table
                .filter(notifications::id.eq(notification_id.as_uuid()))
                .filter(notifications::user_id.eq(user_id.as_uuid())),
        )
        .set(notifications::read.eq(true))
        .returning(NotificationRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_query_error)?;

        Ok(row.map(row_to_notification))
    }

    async fn mark_all_read(
        &self,
        user_id: &UserId,
    ) -> Result<usize, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user_id.as_uuid()))
                .filter(notifications::read.eq(false)),
        )
        .set(notifications::read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_query_error)
    }

    async fn mark_push_sent(
        &self,
        notification_id: &NotificationId,
    ) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(notifications::table.find(notification_id.as_uuid()))
            .set(notifications::push_sent.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_query_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    #[rstest]
    #[case::job_alert("JOB_ALERT", NotificationKind::JobAlert)]
    #[case::scheme_alert("SCHEME_ALERT", NotificationKind::SchemeAlert)]
    #[case::unknown("BROADCAST", NotificationKind::AdminAnnouncement)]
    fn row_conversion_parses_kinds_leniently(
        #[case] stored: &str,
        #[case] expected: NotificationKind,
    ) {
        let row = NotificationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: stored.to_owned(),
            title: "New job match".to_owned(),
            body: "Staff Nurse".to_owned(),
            data: json!({"jobId": "j-1"}),
            read: false,
            push_sent: false,
            created_at: Utc::now(),
        };
        assert_eq!(row_to_notification(row).kind, expected);
    }
}
