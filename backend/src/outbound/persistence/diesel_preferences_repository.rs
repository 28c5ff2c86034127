//! PostgreSQL-backed `PreferencesRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PreferencesRepository, PreferencesRepositoryError};
use crate::domain::{NotificationSettings, UserId, UserPreference};

use super::diesel_error_mapping::map_diesel_error;
use super::models::{UserPreferenceRow, UserPreferenceUpsert};
use super::pool::{DbPool, PoolError};
use super::schema::user_preferences;

/// Diesel-backed implementation of the `PreferencesRepository` port.
#[derive(Clone)]
pub struct DieselPreferencesRepository {
    pool: DbPool,
}

impl DieselPreferencesRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PreferencesRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PreferencesRepositoryError::connection(message)
        }
    }
}

fn map_query_error(error: diesel::result::Error) -> PreferencesRepositoryError {
    map_diesel_error(
        error,
        PreferencesRepositoryError::connection,
        PreferencesRepositoryError::query,
    )
}

fn row_to_preference(row: UserPreferenceRow) -> UserPreference {
    UserPreference {
        user_id: UserId::from_uuid(row.user_id),
        notification_settings: NotificationSettings {
            job_alerts: row.job_alerts,
            scheme_alerts: row.scheme_alerts,
            reminders: row.reminders,
            push_notifications: row.push_notifications,
            email_notifications: row.email_notifications,
            sms_notifications: row.sms_notifications,
        },
        updated_at: row.updated_at,
    }
}

fn preference_to_upsert(preference: &UserPreference) -> UserPreferenceUpsert {
    let settings = preference.notification_settings;
    UserPreferenceUpsert {
        user_id: *preference.user_id.as_uuid(),
        job_alerts: settings.job_alerts,
        scheme_alerts: settings.scheme_alerts,
        reminders: settings.reminders,
        push_notifications: settings.push_notifications,
        email_notifications: settings.email_notifications,
        sms_notifications: settings.sms_notifications,
        updated_at: preference.updated_at,
    }
}

#[async_trait]
impl PreferencesRepository for DieselPreferencesRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserPreference>, PreferencesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserPreferenceRow> = user_preferences::table
            .find(user_id.as_uuid())
            .select(UserPreferenceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;

        Ok(row.map(row_to_preference))
    }

    async fn find_by_user_ids(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<UserPreference>, PreferencesRepositoryError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let uuids: Vec<uuid::Uuid> = user_ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<UserPreferenceRow> = user_preferences::table
            .filter(user_preferences::user_id.eq_any(uuids))
            .select(UserPreferenceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;

        Ok(rows.into_iter().map(row_to_preference).collect())
    }

    async fn save(&self, preference: &UserPreference) -> Result<(), PreferencesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let upsert = preference_to_upsert(preference);
        diesel::insert_into(user_preferences::table)
            .values(&upsert)
            .on_conflict(user_preferences::user_id)
            .do_update()
            .set(&upsert)
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
    use uuid::Uuid;

    use super::*;

    #[rstest]
    fn row_conversion_preserves_every_toggle() {
        let row = UserPreferenceRow {
            user_id: Uuid::new_v4(),
            job_alerts: false,
            scheme_alerts: true,
            reminders: true,
            push_notifications: false,
            email_notifications: true,
            sms_notifications: false,
            updated_at: Utc::now(),
        };
        let preference = row_to_preference(row.clone());
        assert_eq!(preference.user_id, UserId::from_uuid(row.user_id));
        assert!(!preference.notification_settings.job_alerts);
        assert!(preference.notification_settings.scheme_alerts);
        assert!(!preference.notification_settings.push_notifications);
        assert!(preference.notification_settings.email_notifications);
    }

    #[rstest]
    fn upsert_round_trips_through_the_row_shape() {
        let preference = UserPreference::new_default(UserId::random());
        let upsert = preference_to_upsert(&preference);
        assert_eq!(upsert.user_id, *preference.user_id.as_uuid());
        assert!(upsert.job_alerts);
        assert!(!upsert.email_notifications);
    }
}
