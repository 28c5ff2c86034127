//! PostgreSQL-backed `DeviceRepository` implementation using Diesel ORM.
//!
//! Registration is an upsert on the `endpoint_token` UNIQUE constraint so a
//! token re-registered from a different account moves to the new owner
//! instead of raising a conflict.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DeviceRepository, DeviceRepositoryError};
use crate::domain::{Device, DeviceId, Platform, PushProvider, UserId};

use super::diesel_error_mapping::map_diesel_error;
use super::models::{DeviceRow, NewDeviceRow};
use super::pool::{DbPool, PoolError};
use super::schema::devices;

/// Diesel-backed implementation of the `DeviceRepository` port.
#[derive(Clone)]
pub struct DieselDeviceRepository {
    pool: DbPool,
}

impl DieselDeviceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DeviceRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DeviceRepositoryError::connection(message)
        }
    }
}

fn map_query_error(error: diesel::result::Error) -> DeviceRepositoryError {
    map_diesel_error(
        error,
        DeviceRepositoryError::connection,
        DeviceRepositoryError::query,
    )
}

fn row_to_device(row: DeviceRow) -> Device {
    let provider = match row.provider.as_str() {
        "onesignal" => PushProvider::OneSignal,
        "fcm" => PushProvider::Fcm,
        other => {
            tracing::warn!(value = other, device_id = %row.id, "unrecognised provider, treating as fcm");
            PushProvider::Fcm
        }
    };
    let platform = row.platform.parse::<Platform>().unwrap_or_else(|err| {
        tracing::warn!(device_id = %row.id, error = %err, "unrecognised platform, treating as android");
        Platform::Android
    });

    Device {
        id: DeviceId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        endpoint_token: row.endpoint_token,
        provider,
        platform,
        last_active_at: row.last_active_at,
    }
}

#[async_trait]
impl DeviceRepository for DieselDeviceRepository {
    async fn upsert(&self, device: &Device) -> Result<Device, DeviceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewDeviceRow {
            id: *device.id.as_uuid(),
            user_id: *device.user_id.as_uuid(),
            endpoint_token: &device.endpoint_token,
            provider: device.provider.as_str(),
            platform: device.platform.as_str(),
            last_active_at: device.last_active_at,
        };
        let row: DeviceRow = diesel::insert_into(devices::table)
            .values(&new_row)
            .on_conflict(devices::endpoint_token)
            .do_update()
            .set((
                devices::user_id.eq(new_row.user_id),
                devices::provider.eq(new_row.provider),
                devices::platform.eq(new_row.platform),
                devices::last_active_at.eq(new_row.last_active_at),
            ))
            .returning(DeviceRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_query_error)?;

        Ok(row_to_device(row))
    }

    async fn delete_owned(
        &self,
        user_id: &UserId,
        endpoint_token: &str,
    ) -> Result<usize, DeviceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(
            devices::table
                .filter(devices::user_id.eq(user_id.as_uuid()))
                .filter(devices::endpoint_token.eq(endpoint_token)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_query_error)
    }

    async fn find_by_user_ids(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<Device>, DeviceRepositoryError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let uuids: Vec<uuid::Uuid> = user_ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<DeviceRow> = devices::table
            .filter(devices::user_id.eq_any(uuids))
            .select(DeviceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;

        Ok(rows.into_iter().map(row_to_device).collect())
    }

    async fn delete_by_tokens(&self, tokens: &[String]) -> Result<usize, DeviceRepositoryError> {
        if tokens.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(devices::table.filter(devices::endpoint_token.eq_any(tokens)))
            .execute(&mut conn)
            .await
            .map_err(map_query_error)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn sample_row(provider: &str, platform: &str) -> DeviceRow {
        DeviceRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            endpoint_token: "tok-1".to_owned(),
            provider: provider.to_owned(),
            platform: platform.to_owned(),
            last_active_at: Utc::now(),
        }
    }

    #[rstest]
    #[case::fcm("fcm", PushProvider::Fcm)]
    #[case::onesignal("onesignal", PushProvider::OneSignal)]
    #[case::unknown("apns", PushProvider::Fcm)]
    fn row_conversion_parses_providers_leniently(
        #[case] stored: &str,
        #[case] expected: PushProvider,
    ) {
        let device = row_to_device(sample_row(stored, "android"));
        assert_eq!(device.provider, expected);
    }

    #[rstest]
    #[case::ios("ios", Platform::Ios)]
    #[case::unknown("windows", Platform::Android)]
    fn row_conversion_parses_platforms_leniently(
        #[case] stored: &str,
        #[case] expected: Platform,
    ) {
        let device = row_to_device(sample_row("fcm", stored));
        assert_eq!(device.platform, expected);
    }
}
