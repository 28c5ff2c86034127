//! Port for push device persistence.
//!
//! Device rows are keyed by their endpoint token, which is globally unique:
//! registering a token already held by another user reassigns it. Pruning by
//! token supports self-healing after a provider reports tokens dead.

use async_trait::async_trait;

use crate::domain::{Device, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by device repository adapters.
    pub enum DeviceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "device repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "device repository query failed: {message}",
    }
}

/// Port for registering, unregistering, and resolving push devices.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Upsert a device keyed by its endpoint token.
    ///
    /// When the token already exists the row is reassigned to
    /// `device.user_id` and its platform and `last_active_at` refreshed.
    async fn upsert(&self, device: &Device) -> Result<Device, DeviceRepositoryError>;

    /// Delete the device with `endpoint_token` if it belongs to `user_id`.
    ///
    /// Returns the number of rows removed; zero when the token was unknown
    /// or owned by someone else.
    async fn delete_owned(
        &self,
        user_id: &UserId,
        endpoint_token: &str,
    ) -> Result<usize, DeviceRepositoryError>;

    /// Fetch every device registered to any user in the set.
    async fn find_by_user_ids(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<Device>, DeviceRepositoryError>;

    /// Remove devices whose endpoint tokens the provider rejected.
    ///
    /// Returns the number of rows removed.
    async fn delete_by_tokens(&self, tokens: &[String]) -> Result<usize, DeviceRepositoryError>;
}

/// Fixture implementation with no backing store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDeviceRepository;

#[async_trait]
impl DeviceRepository for FixtureDeviceRepository {
    async fn upsert(&self, device: &Device) -> Result<Device, DeviceRepositoryError> {
        Ok(device.clone())
    }

    async fn delete_owned(
        &self,
        _user_id: &UserId,
        _endpoint_token: &str,
    ) -> Result<usize, DeviceRepositoryError> {
        Ok(0)
    }

    async fn find_by_user_ids(
        &self,
        _user_ids: &[UserId],
    ) -> Result<Vec<Device>, DeviceRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete_by_tokens(&self, _tokens: &[String]) -> Result<usize, DeviceRepositoryError> {
        Ok(0)
    }
}
