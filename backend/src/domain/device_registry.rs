//! Push device registration domain service.
//!
//! Implements the [`DeviceRegistration`] driving port and the token
//! housekeeping the fan-out engine relies on: resolving tokens for a
//! candidate set and pruning tokens a provider has declared dead.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    DeviceRegistration, DeviceRegistrationRequest, DeviceRepository, DeviceRepositoryError,
};
use crate::domain::{Device, DeviceId, Error, UserId};

/// Device service implementing [`DeviceRegistration`].
#[derive(Clone)]
pub struct DeviceRegistry<R> {
    repo: Arc<R>,
}

impl<R> DeviceRegistry<R> {
    /// Create a new registry backed by the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> DeviceRegistry<R>
where
    R: DeviceRepository,
{
    fn map_repository_error(error: DeviceRepositoryError) -> Error {
        match error {
            DeviceRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("device repository unavailable: {message}"))
            }
            DeviceRepositoryError::Query { message } => {
                Error::internal(format!("device repository error: {message}"))
            }
        }
    }

    /// Resolve endpoint tokens for every user in the candidate set.
    pub async fn tokens_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<Device>, DeviceRepositoryError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.repo.find_by_user_ids(user_ids).await
    }

    /// Remove tokens the push provider reported as permanently invalid.
    pub async fn prune_invalid(&self, tokens: &[String]) -> Result<usize, DeviceRepositoryError> {
        if tokens.is_empty() {
            return Ok(0);
        }
        let removed = self.repo.delete_by_tokens(tokens).await?;
        if removed > 0 {
            tracing::info!(removed, "pruned invalid push tokens");
        }
        Ok(removed)
    }
}

#[async_trait]
impl<R> DeviceRegistration for DeviceRegistry<R>
where
    R: DeviceRepository,
{
    async fn register(
        &self,
        user_id: &UserId,
        request: DeviceRegistrationRequest,
    ) -> Result<Device, Error> {
        if request.endpoint_token.trim().is_empty() {
            return Err(Error::invalid_request("endpoint token must not be empty"));
        }
        let device = Device {
            id: DeviceId::random(),
            user_id: *user_id,
            endpoint_token: request.endpoint_token,
            provider: request.provider,
            platform: request.platform,
            last_active_at: Utc::now(),
        };
        self.repo
            .upsert(&device)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn unregister(&self, user_id: &UserId, endpoint_token: &str) -> Result<(), Error> {
        let removed = self
            .repo
            .delete_owned(user_id, endpoint_token)
            .await
            .map_err(Self::map_repository_error)?;
        if removed == 0 {
            tracing::debug!(user_id = %user_id, "unregister matched no device");
        }
        Ok(())
    }
}
