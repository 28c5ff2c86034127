//! Driving port for push device registration.

use async_trait::async_trait;

use crate::domain::{Device, Error, Platform, PushProvider, UserId};

/// A device registration request from an authenticated client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRegistrationRequest {
    pub endpoint_token: String,
    pub provider: PushProvider,
    pub platform: Platform,
}

/// Port through which clients attach and detach push endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceRegistration: Send + Sync {
    /// Register or refresh a device token for the user.
    ///
    /// A token already registered to another account is reassigned to the
    /// caller.
    async fn register(
        &self,
        user_id: &UserId,
        request: DeviceRegistrationRequest,
    ) -> Result<Device, Error>;

    /// Remove the user's registration for a token.
    ///
    /// Idempotent: unknown tokens and tokens owned by other users succeed
    /// without effect.
    async fn unregister(&self, user_id: &UserId, endpoint_token: &str) -> Result<(), Error>;
}
