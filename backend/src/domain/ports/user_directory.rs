//! Port for reading the user directory.
//!
//! The fan-out engine works on a point-in-time snapshot of active
//! USER-role accounts; the WebSocket adapter uses the same port to verify
//! that a connecting session still belongs to an active account.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "user directory query failed: {message}",
    }
}

/// Port for user directory reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Snapshot every active USER-role account with its profile.
    ///
    /// Profile completeness is not filtered here; the fan-out engine gates
    /// per listing kind because jobs and schemes need different fields.
    async fn active_users(&self) -> Result<Vec<User>, UserDirectoryError>;

    /// Fetch one account by id, active or not.
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, UserDirectoryError>;
}

/// Fixture implementation for tests that do not exercise the directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn active_users(&self) -> Result<Vec<User>, UserDirectoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _user_id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        Ok(None)
    }
}
