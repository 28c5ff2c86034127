//! Port for user preference persistence.

use async_trait::async_trait;

use crate::domain::{UserId, UserPreference};

use super::define_port_error;

define_port_error! {
    /// Errors raised by preference repository adapters.
    pub enum PreferencesRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "preferences repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "preferences repository query failed: {message}",
    }
}

/// Port for preference storage and retrieval.
///
/// Preference records are created lazily; `find_*` returning no record for
/// a user is normal and callers fall back to permissive defaults.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// Fetch the preference record for one user, if any.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserPreference>, PreferencesRepositoryError>;

    /// Bulk-fetch preference records for a candidate set in one query.
    ///
    /// Users without a stored record are simply absent from the result.
    async fn find_by_user_ids(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<UserPreference>, PreferencesRepositoryError>;

    /// Upsert a preference record keyed by user id.
    async fn save(&self, preference: &UserPreference) -> Result<(), PreferencesRepositoryError>;
}

/// Fixture implementation that stores nothing and finds nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePreferencesRepository;

#[async_trait]
impl PreferencesRepository for FixturePreferencesRepository {
    async fn find_by_user_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<UserPreference>, PreferencesRepositoryError> {
        Ok(None)
    }

    async fn find_by_user_ids(
        &self,
        _user_ids: &[UserId],
    ) -> Result<Vec<UserPreference>, PreferencesRepositoryError> {
        Ok(Vec::new())
    }

    async fn save(&self, _preference: &UserPreference) -> Result<(), PreferencesRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_repository_returns_no_records() {
        let repo = FixturePreferencesRepository;
        let ids = [UserId::random(), UserId::random()];
        assert!(repo.find_by_user_ids(&ids).await.expect("bulk").is_empty());
        assert!(repo.find_by_user_id(&ids[0]).await.expect("one").is_none());
    }
}
