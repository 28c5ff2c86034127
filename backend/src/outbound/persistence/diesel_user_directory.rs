//! PostgreSQL-backed `UserDirectory` implementation using Diesel ORM.
//!
//! Translates user rows into the domain profile shape the fan-out engine
//! consumes. Unrecognised stored values (an unknown education level, a
//! malformed domain list) degrade to the permissive default with a warning
//! rather than failing the whole directory read.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{DomainPreference, Education, Role, User, UserId, UserProfile};

use super::diesel_error_mapping::map_diesel_error;
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserDirectory` port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserDirectoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserDirectoryError::connection(message)
        }
    }
}

fn row_to_user(row: UserRow) -> User {
    let role = match row.role.as_str() {
        "ADMIN" => Role::Admin,
        "USER" => Role::User,
        other => {
            tracing::warn!(value = other, user_id = %row.id, "unrecognised role, treating as USER");
            Role::User
        }
    };
    let education = row.education.as_deref().and_then(|value| {
        value
            .parse::<Education>()
            .map_err(|err| {
                tracing::warn!(user_id = %row.id, error = %err, "ignoring stored education level");
            })
            .ok()
    });
    let preferred_domains = DomainPreference::try_from(row.preferred_domains).unwrap_or_else(
        |err| {
            tracing::warn!(user_id = %row.id, error = %err, "malformed domain list, treating as ALL");
            DomainPreference::All
        },
    );

    User {
        id: UserId::from_uuid(row.id),
        role,
        is_active: row.is_active,
        profile: UserProfile {
            full_name: row.full_name,
            date_of_birth: row.date_of_birth,
            age: row.age,
            education,
            state: row.state,
            district: row.district,
            preferred_domains,
        },
    }
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn active_users(&self) -> Result<Vec<User>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .filter(users::is_active.eq(true))
            .filter(users::role.eq(Role::User.as_str()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, UserDirectoryError::connection, UserDirectoryError::query))?;

        Ok(rows.into_iter().map(row_to_user).collect())
    }

    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(user_id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, UserDirectoryError::connection, UserDirectoryError::query))?;

        Ok(row.map(row_to_user))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn sample_row(role: &str, education: Option<&str>, domains: Vec<String>) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            role: role.to_owned(),
            is_active: true,
            full_name: Some("Asha Devi".to_owned()),
            date_of_birth: None,
            age: Some(24),
            education: education.map(str::to_owned),
            state: Some("Bihar".to_owned()),
            district: None,
            preferred_domains: domains,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case::graduate("Graduate", Some(Education::Graduate))]
    #[case::iti("ITI", Some(Education::Iti))]
    #[case::unknown("Diploma", None)]
    fn row_conversion_parses_education_leniently(
        #[case] stored: &str,
        #[case] expected: Option<Education>,
    ) {
        let user = row_to_user(sample_row("USER", Some(stored), vec!["ALL".to_owned()]));
        assert_eq!(user.profile.education, expected);
    }

    #[rstest]
    fn row_conversion_degrades_malformed_domain_lists_to_all() {
        let row = sample_row(
            "USER",
            None,
            vec!["ALL".to_owned(), "Police".to_owned()],
        );
        let user = row_to_user(row);
        assert_eq!(user.profile.preferred_domains, DomainPreference::All);
    }

    #[rstest]
    #[case::admin("ADMIN", Role::Admin)]
    #[case::user("USER", Role::User)]
    #[case::unknown("MODERATOR", Role::User)]
    fn row_conversion_parses_roles(#[case] stored: &str, #[case] expected: Role) {
        let user = row_to_user(sample_row(stored, None, Vec::new()));
        assert_eq!(user.role, expected);
    }
}
