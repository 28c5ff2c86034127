//! Shared Diesel-to-port error mapping.
//!
//! Every repository port distinguishes connection failures (retryable, maps
//! to 503 at the edge) from query failures (maps to 500). The raw Diesel
//! error text is logged here and not propagated so driver internals never
//! reach API responses.

use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Map a Diesel error onto a port error via its two constructors.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    connection: impl FnOnce(String) -> E,
    query: impl FnOnce(String) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            tracing::debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => {
            tracing::debug!(error = %other, "diesel operation failed");
        }
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error".to_owned())
        }
        DieselError::NotFound => query("record not found".to_owned()),
        _ => query("database error".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[derive(Debug, PartialEq)]
    enum Mapped {
        Connection(String),
        Query(String),
    }

    #[rstest]
    fn not_found_maps_to_query() {
        let mapped = map_diesel_error(DieselError::NotFound, Mapped::Connection, Mapped::Query);
        assert_eq!(mapped, Mapped::Query("record not found".to_owned()));
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection unexpectedly".to_owned()),
        );
        let mapped = map_diesel_error(error, Mapped::Connection, Mapped::Query);
        assert_eq!(
            mapped,
            Mapped::Connection("database connection error".to_owned())
        );
    }
}
