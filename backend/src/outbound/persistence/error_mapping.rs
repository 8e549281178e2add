//! Shared Diesel error mapping for the snapshot lifecycle adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a port-specific connection error constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.to_string())
}

/// Map Diesel errors into query or connection errors.
pub(crate) fn map_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        other => query(other.to_string()),
    }
}

/// Like [`map_diesel_error`] but reports constraint violations separately.
///
/// Foreign key, unique, not-null and check violations all map to
/// `constraint`, carrying the database message and constraint name.
pub(crate) fn map_insert_error<E, Q, C, K>(
    error: DieselError,
    query: Q,
    connection: C,
    constraint: K,
) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
    K: FnOnce(String) -> E,
{
    if let DieselError::DatabaseError(kind, info) = &error
        && matches!(
            kind,
            DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::CheckViolation
        )
    {
        log_diesel_error(&error);
        let message = match info.constraint_name() {
            Some(name) => format!("{} ({name})", info.message()),
            None => info.message().to_owned(),
        };
        return constraint(message);
    }
    map_diesel_error(error, query, connection)
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }
}
