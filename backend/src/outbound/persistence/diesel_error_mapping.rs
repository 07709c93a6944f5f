//! Translation of pool and Diesel failures into port error enums.
//!
//! Every repository port error has connection and query variants; some also
//! model uniqueness violations (duplicate follow, second check-in, second
//! review). [`RepositoryErrorKind`] lets one mapper serve all of them.

use tracing::debug;

use crate::domain::ports::{
    AchievementRepositoryError, BookingRepositoryError, CheckinRepositoryError,
    EventRepositoryError, SocialRepositoryError, UserDirectoryError,
};

use super::pool::PoolError;

/// Constructors shared by repository port errors.
pub(crate) trait RepositoryErrorKind: Sized {
    /// The database could not be reached.
    fn connection_failed(message: String) -> Self;

    /// The statement failed.
    fn query_failed(message: String) -> Self;

    /// A unique constraint rejected the write.
    fn unique_violation(constraint: Option<&str>) -> Self {
        Self::query_failed(format!(
            "unique constraint violated: {}",
            constraint.unwrap_or("unknown")
        ))
    }
}

/// Map pool checkout or build failures to a connection error.
pub(crate) fn map_pool_error<E: RepositoryErrorKind>(error: PoolError) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    E::connection_failed(message)
}

/// Map a Diesel error, keeping driver detail out of the returned message.
pub(crate) fn map_diesel_error<E: RepositoryErrorKind>(error: diesel::result::Error) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => E::query_failed("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query_failed("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            E::unique_violation(info.constraint_name())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection_failed("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            E::query_failed(format!(
                "foreign key violation: {}",
                info.constraint_name().unwrap_or("unknown")
            ))
        }
        _ => E::query_failed("database error".to_owned()),
    }
}

/// Collect row conversions, reporting the first malformed row as a query error.
pub(crate) fn collect_rows<T, E: RepositoryErrorKind>(
    results: impl Iterator<Item = Result<T, String>>,
) -> Result<Vec<T>, E> {
    results
        .collect::<Result<Vec<_>, _>>()
        .map_err(|message| E::query_failed(format!("malformed row: {message}")))
}

macro_rules! basic_repository_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl RepositoryErrorKind for $error {
                fn connection_failed(message: String) -> Self {
                    Self::connection(message)
                }

                fn query_failed(message: String) -> Self {
                    Self::query(message)
                }
            }
        )*
    };
}

basic_repository_error!(
    BookingRepositoryError,
    AchievementRepositoryError,
    UserDirectoryError,
);

impl RepositoryErrorKind for EventRepositoryError {
    fn connection_failed(message: String) -> Self {
        Self::connection(message)
    }

    fn query_failed(message: String) -> Self {
        Self::query(message)
    }

    fn unique_violation(constraint: Option<&str>) -> Self {
        Self::conflict(constraint.unwrap_or("unique constraint"))
    }
}

impl RepositoryErrorKind for CheckinRepositoryError {
    fn connection_failed(message: String) -> Self {
        Self::connection(message)
    }

    fn query_failed(message: String) -> Self {
        Self::query(message)
    }

    fn unique_violation(_constraint: Option<&str>) -> Self {
        Self::duplicate()
    }
}

impl RepositoryErrorKind for SocialRepositoryError {
    fn connection_failed(message: String) -> Self {
        Self::connection(message)
    }

    fn query_failed(message: String) -> Self {
        Self::query(message)
    }

    fn unique_violation(_constraint: Option<&str>) -> Self {
        Self::duplicate()
    }
}
