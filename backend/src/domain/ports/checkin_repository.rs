//! Port for attendance persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Checkin, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by check-in repository adapters.
    pub enum CheckinRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "check-in repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "check-in repository query failed: {message}",
        /// The attendee is already checked in.
        Duplicate => "attendee is already checked in",
    }
}

/// Port for recording attendance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckinRepository: Send + Sync {
    /// The user's check-in for an event, if any.
    async fn find(
        &self,
        event_id: &Uuid,
        user_id: &UserId,
    ) -> Result<Option<Checkin>, CheckinRepositoryError>;

    /// Record a booking holder's attendance.
    async fn insert(&self, checkin: &Checkin) -> Result<(), CheckinRepositoryError>;

    /// Stamp a companion's attendance unless already stamped.
    ///
    /// Returns `false` when the companion was already checked in.
    async fn mark_companion_checked_in(
        &self,
        companion_id: &Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, CheckinRepositoryError>;
}

/// Fixture implementation for running without a database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCheckinRepository;

#[async_trait]
impl CheckinRepository for FixtureCheckinRepository {
    async fn find(
        &self,
        _event_id: &Uuid,
        _user_id: &UserId,
    ) -> Result<Option<Checkin>, CheckinRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _checkin: &Checkin) -> Result<(), CheckinRepositoryError> {
        Ok(())
    }

    async fn mark_companion_checked_in(
        &self,
        _companion_id: &Uuid,
        _at: DateTime<Utc>,
    ) -> Result<bool, CheckinRepositoryError> {
        Ok(true)
    }
}
