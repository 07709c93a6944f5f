//! Port for event, organizer and review persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Event, EventReview, EventStatus, EventType, OrganizerProfile, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by event repository adapters.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "event repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } =>
            "event repository conflict: {message}",
    }
}

/// Filter for published event listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventListFilter {
    /// Restrict to one activity category.
    pub event_type: Option<EventType>,
    /// Maximum rows to return.
    pub limit: u32,
}

/// Port for reading and writing events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Find an event by id, whatever its status.
    async fn find_by_id(&self, event_id: &Uuid) -> Result<Option<Event>, EventRepositoryError>;

    /// List published events ordered by start time.
    async fn list_published(
        &self,
        filter: &EventListFilter,
    ) -> Result<Vec<Event>, EventRepositoryError>;

    /// Find the organizer profile owned by a user.
    async fn find_organizer_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<OrganizerProfile>, EventRepositoryError>;

    /// Find an organizer profile by id.
    async fn find_organizer(
        &self,
        organizer_id: &Uuid,
    ) -> Result<Option<OrganizerProfile>, EventRepositoryError>;

    /// Insert a new event and link its mountains.
    async fn insert(&self, event: &Event, mountain_ids: &[Uuid])
    -> Result<(), EventRepositoryError>;

    /// Overwrite an event's status.
    async fn update_status(
        &self,
        event_id: &Uuid,
        status: EventStatus,
    ) -> Result<(), EventRepositoryError>;

    /// Insert a review; a second review by the same user is a conflict.
    async fn insert_review(&self, review: &EventReview) -> Result<(), EventRepositoryError>;
}

/// Fixture implementation for running without a database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEventRepository;

#[async_trait]
impl EventRepository for FixtureEventRepository {
    async fn find_by_id(&self, _event_id: &Uuid) -> Result<Option<Event>, EventRepositoryError> {
        Ok(None)
    }

    async fn list_published(
        &self,
        _filter: &EventListFilter,
    ) -> Result<Vec<Event>, EventRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_organizer_by_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<OrganizerProfile>, EventRepositoryError> {
        Ok(None)
    }

    async fn find_organizer(
        &self,
        _organizer_id: &Uuid,
    ) -> Result<Option<OrganizerProfile>, EventRepositoryError> {
        Ok(None)
    }

    async fn insert(
        &self,
        _event: &Event,
        _mountain_ids: &[Uuid],
    ) -> Result<(), EventRepositoryError> {
        Ok(())
    }

    async fn update_status(
        &self,
        _event_id: &Uuid,
        _status: EventStatus,
    ) -> Result<(), EventRepositoryError> {
        Ok(())
    }

    async fn insert_review(&self, _review: &EventReview) -> Result<(), EventRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_finds_nothing() {
        let repo = FixtureEventRepository;
        let found = repo
            .find_by_id(&Uuid::new_v4())
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
        let listed = repo
            .list_published(&EventListFilter {
                event_type: None,
                limit: 20,
            })
            .await
            .expect("fixture list succeeds");
        assert!(listed.is_empty());
    }

    #[rstest]
    fn conflict_error_formats_message() {
        let err = EventRepositoryError::conflict("duplicate review");
        assert!(err.to_string().contains("duplicate review"));
    }
}
