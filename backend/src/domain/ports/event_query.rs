//! Driving port for event reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, EventType, UserId};

use super::EventPayload;

/// Listing size used when the caller does not ask for one.
pub const DEFAULT_EVENT_LIMIT: u32 = 20;
/// Largest listing size accepted.
pub const MAX_EVENT_LIMIT: u32 = 100;

/// Request to list published events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListEventsRequest {
    pub event_type: Option<EventType>,
    pub limit: Option<u32>,
}

/// Request to read one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetEventRequest {
    pub event_id: Uuid,
    /// Signed-in viewer, used to reveal drafts to their organizer.
    pub viewer: Option<UserId>,
}

/// Driving port for event read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventQuery: Send + Sync {
    /// Published events ordered by start time.
    async fn list_events(&self, request: ListEventsRequest) -> Result<Vec<EventPayload>, Error>;

    /// One event, hiding drafts from everyone but their organizer.
    async fn get_event(&self, request: GetEventRequest) -> Result<EventPayload, Error>;
}
