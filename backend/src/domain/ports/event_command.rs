//! Driving port for event mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, Event, EventReview, EventStatus, EventType, NewEvent, UserId};

/// Serializable event payload for driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_type: EventType,
    pub status: EventStatus,
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub price: i32,
    pub max_participants: u32,
}

impl From<Event> for EventPayload {
    fn from(value: Event) -> Self {
        Self {
            id: value.id,
            organizer_id: value.organizer_id,
            title: value.title,
            description: value.description,
            event_type: value.event_type,
            status: value.status,
            location: value.location,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            price: value.price,
            max_participants: value.max_participants,
        }
    }
}

/// Request to create a draft event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventRequest {
    pub user_id: UserId,
    pub event: NewEvent,
}

/// Request to move an event to another status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEventRequest {
    pub event_id: Uuid,
    pub user_id: UserId,
    pub status: EventStatus,
}

/// Request to review an attended event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReviewRequest {
    pub event_id: Uuid,
    pub user_id: UserId,
    pub rating: i32,
    pub body: Option<String>,
}

/// Driving port for event write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventCommand: Send + Sync {
    /// Create a draft event owned by the caller's organizer profile.
    async fn create_event(&self, request: CreateEventRequest) -> Result<EventPayload, Error>;

    /// Apply a validated status transition.
    async fn transition_status(
        &self,
        request: TransitionEventRequest,
    ) -> Result<EventPayload, Error>;

    /// Record an attendee's review.
    async fn submit_review(&self, request: SubmitReviewRequest) -> Result<EventReview, Error>;
}
