//! Event catalogue domain service.
//!
//! Implements the event driving ports: listing and reading events, organizer
//! event creation, status transitions and attendee reviews.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{
    CheckinRepository, CreateEventRequest, DEFAULT_EVENT_LIMIT, EventCommand, EventListFilter,
    EventPayload, EventQuery, EventRepository, EventRepositoryError, GetEventRequest,
    ListEventsRequest, MAX_EVENT_LIMIT, SubmitReviewRequest, TransitionEventRequest,
};
use crate::domain::repository_errors::{map_checkin_error, map_event_error};
use crate::domain::{Error, Event, EventReview, EventStatus, OrganizerProfile, UserId};

/// Load an event or fail with `not_found`.
pub(crate) async fn load_event<E>(events: &E, event_id: &Uuid) -> Result<Event, Error>
where
    E: EventRepository + ?Sized,
{
    events
        .find_by_id(event_id)
        .await
        .map_err(map_event_error)?
        .ok_or_else(|| Error::not_found("Event not found."))
}

/// Whether `user_id` owns the organizer profile behind `event`.
pub(crate) async fn is_event_owner<E>(
    events: &E,
    event: &Event,
    user_id: &UserId,
) -> Result<bool, Error>
where
    E: EventRepository + ?Sized,
{
    let organizer = events
        .find_organizer(&event.organizer_id)
        .await
        .map_err(map_event_error)?;
    Ok(organizer.is_some_and(|profile| &profile.user_id == user_id))
}

/// Fail with `forbidden` unless `user_id` organises `event`.
pub(crate) async fn ensure_event_owner<E>(
    events: &E,
    event: &Event,
    user_id: &UserId,
    message: &str,
) -> Result<(), Error>
where
    E: EventRepository + ?Sized,
{
    if is_event_owner(events, event, user_id).await? {
        Ok(())
    } else {
        Err(Error::forbidden(message))
    }
}

/// Event service implementing the event command and query ports.
#[derive(Clone)]
pub struct EventService<E, C> {
    events: Arc<E>,
    checkins: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<E, C> EventService<E, C> {
    /// Create a new service over the event and check-in repositories.
    pub fn new(events: Arc<E>, checkins: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            events,
            checkins,
            clock,
        }
    }
}

impl<E, C> EventService<E, C>
where
    E: EventRepository,
{
    async fn require_organizer(&self, user_id: &UserId) -> Result<OrganizerProfile, Error> {
        self.events
            .find_organizer_by_user(user_id)
            .await
            .map_err(map_event_error)?
            .ok_or_else(|| Error::forbidden("Only organizers can create events."))
    }
}

#[async_trait]
impl<E, C> EventCommand for EventService<E, C>
where
    E: EventRepository,
    C: CheckinRepository,
{
    async fn create_event(&self, request: CreateEventRequest) -> Result<EventPayload, Error> {
        let organizer = self.require_organizer(&request.user_id).await?;
        let mountain_ids = request.event.mountain_ids.clone();
        let event = request
            .event
            .into_event(Uuid::new_v4(), organizer.id, self.clock.utc())
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.events
            .insert(&event, &mountain_ids)
            .await
            .map_err(map_event_error)?;

        Ok(EventPayload::from(event))
    }

    async fn transition_status(
        &self,
        request: TransitionEventRequest,
    ) -> Result<EventPayload, Error> {
        let mut event = load_event(self.events.as_ref(), &request.event_id).await?;
        ensure_event_owner(
            self.events.as_ref(),
            &event,
            &request.user_id,
            "Only the event organizer can change its status.",
        )
        .await?;
        let next = event
            .status
            .transition_to(request.status)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.events
            .update_status(&event.id, next)
            .await
            .map_err(map_event_error)?;

        event.status = next;
        Ok(EventPayload::from(event))
    }

    async fn submit_review(&self, request: SubmitReviewRequest) -> Result<EventReview, Error> {
        let event = load_event(self.events.as_ref(), &request.event_id).await?;
        let attended = self
            .checkins
            .find(&event.id, &request.user_id)
            .await
            .map_err(map_checkin_error)?
            .is_some();
        if !attended {
            return Err(Error::forbidden("Only attendees can review this event."));
        }

        let review = EventReview::new(
            event.id,
            request.user_id,
            request.rating,
            request.body,
            self.clock.utc(),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.events
            .insert_review(&review)
            .await
            .map_err(|err| match err {
                EventRepositoryError::Conflict { .. } => {
                    Error::conflict("You have already reviewed this event.")
                }
                other => map_event_error(other),
            })?;

        Ok(review)
    }
}

#[async_trait]
impl<E, C> EventQuery for EventService<E, C>
where
    E: EventRepository,
    C: CheckinRepository,
{
    async fn list_events(&self, request: ListEventsRequest) -> Result<Vec<EventPayload>, Error> {
        let limit = request.limit.unwrap_or(DEFAULT_EVENT_LIMIT);
        if !(1..=MAX_EVENT_LIMIT).contains(&limit) {
            return Err(Error::invalid_request(format!(
                "limit must be between 1 and {MAX_EVENT_LIMIT}"
            )));
        }
        let filter = EventListFilter {
            event_type: request.event_type,
            limit,
        };

        let events = self
            .events
            .list_published(&filter)
            .await
            .map_err(map_event_error)?;

        Ok(events.into_iter().map(EventPayload::from).collect())
    }

    async fn get_event(&self, request: GetEventRequest) -> Result<EventPayload, Error> {
        let event = load_event(self.events.as_ref(), &request.event_id).await?;
        if event.status == EventStatus::Draft {
            let visible = match request.viewer.as_ref() {
                Some(viewer) => is_event_owner(self.events.as_ref(), &event, viewer).await?,
                None => false,
            };
            if !visible {
                return Err(Error::not_found("Event not found."));
            }
        }
        Ok(EventPayload::from(event))
    }
}

#[cfg(test)]
#[path = "event_service_tests.rs"]
mod tests;
