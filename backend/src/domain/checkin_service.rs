//! QR check-in domain service.
//!
//! Validates a scanned code against the organizer's scan session, resolves
//! the attendee's active booking and records attendance once. Participant
//! check-ins then run the achievement evaluator inline; evaluator failures
//! never fail the scan.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::event_service::{ensure_event_owner, load_event};
use crate::domain::ports::{
    AchievementEvaluator, AttendeeKind, BookingRepository, CheckinCommand, CheckinRepository,
    CheckinRepositoryError, CheckinRequest, CheckinResponse, EventRepository, UserDirectory,
};
use crate::domain::repository_errors::{map_booking_error, map_checkin_error};
use crate::domain::{
    Badge, Checkin, CheckinCode, CheckinMethod, Error, FALLBACK_DISPLAY_NAME, UserId,
};

/// Outcome of recording one attendee.
struct Recorded {
    name: String,
    already_checked_in: bool,
}

fn response(
    kind: AttendeeKind,
    attendee_id: Uuid,
    recorded: Recorded,
    awarded_badges: Vec<Badge>,
) -> CheckinResponse {
    let message = if recorded.already_checked_in {
        format!("{} is already checked in.", recorded.name)
    } else {
        format!("{} checked in!", recorded.name)
    };
    CheckinResponse {
        attendee_kind: kind,
        attendee_id,
        name: recorded.name,
        message,
        already_checked_in: recorded.already_checked_in,
        awarded_badges,
    }
}

/// Check-in service implementing [`CheckinCommand`].
#[derive(Clone)]
pub struct CheckinService<E, B, C, U> {
    events: Arc<E>,
    bookings: Arc<B>,
    checkins: Arc<C>,
    users: Arc<U>,
    evaluator: Arc<dyn AchievementEvaluator>,
    clock: Arc<dyn Clock>,
}

impl<E, B, C, U> CheckinService<E, B, C, U> {
    /// Create a new check-in service.
    pub fn new(
        events: Arc<E>,
        bookings: Arc<B>,
        checkins: Arc<C>,
        users: Arc<U>,
        evaluator: Arc<dyn AchievementEvaluator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            events,
            bookings,
            checkins,
            users,
            evaluator,
            clock,
        }
    }
}

impl<E, B, C, U> CheckinService<E, B, C, U>
where
    E: EventRepository,
    B: BookingRepository,
    C: CheckinRepository,
    U: UserDirectory,
{
    async fn participant_name(&self, user_id: &UserId) -> String {
        match self.users.find_contact(user_id).await {
            Ok(Some(contact)) => contact.display_name().to_owned(),
            Ok(None) => FALLBACK_DISPLAY_NAME.to_owned(),
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "could not resolve participant name");
                FALLBACK_DISPLAY_NAME.to_owned()
            }
        }
    }

    async fn record_participant(
        &self,
        event_id: Uuid,
        user_id: &UserId,
    ) -> Result<Recorded, Error> {
        self.bookings
            .find_active_for_user(&event_id, user_id)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::not_found("No booking found for this participant."))?;
        let name = self.participant_name(user_id).await;

        let existing = self
            .checkins
            .find(&event_id, user_id)
            .await
            .map_err(map_checkin_error)?;
        if existing.is_some() {
            return Ok(Recorded {
                name,
                already_checked_in: true,
            });
        }

        let checkin = Checkin {
            event_id,
            user_id: user_id.clone(),
            method: CheckinMethod::Qr,
            checked_in_at: self.clock.utc(),
        };
        let already_checked_in = match self.checkins.insert(&checkin).await {
            Ok(()) => false,
            Err(CheckinRepositoryError::Duplicate) => true,
            Err(err) => return Err(map_checkin_error(err)),
        };
        Ok(Recorded {
            name,
            already_checked_in,
        })
    }

    async fn record_companion(&self, event_id: Uuid, companion_id: Uuid) -> Result<Recorded, Error> {
        let companion = self
            .bookings
            .find_active_companion(&event_id, &companion_id)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::not_found("No booking found for this participant."))?;
        if companion.checked_in_at.is_some() {
            return Ok(Recorded {
                name: companion.full_name,
                already_checked_in: true,
            });
        }

        let marked = self
            .checkins
            .mark_companion_checked_in(&companion.id, self.clock.utc())
            .await
            .map_err(map_checkin_error)?;
        Ok(Recorded {
            name: companion.full_name,
            already_checked_in: !marked,
        })
    }
}

#[async_trait]
impl<E, B, C, U> CheckinCommand for CheckinService<E, B, C, U>
where
    E: EventRepository,
    B: BookingRepository,
    C: CheckinRepository,
    U: UserDirectory,
{
    async fn check_in(&self, request: CheckinRequest) -> Result<CheckinResponse, Error> {
        let code = request
            .code
            .parse::<CheckinCode>()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        if code.event_id() != request.event_id {
            return Err(Error::invalid_request(
                "This QR code is for a different event.",
            ));
        }
        let event = load_event(self.events.as_ref(), &request.event_id).await?;
        ensure_event_owner(
            self.events.as_ref(),
            &event,
            &request.scanner_id,
            "Only the event organizer can check in participants.",
        )
        .await?;

        match code {
            CheckinCode::Participant { user_id, .. } => {
                let recorded = self.record_participant(event.id, &user_id).await?;
                let awarded_badges = if recorded.already_checked_in {
                    Vec::new()
                } else {
                    info!(event_id = %event.id, user_id = %user_id, "participant checked in");
                    self.evaluator.evaluate(&user_id).await.badges
                };
                Ok(response(
                    AttendeeKind::Participant,
                    *user_id.as_uuid(),
                    recorded,
                    awarded_badges,
                ))
            }
            CheckinCode::Companion { companion_id, .. } => {
                let recorded = self.record_companion(event.id, companion_id).await?;
                if !recorded.already_checked_in {
                    info!(event_id = %event.id, companion_id = %companion_id, "companion checked in");
                }
                Ok(response(
                    AttendeeKind::Companion,
                    companion_id,
                    recorded,
                    Vec::new(),
                ))
            }
        }
    }
}

#[cfg(test)]
#[path = "checkin_service_tests.rs"]
mod tests;
