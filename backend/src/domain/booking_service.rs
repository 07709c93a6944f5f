//! Booking domain service.
//!
//! Enforces the booking rules in order: the event must exist, be published
//! and not yet started; the user must not already hold a seat; and the party
//! must fit into the remaining capacity. Free events confirm immediately.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::warn;
use uuid::Uuid;

use crate::domain::event_service::{ensure_event_owner, load_event};
use crate::domain::ports::{
    BookingCommand, BookingPayload, BookingQuery, BookingRepository, CancelBookingRequest,
    CreateBookingRequest, CreateBookingResponse, EventRepository, PaymentDecision,
    ReviewPaymentRequest, UserDirectory,
};
use crate::domain::repository_errors::{map_booking_error, map_directory_error};
use crate::domain::{
    Booking, BookingStatus, Companion, Error, Event, EventStatus, Notifier, PaymentStatus,
    UserContact, UserId, check_capacity, find_overlapping_event, normalise_companion_names,
    seats_for,
};

/// Booking service implementing the booking command and query ports.
#[derive(Clone)]
pub struct BookingService<E, B, U> {
    events: Arc<E>,
    bookings: Arc<B>,
    users: Arc<U>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

impl<E, B, U> BookingService<E, B, U> {
    /// Create a new booking service.
    pub fn new(
        events: Arc<E>,
        bookings: Arc<B>,
        users: Arc<U>,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            events,
            bookings,
            users,
            notifier,
            clock,
        }
    }
}

impl<E, B, U> BookingService<E, B, U>
where
    E: EventRepository,
    B: BookingRepository,
    U: UserDirectory,
{
    async fn load_booking(&self, booking_id: &Uuid) -> Result<Booking, Error> {
        self.bookings
            .find_by_id(booking_id)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::not_found("Booking not found."))
    }

    async fn contact_for(&self, user_id: &UserId) -> Option<UserContact> {
        match self.users.find_contact(user_id).await {
            Ok(contact) => contact,
            Err(err) => {
                let error = map_directory_error(err);
                warn!(user_id = %user_id, error = %error, "could not resolve email recipient");
                None
            }
        }
    }

    async fn notify_confirmed(&self, user_id: &UserId, event: &Event) {
        if let Some(recipient) = self.contact_for(user_id).await {
            let message = self.notifier.booking_confirmation(&recipient, event);
            self.notifier.send_best_effort(&message).await;
        }
    }

    async fn notify_rejected(&self, user_id: &UserId, event: &Event, reason: Option<&str>) {
        if let Some(recipient) = self.contact_for(user_id).await {
            let message = self.notifier.payment_rejected(&recipient, event, reason);
            self.notifier.send_best_effort(&message).await;
        }
    }
}

#[async_trait]
impl<E, B, U> BookingCommand for BookingService<E, B, U>
where
    E: EventRepository,
    B: BookingRepository,
    U: UserDirectory,
{
    async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<CreateBookingResponse, Error> {
        let event = load_event(self.events.as_ref(), &request.event_id).await?;
        if event.status != EventStatus::Published {
            return Err(Error::invalid_request("Event is not open for booking."));
        }
        let now = self.clock.utc();
        if event.has_started(now) {
            return Err(Error::invalid_request("Event has already started."));
        }

        let existing = self
            .bookings
            .find_active_for_user(&event.id, &request.user_id)
            .await
            .map_err(map_booking_error)?;
        if existing.is_some() {
            return Err(Error::conflict("You have already booked this event."));
        }

        let companion_names = normalise_companion_names(request.companion_names)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let taken = self
            .bookings
            .count_taken_seats(&event.id)
            .await
            .map_err(map_booking_error)?;
        check_capacity(
            event.max_participants,
            taken,
            seats_for(companion_names.len()),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        let (status, payment_status, payment_method) = if event.is_free() {
            (BookingStatus::Confirmed, PaymentStatus::Paid, None)
        } else {
            let method = request.payment_method.ok_or_else(|| {
                Error::invalid_request("Payment method is required for paid events.")
            })?;
            (BookingStatus::Pending, PaymentStatus::Pending, Some(method))
        };

        let other_events = self
            .bookings
            .list_active_events_for_user(&request.user_id)
            .await
            .map_err(map_booking_error)?;
        let overlapping_event_id =
            find_overlapping_event(&event, &other_events).map(|other| other.id);

        let booking_id = Uuid::new_v4();
        let booking = Booking {
            id: booking_id,
            event_id: event.id,
            user_id: request.user_id,
            status,
            payment_status,
            payment_method,
            companions: companion_names
                .into_iter()
                .map(|full_name| Companion {
                    id: Uuid::new_v4(),
                    booking_id,
                    full_name,
                    checked_in_at: None,
                })
                .collect(),
            booked_at: now,
        };
        self.bookings
            .insert(&booking)
            .await
            .map_err(map_booking_error)?;

        if booking.status == BookingStatus::Confirmed {
            self.notify_confirmed(&booking.user_id, &event).await;
        }

        Ok(CreateBookingResponse {
            booking: BookingPayload::from(booking),
            overlapping_event_id,
        })
    }

    async fn cancel_booking(&self, request: CancelBookingRequest) -> Result<BookingPayload, Error> {
        let mut booking = self.load_booking(&request.booking_id).await?;
        if booking.user_id != request.user_id {
            return Err(Error::forbidden("You can only cancel your own bookings."));
        }
        if !booking.status.is_active() {
            return Err(Error::invalid_request(
                "Only pending or confirmed bookings can be cancelled.",
            ));
        }

        self.bookings
            .update_status(&booking.id, BookingStatus::Cancelled, booking.payment_status)
            .await
            .map_err(map_booking_error)?;

        booking.status = BookingStatus::Cancelled;
        Ok(BookingPayload::from(booking))
    }

    async fn review_payment(&self, request: ReviewPaymentRequest) -> Result<BookingPayload, Error> {
        let mut booking = self.load_booking(&request.booking_id).await?;
        let event = load_event(self.events.as_ref(), &booking.event_id).await?;
        ensure_event_owner(
            self.events.as_ref(),
            &event,
            &request.reviewer_id,
            "Only the event organizer can review payments.",
        )
        .await?;
        if booking.payment_status != PaymentStatus::Pending {
            return Err(Error::invalid_request("Payment has already been reviewed."));
        }
        if !booking.status.is_active() {
            return Err(Error::invalid_request("Booking is no longer active."));
        }

        let (status, payment_status) = match request.decision {
            PaymentDecision::Approve => (BookingStatus::Confirmed, PaymentStatus::Paid),
            PaymentDecision::Reject => (BookingStatus::Rejected, PaymentStatus::Rejected),
        };
        self.bookings
            .update_status(&booking.id, status, payment_status)
            .await
            .map_err(map_booking_error)?;
        booking.status = status;
        booking.payment_status = payment_status;

        match request.decision {
            PaymentDecision::Approve => self.notify_confirmed(&booking.user_id, &event).await,
            PaymentDecision::Reject => {
                self.notify_rejected(&booking.user_id, &event, request.reason.as_deref())
                    .await;
            }
        }

        Ok(BookingPayload::from(booking))
    }
}

#[async_trait]
impl<E, B, U> BookingQuery for BookingService<E, B, U>
where
    E: EventRepository,
    B: BookingRepository,
    U: UserDirectory,
{
    async fn list_bookings(&self, user_id: &UserId) -> Result<Vec<BookingPayload>, Error> {
        let bookings = self
            .bookings
            .list_for_user(user_id)
            .await
            .map_err(map_booking_error)?;
        Ok(bookings.into_iter().map(BookingPayload::from).collect())
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
