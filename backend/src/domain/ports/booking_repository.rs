//! Port for booking and companion persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Booking, BookingStatus, Companion, Event, PaymentStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "booking repository query failed: {message}",
    }
}

/// Port for reading and writing bookings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Seats held by pending and confirmed bookings, companions included.
    async fn count_taken_seats(&self, event_id: &Uuid) -> Result<u32, BookingRepositoryError>;

    /// The user's pending or confirmed booking for an event.
    async fn find_active_for_user(
        &self,
        event_id: &Uuid,
        user_id: &UserId,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Find a booking with its companions.
    async fn find_by_id(&self, booking_id: &Uuid)
    -> Result<Option<Booking>, BookingRepositoryError>;

    /// Insert a booking together with its companions.
    async fn insert(&self, booking: &Booking) -> Result<(), BookingRepositoryError>;

    /// Overwrite booking and payment status.
    async fn update_status(
        &self,
        booking_id: &Uuid,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> Result<(), BookingRepositoryError>;

    /// All of a user's bookings, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// Events the user holds a pending or confirmed booking for.
    async fn list_active_events_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Event>, BookingRepositoryError>;

    /// A companion whose parent booking for the event is pending or confirmed.
    async fn find_active_companion(
        &self,
        event_id: &Uuid,
        companion_id: &Uuid,
    ) -> Result<Option<Companion>, BookingRepositoryError>;
}

/// Fixture implementation for running without a database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookingRepository;

#[async_trait]
impl BookingRepository for FixtureBookingRepository {
    async fn count_taken_seats(&self, _event_id: &Uuid) -> Result<u32, BookingRepositoryError> {
        Ok(0)
    }

    async fn find_active_for_user(
        &self,
        _event_id: &Uuid,
        _user_id: &UserId,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(
        &self,
        _booking_id: &Uuid,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _booking: &Booking) -> Result<(), BookingRepositoryError> {
        Ok(())
    }

    async fn update_status(
        &self,
        _booking_id: &Uuid,
        _status: BookingStatus,
        _payment_status: PaymentStatus,
    ) -> Result<(), BookingRepositoryError> {
        Ok(())
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_active_events_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<Event>, BookingRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_active_companion(
        &self,
        _event_id: &Uuid,
        _companion_id: &Uuid,
    ) -> Result<Option<Companion>, BookingRepositoryError> {
        Ok(None)
    }
}
