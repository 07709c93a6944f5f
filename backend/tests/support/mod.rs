//! In-memory port doubles shared by behaviour tests.
//!
//! Each double keeps its rows behind a `Mutex` so a scenario world can seed
//! data, drive a domain service, and then inspect what was written.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use eventtara::domain::ports::{
    BookingRepository, BookingRepositoryError, CheckinRepository, CheckinRepositoryError,
    EventListFilter, EventRepository, EventRepositoryError, Mailer, MailerError, UserDirectory,
    UserDirectoryError,
};
use eventtara::domain::{
    Booking, BookingStatus, Checkin, Companion, EmailMessage, Event, EventReview, EventStatus,
    OrganizerProfile, PaymentStatus, UserContact, UserId,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Clock pinned to a single instant.
pub struct FrozenClock(pub DateTime<Utc>);

impl Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 2026-03-01 00:00 UTC.
pub fn scenario_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0)
        .single()
        .expect("valid scenario timestamp")
}

pub fn frozen_clock() -> Arc<dyn Clock> {
    Arc::new(FrozenClock(scenario_now()))
}

#[derive(Default)]
pub struct InMemoryEvents {
    events: Mutex<HashMap<Uuid, Event>>,
    organizers: Mutex<Vec<OrganizerProfile>>,
    reviews: Mutex<Vec<EventReview>>,
}

impl InMemoryEvents {
    pub fn seed_organizer(&self, organizer: OrganizerProfile) {
        lock(&self.organizers).push(organizer);
    }

    pub fn seed_event(&self, event: Event) {
        lock(&self.events).insert(event.id, event);
    }
}

#[async_trait]
impl EventRepository for InMemoryEvents {
    async fn find_by_id(&self, event_id: &Uuid) -> Result<Option<Event>, EventRepositoryError> {
        Ok(lock(&self.events).get(event_id).cloned())
    }

    async fn list_published(
        &self,
        filter: &EventListFilter,
    ) -> Result<Vec<Event>, EventRepositoryError> {
        let mut events: Vec<Event> = lock(&self.events)
            .values()
            .filter(|event| event.status == EventStatus::Published)
            .filter(|event| filter.event_type.is_none_or(|kind| event.event_type == kind))
            .cloned()
            .collect();
        events.sort_by_key(|event| (event.starts_at, event.id));
        events.truncate(filter.limit as usize);
        Ok(events)
    }

    async fn find_organizer_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<OrganizerProfile>, EventRepositoryError> {
        Ok(lock(&self.organizers)
            .iter()
            .find(|organizer| organizer.user_id == *user_id)
            .cloned())
    }

    async fn find_organizer(
        &self,
        organizer_id: &Uuid,
    ) -> Result<Option<OrganizerProfile>, EventRepositoryError> {
        Ok(lock(&self.organizers)
            .iter()
            .find(|organizer| organizer.id == *organizer_id)
            .cloned())
    }

    async fn insert(
        &self,
        event: &Event,
        _mountain_ids: &[Uuid],
    ) -> Result<(), EventRepositoryError> {
        lock(&self.events).insert(event.id, event.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        event_id: &Uuid,
        status: EventStatus,
    ) -> Result<(), EventRepositoryError> {
        if let Some(event) = lock(&self.events).get_mut(event_id) {
            event.status = status;
        }
        Ok(())
    }

    async fn insert_review(&self, review: &EventReview) -> Result<(), EventRepositoryError> {
        let mut reviews = lock(&self.reviews);
        if reviews
            .iter()
            .any(|r| r.event_id == review.event_id && r.user_id == review.user_id)
        {
            return Err(EventRepositoryError::conflict("event_reviews_event_id_user_id_key"));
        }
        reviews.push(review.clone());
        Ok(())
    }
}

/// Bookings store; reads the event table it shares with [`InMemoryEvents`].
pub struct InMemoryBookings {
    events: Arc<InMemoryEvents>,
    bookings: Mutex<Vec<Booking>>,
}

impl InMemoryBookings {
    pub fn new(events: Arc<InMemoryEvents>) -> Self {
        Self {
            events,
            bookings: Mutex::new(Vec::new()),
        }
    }

    pub fn all(&self) -> Vec<Booking> {
        lock(&self.bookings).clone()
    }

    fn mark_companion(&self, companion_id: &Uuid, at: DateTime<Utc>) -> bool {
        let mut bookings = lock(&self.bookings);
        let companion = bookings
            .iter_mut()
            .flat_map(|booking| booking.companions.iter_mut())
            .find(|companion| companion.id == *companion_id);
        match companion {
            Some(companion) if companion.checked_in_at.is_none() => {
                companion.checked_in_at = Some(at);
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookings {
    async fn count_taken_seats(&self, event_id: &Uuid) -> Result<u32, BookingRepositoryError> {
        Ok(lock(&self.bookings)
            .iter()
            .filter(|booking| booking.event_id == *event_id && booking.status.is_active())
            .map(Booking::seats)
            .sum())
    }

    async fn find_active_for_user(
        &self,
        event_id: &Uuid,
        user_id: &UserId,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(lock(&self.bookings)
            .iter()
            .find(|booking| {
                booking.event_id == *event_id
                    && booking.user_id == *user_id
                    && booking.status.is_active()
            })
            .cloned())
    }

    async fn find_by_id(
        &self,
        booking_id: &Uuid,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(lock(&self.bookings)
            .iter()
            .find(|booking| booking.id == *booking_id)
            .cloned())
    }

    async fn insert(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        lock(&self.bookings).push(booking.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        booking_id: &Uuid,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> Result<(), BookingRepositoryError> {
        if let Some(booking) = lock(&self.bookings)
            .iter_mut()
            .find(|booking| booking.id == *booking_id)
        {
            booking.status = status;
            booking.payment_status = payment_status;
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut bookings: Vec<Booking> = lock(&self.bookings)
            .iter()
            .filter(|booking| booking.user_id == *user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
        Ok(bookings)
    }

    async fn list_active_events_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Event>, BookingRepositoryError> {
        let event_ids: Vec<Uuid> = lock(&self.bookings)
            .iter()
            .filter(|booking| booking.user_id == *user_id && booking.status.is_active())
            .map(|booking| booking.event_id)
            .collect();
        let events = lock(&self.events.events);
        Ok(event_ids
            .iter()
            .filter_map(|id| events.get(id).cloned())
            .collect())
    }

    async fn find_active_companion(
        &self,
        event_id: &Uuid,
        companion_id: &Uuid,
    ) -> Result<Option<Companion>, BookingRepositoryError> {
        Ok(lock(&self.bookings)
            .iter()
            .filter(|booking| booking.event_id == *event_id && booking.status.is_active())
            .flat_map(|booking| booking.companions.iter())
            .find(|companion| companion.id == *companion_id)
            .cloned())
    }
}

/// Check-in store; companion stamps land on the shared booking rows.
pub struct InMemoryCheckins {
    bookings: Arc<InMemoryBookings>,
    checkins: Mutex<Vec<Checkin>>,
}

impl InMemoryCheckins {
    pub fn new(bookings: Arc<InMemoryBookings>) -> Self {
        Self {
            bookings,
            checkins: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        lock(&self.checkins).len()
    }
}

#[async_trait]
impl CheckinRepository for InMemoryCheckins {
    async fn find(
        &self,
        event_id: &Uuid,
        user_id: &UserId,
    ) -> Result<Option<Checkin>, CheckinRepositoryError> {
        Ok(lock(&self.checkins)
            .iter()
            .find(|c| c.event_id == *event_id && c.user_id == *user_id)
            .cloned())
    }

    async fn insert(&self, checkin: &Checkin) -> Result<(), CheckinRepositoryError> {
        let mut checkins = lock(&self.checkins);
        if checkins
            .iter()
            .any(|c| c.event_id == checkin.event_id && c.user_id == checkin.user_id)
        {
            return Err(CheckinRepositoryError::duplicate());
        }
        checkins.push(checkin.clone());
        Ok(())
    }

    async fn mark_companion_checked_in(
        &self,
        companion_id: &Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, CheckinRepositoryError> {
        Ok(self.bookings.mark_companion(companion_id, at))
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    contacts: Mutex<HashMap<UserId, UserContact>>,
}

impl InMemoryUsers {
    pub fn seed(&self, contact: UserContact) {
        lock(&self.contacts).insert(contact.id.clone(), contact);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUsers {
    async fn find_contact(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserContact>, UserDirectoryError> {
        Ok(lock(&self.contacts).get(user_id).cloned())
    }

    async fn ensure_profile(
        &self,
        contact: &UserContact,
        _signed_up_at: DateTime<Utc>,
    ) -> Result<(), UserDirectoryError> {
        lock(&self.contacts)
            .entry(contact.id.clone())
            .or_insert_with(|| contact.clone());
        Ok(())
    }
}

/// Mailer that keeps every message it was asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<EmailMessage> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        lock(&self.sent).push(message.clone());
        Ok(())
    }
}
