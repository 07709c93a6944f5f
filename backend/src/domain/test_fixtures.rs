//! Shared builders for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::{
    Booking, BookingStatus, Event, EventStatus, EventType, OrganizerProfile, PaymentMethod,
    PaymentStatus, UserContact, UserId,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Fixed "now" used across service tests: 2026-03-01 00:00 UTC.
pub(crate) fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_now(),
    })
}

pub(crate) fn organizer() -> OrganizerProfile {
    OrganizerProfile {
        id: Uuid::new_v4(),
        user_id: UserId::random(),
        org_name: "Tara Trails".to_owned(),
    }
}

/// Published free hike a week after [`fixture_now`].
pub(crate) fn published_event(organizer: &OrganizerProfile) -> Event {
    let starts_at = fixture_now() + chrono::TimeDelta::days(7);
    Event {
        id: Uuid::new_v4(),
        organizer_id: organizer.id,
        title: "Mt. Batulao Day Hike".to_owned(),
        description: None,
        event_type: EventType::Hiking,
        status: EventStatus::Published,
        location: "Nasugbu, Batangas".to_owned(),
        starts_at,
        ends_at: Some(starts_at + chrono::TimeDelta::hours(8)),
        price: 0,
        max_participants: 10,
        created_at: fixture_now(),
    }
}

pub(crate) fn booking_for(event: &Event, user_id: &UserId, status: BookingStatus) -> Booking {
    Booking {
        id: Uuid::new_v4(),
        event_id: event.id,
        user_id: user_id.clone(),
        status,
        payment_status: PaymentStatus::Pending,
        payment_method: Some(PaymentMethod::Gcash),
        companions: Vec::new(),
        booked_at: fixture_now(),
    }
}

pub(crate) fn contact(user_id: &UserId, name: &str) -> UserContact {
    UserContact {
        id: user_id.clone(),
        email: "hiker@example.ph".to_owned(),
        full_name: Some(name.to_owned()),
    }
}
