//! Behaviour tests for the booking and QR check-in flow.
//!
//! Scenarios drive the real domain services over in-memory repositories so
//! seat accounting, notifications and duplicate-scan handling are exercised
//! end to end without a database.

mod support;

use std::cell::RefCell;
use std::sync::Arc;

use chrono::TimeDelta;
use eventtara::domain::ports::{
    BookingCommand, BookingPayload, BookingRepository, CheckinCommand, CheckinRequest,
    CheckinResponse, CreateBookingRequest, FixtureAchievementEvaluator,
};
use eventtara::domain::{
    Booking, BookingService, BookingStatus, CheckinCode, CheckinService, Companion, Error, Event,
    EventStatus, EventType, Notifier, OrganizerProfile, PaymentStatus, UserContact, UserId,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;
use tokio::runtime::Runtime;
use uuid::Uuid;

use support::{
    InMemoryBookings, InMemoryCheckins, InMemoryEvents, InMemoryUsers, RecordingMailer,
    frozen_clock, scenario_now,
};

type Bookings = BookingService<InMemoryEvents, InMemoryBookings, InMemoryUsers>;
type Checkins = CheckinService<InMemoryEvents, InMemoryBookings, InMemoryCheckins, InMemoryUsers>;

struct FlowWorld {
    runtime: Runtime,
    events: Arc<InMemoryEvents>,
    bookings: Arc<InMemoryBookings>,
    checkins: Arc<InMemoryCheckins>,
    users: Arc<InMemoryUsers>,
    mailer: Arc<RecordingMailer>,
    organizer: OrganizerProfile,
    participant: UserContact,
    event_id: RefCell<Option<Uuid>>,
    companion_id: RefCell<Option<Uuid>>,
    booking: RefCell<Option<Result<BookingPayload, Error>>>,
    scan: RefCell<Option<Result<CheckinResponse, Error>>>,
}

impl FlowWorld {
    fn new() -> Self {
        let events = Arc::new(InMemoryEvents::default());
        let bookings = Arc::new(InMemoryBookings::new(Arc::clone(&events)));
        let checkins = Arc::new(InMemoryCheckins::new(Arc::clone(&bookings)));
        let users = Arc::new(InMemoryUsers::default());
        let organizer = OrganizerProfile {
            id: Uuid::new_v4(),
            user_id: UserId::random(),
            org_name: "Tara Trails".to_owned(),
        };
        events.seed_organizer(organizer.clone());
        let participant = UserContact {
            id: UserId::random(),
            email: "juan@example.ph".to_owned(),
            full_name: Some("Juan".to_owned()),
        };
        users.seed(participant.clone());
        Self {
            runtime: Runtime::new().expect("tokio runtime"),
            events,
            bookings,
            checkins,
            users,
            mailer: Arc::new(RecordingMailer::default()),
            organizer,
            participant,
            event_id: RefCell::new(None),
            companion_id: RefCell::new(None),
            booking: RefCell::new(None),
            scan: RefCell::new(None),
        }
    }

    fn booking_service(&self) -> Bookings {
        BookingService::new(
            Arc::clone(&self.events),
            Arc::clone(&self.bookings),
            Arc::clone(&self.users),
            Notifier::new(self.mailer.clone(), "https://eventtara.example"),
            frozen_clock(),
        )
    }

    fn checkin_service(&self) -> Checkins {
        CheckinService::new(
            Arc::clone(&self.events),
            Arc::clone(&self.bookings),
            Arc::clone(&self.checkins),
            Arc::clone(&self.users),
            Arc::new(FixtureAchievementEvaluator),
            frozen_clock(),
        )
    }

    fn event_id(&self) -> Uuid {
        self.event_id.borrow().expect("event seeded")
    }

    fn seed_booking(&self, user_id: UserId, companions: &[&str]) {
        let booking_id = Uuid::new_v4();
        let booking = Booking {
            id: booking_id,
            event_id: self.event_id(),
            user_id,
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            payment_method: None,
            companions: companions
                .iter()
                .map(|name| Companion {
                    id: Uuid::new_v4(),
                    booking_id,
                    full_name: (*name).to_owned(),
                    checked_in_at: None,
                })
                .collect(),
            booked_at: scenario_now(),
        };
        if let Some(companion) = booking.companions.first() {
            *self.companion_id.borrow_mut() = Some(companion.id);
        }
        self.runtime
            .block_on(self.bookings.insert(&booking))
            .expect("seed booking");
    }

    fn scan_code(&self, scanner_id: UserId, code: CheckinCode) {
        let service = self.checkin_service();
        let result = self.runtime.block_on(service.check_in(CheckinRequest {
            event_id: self.event_id(),
            scanner_id,
            code: code.to_string(),
        }));
        *self.scan.borrow_mut() = Some(result);
    }

    fn participant_code(&self) -> CheckinCode {
        CheckinCode::Participant {
            event_id: self.event_id(),
            user_id: self.participant.id.clone(),
        }
    }

    fn scan_response(&self) -> CheckinResponse {
        self.scan
            .borrow()
            .clone()
            .expect("scan attempted")
            .expect("scan should succeed")
    }
}

fn assert_code(error: &Error, expected: &str) {
    assert_eq!(
        serde_json::to_value(error.code()).expect("serialise error code"),
        json!(expected),
        "unexpected error: {error:?}"
    );
}

#[fixture]
fn world() -> FlowWorld {
    FlowWorld::new()
}

#[given("a published free event with {seats} seats")]
fn a_published_free_event(world: &FlowWorld, seats: u32) {
    let event = Event {
        id: Uuid::new_v4(),
        organizer_id: world.organizer.id,
        title: "Mt. Batulao Day Hike".to_owned(),
        description: None,
        event_type: EventType::Hiking,
        status: EventStatus::Published,
        location: "Nasugbu, Batangas".to_owned(),
        starts_at: scenario_now() + TimeDelta::days(7),
        ends_at: None,
        price: 0,
        max_participants: seats,
        created_at: scenario_now(),
    };
    *world.event_id.borrow_mut() = Some(event.id);
    world.events.seed_event(event);
}

#[given("another participant already holds a seat")]
fn another_participant_holds_a_seat(world: &FlowWorld) {
    world.seed_booking(UserId::random(), &[]);
}

#[given("the participant holds a confirmed booking")]
fn the_participant_holds_a_booking(world: &FlowWorld) {
    world.seed_booking(world.participant.id.clone(), &[]);
}

#[given("the participant holds a confirmed booking with companion \"{name}\"")]
fn the_participant_holds_a_booking_with_companion(world: &FlowWorld, name: String) {
    world.seed_booking(world.participant.id.clone(), &[name.as_str()]);
}

#[when("the participant books with {count} companion")]
fn the_participant_books(world: &FlowWorld, count: usize) {
    let service = world.booking_service();
    let companion_names = (1..=count).map(|n| format!("Companion {n}")).collect();
    let result = world
        .runtime
        .block_on(service.create_booking(CreateBookingRequest {
            event_id: world.event_id(),
            user_id: world.participant.id.clone(),
            companion_names,
            payment_method: None,
        }))
        .map(|response| response.booking);
    *world.booking.borrow_mut() = Some(result);
}

#[when("the organizer scans the participant's code")]
fn the_organizer_scans_the_participant(world: &FlowWorld) {
    world.scan_code(world.organizer.user_id.clone(), world.participant_code());
}

#[when("the organizer scans the companion's code")]
fn the_organizer_scans_the_companion(world: &FlowWorld) {
    let companion_id = world.companion_id.borrow().expect("companion seeded");
    let code = CheckinCode::Companion {
        event_id: world.event_id(),
        companion_id,
    };
    world.scan_code(world.organizer.user_id.clone(), code);
}

#[when("a stranger scans the participant's code")]
fn a_stranger_scans(world: &FlowWorld) {
    world.scan_code(UserId::random(), world.participant_code());
}

#[then("the booking is confirmed")]
fn the_booking_is_confirmed(world: &FlowWorld) {
    let booking = world.booking.borrow();
    let booking = booking
        .as_ref()
        .expect("booking attempted")
        .as_ref()
        .expect("booking should succeed");
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.payment_status, PaymentStatus::Paid);
}

#[then("{seats} seats are taken")]
fn seats_are_taken(world: &FlowWorld, seats: u32) {
    let taken = world
        .runtime
        .block_on(world.bookings.count_taken_seats(&world.event_id()))
        .expect("count seats");
    assert_eq!(taken, seats);
}

#[then("a confirmation email is sent to the participant")]
fn a_confirmation_email_is_sent(world: &FlowWorld) {
    let sent = world.mailer.sent();
    assert_eq!(sent.len(), 1, "expected exactly one email");
    assert_eq!(sent.first().map(|m| m.to.as_str()), Some("juan@example.ph"));
}

#[then("the booking fails with code {code}")]
fn the_booking_fails(world: &FlowWorld, code: String) {
    let booking = world.booking.borrow();
    let error = booking
        .as_ref()
        .expect("booking attempted")
        .as_ref()
        .expect_err("booking should fail");
    assert_code(error, &code);
    assert_eq!(world.bookings.all().len(), 1, "no new booking stored");
}

#[then("the scanner reports the participant as already checked in")]
fn already_checked_in(world: &FlowWorld) {
    let response = world.scan_response();
    assert!(response.already_checked_in);
    assert_eq!(response.message, "Juan is already checked in.");
    assert!(response.awarded_badges.is_empty());
}

#[then("{count} check-in is recorded")]
fn checkins_recorded(world: &FlowWorld, count: usize) {
    assert_eq!(world.checkins.count(), count);
}

#[then("the scanner greets \"{message}\"")]
fn the_scanner_greets(world: &FlowWorld, message: String) {
    let response = world.scan_response();
    assert!(!response.already_checked_in);
    assert_eq!(response.message, message);
}

#[then("the scan fails with code {code}")]
fn the_scan_fails(world: &FlowWorld, code: String) {
    let scan = world.scan.borrow();
    let error = scan
        .as_ref()
        .expect("scan attempted")
        .as_ref()
        .expect_err("scan should fail");
    assert_code(error, &code);
    assert_eq!(world.checkins.count(), 0);
}

#[scenario(path = "tests/features/booking_checkin.feature")]
fn booking_checkin_scenarios(world: FlowWorld) {
    drop(world);
}
