//! Events, organizers, time ranges and reviews.
//!
//! Events move through a small status machine. Every status change is routed
//! through [`EventStatus::transition_to`] so adapters cannot write an illegal
//! state.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;
use super::string_enum::string_enum;

/// Philippine Standard Time offset from UTC, in hours. The country observes no
/// daylight saving.
pub const PH_UTC_OFFSET_HOURS: i64 = 8;

/// Maximum length of a review body, in characters.
pub const MAX_REVIEW_BODY_CHARS: usize = 2000;

string_enum! {
    /// Activity category of an event.
    pub enum EventType ("event type") {
        /// Hiking and mountaineering.
        Hiking => "hiking",
        /// Mountain biking.
        Mtb => "mtb",
        /// Road cycling.
        RoadBike => "road_bike",
        /// Road running.
        Running => "running",
        /// Trail running.
        TrailRun => "trail_run",
    }
}

impl EventType {
    /// Label used in emails and listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hiking => "Hiking",
            Self::Mtb => "Mountain Biking",
            Self::RoadBike => "Road Biking",
            Self::Running => "Running",
            Self::TrailRun => "Trail Running",
        }
    }
}

string_enum! {
    /// Publication state of an event.
    pub enum EventStatus ("event status") {
        /// Being prepared; visible to its organizer only.
        Draft => "draft",
        /// Open for discovery and booking.
        Published => "published",
        /// The event has taken place.
        Completed => "completed",
        /// Called off by the organizer.
        Cancelled => "cancelled",
    }
}

impl EventStatus {
    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// # Examples
    /// ```
    /// use eventtara::domain::EventStatus;
    ///
    /// assert!(EventStatus::Draft.can_transition_to(EventStatus::Published));
    /// assert!(!EventStatus::Completed.can_transition_to(EventStatus::Published));
    /// ```
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Published)
                | (Self::Draft, Self::Cancelled)
                | (Self::Published, Self::Completed)
                | (Self::Published, Self::Cancelled)
        )
    }

    /// Validate a transition, returning the new status.
    pub fn transition_to(self, next: Self) -> Result<Self, EventValidationError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(EventValidationError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

/// Validation failures for events, transitions and reviews.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    /// Title was blank.
    #[error("Title is required.")]
    BlankTitle,
    /// Location was blank.
    #[error("Location is required.")]
    BlankLocation,
    /// Capacity below one.
    #[error("Maximum participants must be at least 1.")]
    NonPositiveCapacity,
    /// Negative price.
    #[error("Price must not be negative.")]
    NegativePrice,
    /// End time not after the start time.
    #[error("End time must be after the start time.")]
    EndNotAfterStart,
    /// Illegal status change.
    #[error("Cannot change event status from {from} to {to}.")]
    InvalidTransition {
        /// Current status.
        from: EventStatus,
        /// Requested status.
        to: EventStatus,
    },
    /// Rating outside 1 to 5.
    #[error("Rating must be between 1 and 5.")]
    RatingOutOfRange,
    /// Review body too long.
    #[error("Review must be at most {max} characters.")]
    ReviewTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// Organizer account linked to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizerProfile {
    /// Profile identifier referenced by events.
    pub id: Uuid,
    /// Owning user.
    pub user_id: UserId,
    /// Public organisation name.
    pub org_name: String,
}

/// A scheduled outdoor event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event identifier.
    pub id: Uuid,
    /// Organizer profile that owns the event.
    pub organizer_id: Uuid,
    /// Title shown in listings.
    pub title: String,
    /// Long description.
    pub description: Option<String>,
    /// Activity category.
    pub event_type: EventType,
    /// Publication state.
    pub status: EventStatus,
    /// Meeting point or venue.
    pub location: String,
    /// Start instant.
    pub starts_at: DateTime<Utc>,
    /// End instant, when the organizer supplied one.
    pub ends_at: Option<DateTime<Utc>>,
    /// Registration fee in whole Philippine pesos.
    pub price: i32,
    /// Participant capacity, companions included.
    pub max_participants: u32,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether joining the event costs nothing.
    pub fn is_free(&self) -> bool {
        self.price == 0
    }

    /// Whether the event has started relative to `now`.
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now
    }

    /// Occupied time range, defaulting the end to the close of the start day.
    pub fn time_range(&self) -> TimeRange {
        let end = self
            .ends_at
            .filter(|end| *end > self.starts_at)
            .unwrap_or_else(|| end_of_local_day(self.starts_at));
        TimeRange {
            start: self.starts_at,
            end,
        }
    }
}

/// Fields supplied by an organizer when creating an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Title shown in listings.
    pub title: String,
    /// Long description.
    pub description: Option<String>,
    /// Activity category.
    pub event_type: EventType,
    /// Meeting point or venue.
    pub location: String,
    /// Start instant.
    pub starts_at: DateTime<Utc>,
    /// Optional end instant.
    pub ends_at: Option<DateTime<Utc>>,
    /// Registration fee in whole pesos.
    pub price: i32,
    /// Participant capacity.
    pub max_participants: i32,
    /// Mountains the route visits.
    pub mountain_ids: Vec<Uuid>,
}

impl NewEvent {
    /// Validate the draft and build a [`Event`] owned by `organizer_id`.
    pub fn into_event(
        self,
        id: Uuid,
        organizer_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<Event, EventValidationError> {
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(EventValidationError::BlankTitle);
        }
        let location = self.location.trim().to_owned();
        if location.is_empty() {
            return Err(EventValidationError::BlankLocation);
        }
        let max_participants = u32::try_from(self.max_participants)
            .ok()
            .filter(|max| *max >= 1)
            .ok_or(EventValidationError::NonPositiveCapacity)?;
        if self.price < 0 {
            return Err(EventValidationError::NegativePrice);
        }
        if self.ends_at.is_some_and(|end| end <= self.starts_at) {
            return Err(EventValidationError::EndNotAfterStart);
        }
        let description = self
            .description
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());

        Ok(Event {
            id,
            organizer_id,
            title,
            description,
            event_type: self.event_type,
            status: EventStatus::Draft,
            location,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            price: self.price,
            max_participants,
            created_at,
        })
    }
}

/// Half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

/// Whether two ranges share any instant. Touching boundaries do not overlap.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use eventtara::domain::{TimeRange, ranges_overlap};
///
/// let at = |h| Utc.with_ymd_and_hms(2026, 3, 1, h, 0, 0).unwrap();
/// let morning = TimeRange { start: at(6), end: at(10) };
/// let noon = TimeRange { start: at(10), end: at(12) };
/// assert!(!ranges_overlap(&morning, &noon));
/// ```
pub fn ranges_overlap(a: &TimeRange, b: &TimeRange) -> bool {
    a.start < b.end && b.start < a.end
}

/// First event in `others` whose time range intersects `target`.
pub fn find_overlapping_event<'a>(target: &Event, others: &'a [Event]) -> Option<&'a Event> {
    let range = target.time_range();
    others
        .iter()
        .filter(|other| other.id != target.id)
        .find(|other| ranges_overlap(&range, &other.time_range()))
}

/// Midnight after `start` in Philippine time, expressed in UTC.
fn end_of_local_day(start: DateTime<Utc>) -> DateTime<Utc> {
    let offset = TimeDelta::hours(PH_UTC_OFFSET_HOURS);
    let local = start.naive_utc() + offset;
    local
        .date()
        .succ_opt()
        .and_then(|next| next.and_hms_opt(0, 0, 0))
        .map(|midnight| (midnight - offset).and_utc())
        .unwrap_or_else(|| start + TimeDelta::days(1))
}

/// Rating and optional text left by an attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReview {
    /// Review identifier.
    pub id: Uuid,
    /// Reviewed event.
    pub event_id: Uuid,
    /// Reviewer.
    pub user_id: UserId,
    /// Star rating from 1 to 5.
    pub rating: u8,
    /// Optional review text.
    pub body: Option<String>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl EventReview {
    /// Validate rating and body and build a review.
    pub fn new(
        event_id: Uuid,
        user_id: UserId,
        rating: i32,
        body: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EventValidationError> {
        let rating = u8::try_from(rating)
            .ok()
            .filter(|value| (1..=5).contains(value))
            .ok_or(EventValidationError::RatingOutOfRange)?;
        let body = body
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        if body
            .as_ref()
            .is_some_and(|text| text.chars().count() > MAX_REVIEW_BODY_CHARS)
        {
            return Err(EventValidationError::ReviewTooLong {
                max: MAX_REVIEW_BODY_CHARS,
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            rating,
            body,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn event_between(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Event {
        Event {
            id: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            title: "Mt. Pulag via Ambangeg".to_owned(),
            description: None,
            event_type: EventType::Hiking,
            status: EventStatus::Published,
            location: "Kabayan, Benguet".to_owned(),
            starts_at: start,
            ends_at: end,
            price: 0,
            max_participants: 10,
            created_at: at(1, 0),
        }
    }

    #[fixture]
    fn draft() -> NewEvent {
        NewEvent {
            title: "  Taal Sunrise Run ".to_owned(),
            description: Some("   ".to_owned()),
            event_type: EventType::Running,
            location: "Tagaytay".to_owned(),
            starts_at: at(10, 21),
            ends_at: Some(at(11, 2)),
            price: 750,
            max_participants: 40,
            mountain_ids: Vec::new(),
        }
    }

    #[rstest]
    fn touching_ranges_do_not_overlap() {
        let a = TimeRange {
            start: at(5, 1),
            end: at(5, 4),
        };
        let b = TimeRange {
            start: at(5, 4),
            end: at(5, 8),
        };
        assert!(!ranges_overlap(&a, &b));
        assert!(!ranges_overlap(&b, &a));
    }

    #[rstest]
    fn nested_ranges_overlap() {
        let outer = TimeRange {
            start: at(5, 0),
            end: at(5, 10),
        };
        let inner = TimeRange {
            start: at(5, 2),
            end: at(5, 3),
        };
        assert!(ranges_overlap(&outer, &inner));
    }

    #[rstest]
    fn missing_end_runs_to_local_midnight() {
        // 01:00 UTC on the 5th is 09:00 in Manila; the day closes at 16:00 UTC.
        let event = event_between(at(5, 1), None);
        assert_eq!(event.time_range().end, at(5, 16));
    }

    #[rstest]
    fn missing_end_after_local_midnight_uses_next_day() {
        // 17:00 UTC on the 5th is 01:00 on the 6th in Manila.
        let event = event_between(at(5, 17), None);
        assert_eq!(event.time_range().end, at(6, 16));
    }

    #[rstest]
    fn finds_first_overlapping_event_and_skips_self() {
        let target = event_between(at(5, 1), Some(at(5, 6)));
        let before = event_between(at(4, 1), Some(at(4, 6)));
        let clash = event_between(at(5, 5), Some(at(5, 9)));
        let others = vec![target.clone(), before, clash.clone()];
        let found = find_overlapping_event(&target, &others).map(|event| event.id);
        assert_eq!(found, Some(clash.id));
    }

    #[rstest]
    #[case(EventStatus::Draft, EventStatus::Published, true)]
    #[case(EventStatus::Draft, EventStatus::Cancelled, true)]
    #[case(EventStatus::Published, EventStatus::Completed, true)]
    #[case(EventStatus::Published, EventStatus::Cancelled, true)]
    #[case(EventStatus::Draft, EventStatus::Completed, false)]
    #[case(EventStatus::Published, EventStatus::Draft, false)]
    #[case(EventStatus::Completed, EventStatus::Published, false)]
    #[case(EventStatus::Cancelled, EventStatus::Published, false)]
    #[case(EventStatus::Published, EventStatus::Published, false)]
    fn status_machine(#[case] from: EventStatus, #[case] to: EventStatus, #[case] legal: bool) {
        assert_eq!(from.transition_to(to).is_ok(), legal);
    }

    #[rstest]
    fn new_event_trims_and_starts_as_draft(draft: NewEvent) {
        let event = draft
            .into_event(Uuid::new_v4(), Uuid::new_v4(), at(1, 0))
            .expect("valid draft");
        assert_eq!(event.title, "Taal Sunrise Run");
        assert_eq!(event.status, EventStatus::Draft);
        assert_eq!(event.description, None);
        assert_eq!(event.max_participants, 40);
    }

    #[rstest]
    #[case::blank_title(|d: &mut NewEvent| d.title = " ".to_owned(), EventValidationError::BlankTitle)]
    #[case::zero_capacity(|d: &mut NewEvent| d.max_participants = 0, EventValidationError::NonPositiveCapacity)]
    #[case::negative_price(|d: &mut NewEvent| d.price = -1, EventValidationError::NegativePrice)]
    #[case::end_equals_start(|d: &mut NewEvent| d.ends_at = Some(d.starts_at), EventValidationError::EndNotAfterStart)]
    fn new_event_rejects_invalid_fields(
        mut draft: NewEvent,
        #[case] mutate: fn(&mut NewEvent),
        #[case] expected: EventValidationError,
    ) {
        mutate(&mut draft);
        let result = draft.into_event(Uuid::new_v4(), Uuid::new_v4(), at(1, 0));
        assert_eq!(result, Err(expected));
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-3)]
    fn review_rejects_out_of_range_ratings(#[case] rating: i32) {
        let result = EventReview::new(Uuid::new_v4(), UserId::random(), rating, None, at(1, 0));
        assert_eq!(result, Err(EventValidationError::RatingOutOfRange));
    }

    #[rstest]
    fn review_rejects_long_bodies() {
        let body = "a".repeat(MAX_REVIEW_BODY_CHARS + 1);
        let result = EventReview::new(Uuid::new_v4(), UserId::random(), 5, Some(body), at(1, 0));
        assert!(matches!(
            result,
            Err(EventValidationError::ReviewTooLong { .. })
        ));
    }

    #[rstest]
    fn event_type_parses_and_labels() {
        let parsed: EventType = "road_bike".parse().expect("known type");
        assert_eq!(parsed, EventType::RoadBike);
        assert_eq!(parsed.label(), "Road Biking");
        assert!("kayaking".parse::<EventType>().is_err());
    }
}
