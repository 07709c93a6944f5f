//! Internal Diesel row structs and their domain conversions.
//!
//! Rows are persistence details and never leave this module tree. Enum
//! columns are stored as their wire strings; a row carrying an unknown value
//! fails conversion with a message the repository reports as a query error.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AvatarBorder, Badge, Booking, Checkin, Comment, Companion, Event, EventReview,
    OrganizerProfile, Reaction, UserContact, UserId,
};

use super::schema::{
    avatar_borders, badges, booking_companions, bookings, event_checkins, event_mountains,
    event_reviews, events, feed_comments, feed_reactions, organizer_profiles,
    user_avatar_borders, user_badges, user_follows, users,
};

fn parse_column<T: std::str::FromStr>(value: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|err| err.to_string())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserContact {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            email: row.email,
            full_name: row.full_name,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = organizer_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrganizerRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub org_name: String,
}

impl From<OrganizerRow> for OrganizerProfile {
    fn from(row: OrganizerRow) -> Self {
        Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            org_name: row.org_name,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub status: String,
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub price: i32,
    pub max_participants: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = String;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            organizer_id: row.organizer_id,
            title: row.title,
            description: row.description,
            event_type: parse_column(&row.event_type)?,
            status: parse_column(&row.status)?,
            location: row.location,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            price: row.price,
            max_participants: u32::try_from(row.max_participants)
                .map_err(|_| format!("negative max_participants on event {}", row.id))?,
            created_at: row.created_at,
        })
    }
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            organizer_id: event.organizer_id,
            title: event.title.clone(),
            description: event.description.clone(),
            event_type: event.event_type.as_str().to_owned(),
            status: event.status.as_str().to_owned(),
            location: event.location.clone(),
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            price: event.price,
            max_participants: i32::try_from(event.max_participants).unwrap_or(i32::MAX),
            created_at: event.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = event_mountains)]
pub(crate) struct EventMountainRow {
    pub event_id: Uuid,
    pub mountain_id: Uuid,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = event_reviews)]
pub(crate) struct NewEventReviewRow<'a> {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub body: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a EventReview> for NewEventReviewRow<'a> {
    fn from(review: &'a EventReview) -> Self {
        Self {
            id: review.id,
            event_id: review.event_id,
            user_id: *review.user_id.as_uuid(),
            rating: i16::from(review.rating),
            body: review.body.as_deref(),
            created_at: review.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub booked_at: DateTime<Utc>,
}

impl BookingRow {
    /// Attach companions loaded separately.
    pub(crate) fn into_booking(self, companions: Vec<Companion>) -> Result<Booking, String> {
        Ok(Booking {
            id: self.id,
            event_id: self.event_id,
            user_id: UserId::from_uuid(self.user_id),
            status: parse_column(&self.status)?,
            payment_status: parse_column(&self.payment_status)?,
            payment_method: self
                .payment_method
                .as_deref()
                .map(parse_column)
                .transpose()?,
            companions,
            booked_at: self.booked_at,
        })
    }
}

impl From<&Booking> for BookingRow {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            event_id: booking.event_id,
            user_id: *booking.user_id.as_uuid(),
            status: booking.status.as_str().to_owned(),
            payment_status: booking.payment_status.as_str().to_owned(),
            payment_method: booking.payment_method.map(|method| method.as_str().to_owned()),
            booked_at: booking.booked_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = booking_companions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompanionRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub full_name: String,
    pub checked_in_at: Option<DateTime<Utc>>,
}

impl From<CompanionRow> for Companion {
    fn from(row: CompanionRow) -> Self {
        Self {
            id: row.id,
            booking_id: row.booking_id,
            full_name: row.full_name,
            checked_in_at: row.checked_in_at,
        }
    }
}

impl From<&Companion> for CompanionRow {
    fn from(companion: &Companion) -> Self {
        Self {
            id: companion.id,
            booking_id: companion.booking_id,
            full_name: companion.full_name.clone(),
            checked_in_at: companion.checked_in_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Check-ins
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = event_checkins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CheckinRow {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub method: String,
    pub checked_in_at: DateTime<Utc>,
}

impl TryFrom<CheckinRow> for Checkin {
    type Error = String;

    fn try_from(row: CheckinRow) -> Result<Self, Self::Error> {
        Ok(Self {
            event_id: row.event_id,
            user_id: UserId::from_uuid(row.user_id),
            method: parse_column(&row.method)?,
            checked_in_at: row.checked_in_at,
        })
    }
}

impl From<&Checkin> for CheckinRow {
    fn from(checkin: &Checkin) -> Self {
        Self {
            event_id: checkin.event_id,
            user_id: *checkin.user_id.as_uuid(),
            method: checkin.method.as_str().to_owned(),
            checked_in_at: checkin.checked_in_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = badges)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BadgeRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub criteria_key: Option<String>,
}

impl From<BadgeRow> for Badge {
    fn from(row: BadgeRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            criteria_key: row.criteria_key,
        }
    }
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = user_badges)]
pub(crate) struct UserBadgeRow {
    pub user_id: Uuid,
    pub badge_id: Uuid,
    pub awarded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = avatar_borders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AvatarBorderRow {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub tier: String,
    pub criteria_type: String,
    pub criteria_value: serde_json::Value,
    pub sort_order: i32,
}

impl TryFrom<AvatarBorderRow> for AvatarBorder {
    type Error = String;

    fn try_from(row: AvatarBorderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            tier: parse_column(&row.tier)?,
            criteria_type: row.criteria_type,
            criteria_value: row.criteria_value,
            sort_order: row.sort_order,
        })
    }
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_avatar_borders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserBorderRow {
    pub user_id: Uuid,
    pub border_id: Uuid,
    pub awarded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Social
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = user_follows)]
pub(crate) struct FollowRow {
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feed_reactions)]
pub(crate) struct ReactionRow<'a> {
    pub user_id: Uuid,
    pub activity_id: Uuid,
    pub kind: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Reaction> for ReactionRow<'a> {
    fn from(reaction: &'a Reaction) -> Self {
        Self {
            user_id: *reaction.user_id.as_uuid(),
            activity_id: reaction.activity_id,
            kind: reaction.kind.as_str(),
            created_at: reaction.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = feed_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            activity_id: row.activity_id,
            user_id: UserId::from_uuid(row.user_id),
            body: row.body,
            created_at: row.created_at,
        }
    }
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            activity_id: comment.activity_id,
            user_id: *comment.user_id.as_uuid(),
            body: comment.body.clone(),
            created_at: comment.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{fixture_now, organizer, published_event};
    use crate::domain::{EventStatus, EventType};
    use rstest::rstest;

    #[rstest]
    fn event_row_round_trips_enum_columns() {
        let event = published_event(&organizer());
        let row = EventRow::from(&event);
        assert_eq!(row.status, "published");

        let restored = Event::try_from(row).expect("valid row");
        assert_eq!(restored, event);
    }

    #[rstest]
    #[case::unknown_type("kayaking", "published")]
    #[case::unknown_status("hiking", "archived")]
    fn event_row_with_unknown_enum_value_is_rejected(#[case] event_type: &str, #[case] status: &str) {
        let mut row = EventRow::from(&published_event(&organizer()));
        row.event_type = event_type.to_owned();
        row.status = status.to_owned();

        assert!(Event::try_from(row).is_err());
    }

    #[rstest]
    fn booking_row_keeps_missing_payment_method() {
        let row = BookingRow {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: "confirmed".to_owned(),
            payment_status: "paid".to_owned(),
            payment_method: None,
            booked_at: fixture_now(),
        };

        let booking = row.into_booking(Vec::new()).expect("valid row");
        assert!(booking.payment_method.is_none());
        assert!(booking.status.is_active());
    }

    #[rstest]
    fn event_type_column_uses_wire_names() {
        let mut event = published_event(&organizer());
        event.event_type = EventType::TrailRun;
        event.status = EventStatus::Draft;
        let row = EventRow::from(&event);
        assert_eq!(row.event_type, "trail_run");
        assert_eq!(row.status, "draft");
    }
}
