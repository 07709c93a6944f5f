//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, and the services that enforce EventTara's booking,
//! check-in and achievement rules. Services depend only on the traits in
//! [`ports`]; adapters live under `inbound` and `outbound`.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Event, Booking, Checkin — the attendance aggregates.
//! - Badge, AvatarBorder — achievement definitions and their evaluators.

pub mod achievements;
pub mod auth;
pub mod booking;
pub mod checkin;
pub mod contact;
pub mod error;
pub mod event;
pub mod notifications;
pub mod ports;
pub mod social;
pub mod trace_id;
pub mod user;

mod achievement_service;
mod booking_service;
mod checkin_service;
mod contact_service;
mod event_service;
mod login_service;
mod repository_errors;
mod social_service;
mod string_enum;
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::achievement_service::AchievementService;
pub use self::achievements::{
    AvatarBorder, AwardedAchievements, Badge, BadgeKey, BorderCriteria, BorderCriteriaError,
    BorderProgress, BorderStats, BorderTier, CheckinStats, EarnedBadge, EarnedBorder,
    PIONEER_RANK_LIMIT, evaluate_badge_keys, newly_earned_badges, newly_earned_borders,
    pioneer_rank,
};
pub use self::auth::{AccessToken, AccessTokenValidationError};
pub use self::booking::{
    Booking, BookingStatus, CapacityError, Companion, CompanionValidationError, MAX_COMPANIONS,
    PaymentMethod, PaymentStatus, check_capacity, normalise_companion_names, seats_for,
};
pub use self::booking_service::BookingService;
pub use self::checkin::{Checkin, CheckinCode, CheckinMethod, InvalidCheckinCode};
pub use self::checkin_service::CheckinService;
pub use self::contact::{
    ContactInquiry, ContactValidationError, MAX_MESSAGE_CHARS, MIN_MESSAGE_CHARS,
};
pub use self::contact_service::ContactService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::event::{
    Event, EventReview, EventStatus, EventType, EventValidationError, MAX_REVIEW_BODY_CHARS,
    NewEvent, OrganizerProfile, PH_UTC_OFFSET_HOURS, TimeRange, find_overlapping_event,
    ranges_overlap,
};
pub use self::event_service::EventService;
pub use self::login_service::TokenLoginService;
pub use self::notifications::{
    EmailMessage, Notifier, escape_html, format_local_datetime, format_price,
};
pub use self::social::{
    Comment, CommentValidationError, MAX_COMMENT_CHARS, Reaction, ReactionKind,
};
pub use self::social_service::SocialService;
pub use self::string_enum::ParseEnumError;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{FALLBACK_DISPLAY_NAME, UserContact, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use eventtara::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
