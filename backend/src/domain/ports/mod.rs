//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`UserDirectory`], [`Mailer`],
//! [`AccessTokenVerifier`]) are implemented by outbound adapters. Driving
//! ports (`*Command`, `*Query`, [`LoginService`], [`AchievementEvaluator`])
//! are implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod access_token_verifier;
mod achievement_evaluator;
mod achievement_repository;
mod achievements_query;
mod booking_command;
mod booking_query;
mod booking_repository;
mod checkin_command;
mod checkin_repository;
mod contact_command;
mod event_command;
mod event_query;
mod event_repository;
mod login_service;
mod mailer;
mod social_command;
mod social_query;
mod social_repository;
mod user_directory;

#[cfg(test)]
pub use access_token_verifier::MockAccessTokenVerifier;
pub use access_token_verifier::{
    AccessTokenError, AccessTokenVerifier, FixtureAccessTokenVerifier, VerifiedIdentity,
};
#[cfg(test)]
pub use achievement_evaluator::MockAchievementEvaluator;
pub use achievement_evaluator::{AchievementEvaluator, FixtureAchievementEvaluator};
#[cfg(test)]
pub use achievement_repository::MockAchievementRepository;
pub use achievement_repository::{
    AchievementRepository, AchievementRepositoryError, FixtureAchievementRepository,
};
#[cfg(test)]
pub use achievements_query::MockAchievementsQuery;
pub use achievements_query::{AchievementsQuery, BorderPayload, EarnedBadgePayload};
#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_command::{
    BookingCommand, BookingPayload, CancelBookingRequest, CompanionPayload, CreateBookingRequest,
    CreateBookingResponse, PaymentDecision, ReviewPaymentRequest,
};
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::BookingQuery;
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, BookingRepositoryError, FixtureBookingRepository};
#[cfg(test)]
pub use checkin_command::MockCheckinCommand;
pub use checkin_command::{AttendeeKind, CheckinCommand, CheckinRequest, CheckinResponse};
#[cfg(test)]
pub use checkin_repository::MockCheckinRepository;
pub use checkin_repository::{CheckinRepository, CheckinRepositoryError, FixtureCheckinRepository};
#[cfg(test)]
pub use contact_command::MockContactCommand;
pub use contact_command::{ContactCommand, ContactRequest};
#[cfg(test)]
pub use event_command::MockEventCommand;
pub use event_command::{
    CreateEventRequest, EventCommand, EventPayload, SubmitReviewRequest, TransitionEventRequest,
};
#[cfg(test)]
pub use event_query::MockEventQuery;
pub use event_query::{
    DEFAULT_EVENT_LIMIT, EventQuery, GetEventRequest, ListEventsRequest, MAX_EVENT_LIMIT,
};
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{
    EventListFilter, EventRepository, EventRepositoryError, FixtureEventRepository,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{FixtureMailer, Mailer, MailerError};
#[cfg(test)]
pub use social_command::MockSocialCommand;
pub use social_command::{CommentPayload, SocialCommand};
#[cfg(test)]
pub use social_query::MockSocialQuery;
pub use social_query::SocialQuery;
#[cfg(test)]
pub use social_repository::MockSocialRepository;
pub use social_repository::{FixtureSocialRepository, SocialRepository, SocialRepositoryError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
