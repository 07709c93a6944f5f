//! Mapping from driven-port failures to domain errors.
//!
//! Connection failures surface as `service_unavailable`; query failures as
//! `internal`. Variants carrying business meaning (conflicts, duplicates) are
//! matched by the calling service before falling back to these helpers.

use super::Error;
use super::ports::{
    AchievementRepositoryError, BookingRepositoryError, CheckinRepositoryError,
    EventRepositoryError, SocialRepositoryError, UserDirectoryError,
};

pub(crate) fn map_event_error(error: EventRepositoryError) -> Error {
    match error {
        EventRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("event repository unavailable: {message}"))
        }
        EventRepositoryError::Query { message } | EventRepositoryError::Conflict { message } => {
            Error::internal(format!("event repository error: {message}"))
        }
    }
}

pub(crate) fn map_booking_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking repository unavailable: {message}"))
        }
        BookingRepositoryError::Query { message } => {
            Error::internal(format!("booking repository error: {message}"))
        }
    }
}

pub(crate) fn map_checkin_error(error: CheckinRepositoryError) -> Error {
    match error {
        CheckinRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("check-in repository unavailable: {message}"))
        }
        CheckinRepositoryError::Query { message } => {
            Error::internal(format!("check-in repository error: {message}"))
        }
        CheckinRepositoryError::Duplicate => Error::conflict("Attendee is already checked in."),
    }
}

pub(crate) fn map_achievement_error(error: AchievementRepositoryError) -> Error {
    match error {
        AchievementRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("achievement repository unavailable: {message}"))
        }
        AchievementRepositoryError::Query { message } => {
            Error::internal(format!("achievement repository error: {message}"))
        }
    }
}

pub(crate) fn map_social_error(error: SocialRepositoryError) -> Error {
    match error {
        SocialRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("social repository unavailable: {message}"))
        }
        SocialRepositoryError::Query { message } => {
            Error::internal(format!("social repository error: {message}"))
        }
        SocialRepositoryError::Duplicate => Error::conflict("Already exists."),
    }
}

pub(crate) fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}
