//! QR check-in payloads and attendance records.
//!
//! Participants carry `eventtara:checkin:{event}:{user}`; companions reuse the
//! namespace with a `companion` tag: `eventtara:checkin:{event}:companion:{id}`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::UserId;
use super::string_enum::string_enum;

const SCHEME: &str = "eventtara";
const ACTION: &str = "checkin";
const COMPANION_TAG: &str = "companion";

/// Parsed QR check-in payload.
///
/// # Examples
/// ```
/// use eventtara::domain::CheckinCode;
///
/// let raw = "eventtara:checkin:0d7f3c5e-8f43-4f1e-9a55-4a3c2a0f1b6e:companion:\
///            5f1c2a3b-4d5e-4f60-8a7b-9c0d1e2f3a4b";
/// let code: CheckinCode = raw.parse().unwrap();
/// assert!(matches!(code, CheckinCode::Companion { .. }));
/// assert!("eventtara:checkout:x:y".parse::<CheckinCode>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinCode {
    /// A booking holder.
    Participant {
        /// Event the code was issued for.
        event_id: Uuid,
        /// Booking holder.
        user_id: UserId,
    },
    /// A companion under someone else's booking.
    Companion {
        /// Event the code was issued for.
        event_id: Uuid,
        /// Companion record.
        companion_id: Uuid,
    },
}

impl CheckinCode {
    /// Event encoded in the payload.
    pub fn event_id(&self) -> Uuid {
        match self {
            Self::Participant { event_id, .. } | Self::Companion { event_id, .. } => *event_id,
        }
    }
}

/// Raised when a scanned payload is not a check-in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid QR code.")]
pub struct InvalidCheckinCode;

impl FromStr for CheckinCode {
    type Err = InvalidCheckinCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.trim().split(':').collect();
        match parts.as_slice() {
            [SCHEME, ACTION, event, user] => Ok(Self::Participant {
                event_id: uuid(event)?,
                user_id: UserId::from_uuid(uuid(user)?),
            }),
            [SCHEME, ACTION, event, COMPANION_TAG, companion] => Ok(Self::Companion {
                event_id: uuid(event)?,
                companion_id: uuid(companion)?,
            }),
            _ => Err(InvalidCheckinCode),
        }
    }
}

fn uuid(segment: &str) -> Result<Uuid, InvalidCheckinCode> {
    Uuid::parse_str(segment).map_err(|_| InvalidCheckinCode)
}

impl fmt::Display for CheckinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Participant { event_id, user_id } => {
                write!(f, "{SCHEME}:{ACTION}:{event_id}:{user_id}")
            }
            Self::Companion {
                event_id,
                companion_id,
            } => write!(f, "{SCHEME}:{ACTION}:{event_id}:{COMPANION_TAG}:{companion_id}"),
        }
    }
}

string_enum! {
    /// How attendance was recorded.
    pub enum CheckinMethod ("check-in method") {
        /// Organizer scanned the participant's QR code.
        Qr => "qr",
        /// Organizer ticked the participant off by hand.
        Manual => "manual",
    }
}

/// Attendance row for a booking holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkin {
    /// Attended event.
    pub event_id: Uuid,
    /// Attendee.
    pub user_id: UserId,
    /// Recording channel.
    pub method: CheckinMethod,
    /// Attendance instant.
    pub checked_in_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EVENT: &str = "0d7f3c5e-8f43-4f1e-9a55-4a3c2a0f1b6e";
    const OTHER: &str = "5f1c2a3b-4d5e-4f60-8a7b-9c0d1e2f3a4b";

    #[rstest]
    fn parses_participant_codes() {
        let raw = format!("eventtara:checkin:{EVENT}:{OTHER}");
        let code: CheckinCode = raw.parse().expect("participant code");
        assert_eq!(
            code,
            CheckinCode::Participant {
                event_id: Uuid::parse_str(EVENT).expect("uuid"),
                user_id: UserId::new(OTHER).expect("user id"),
            }
        );
        assert_eq!(code.to_string(), raw);
    }

    #[rstest]
    fn parses_companion_codes_with_surrounding_whitespace() {
        let raw = format!("  eventtara:checkin:{EVENT}:companion:{OTHER}\n");
        let code: CheckinCode = raw.parse().expect("companion code");
        assert_eq!(code.event_id().to_string(), EVENT);
        assert!(matches!(code, CheckinCode::Companion { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("hello world")]
    #[case("eventtara:checkin")]
    #[case("eventtara:checkout:0d7f3c5e-8f43-4f1e-9a55-4a3c2a0f1b6e:5f1c2a3b-4d5e-4f60-8a7b-9c0d1e2f3a4b")]
    #[case("tara:checkin:0d7f3c5e-8f43-4f1e-9a55-4a3c2a0f1b6e:5f1c2a3b-4d5e-4f60-8a7b-9c0d1e2f3a4b")]
    #[case("eventtara:checkin:not-a-uuid:5f1c2a3b-4d5e-4f60-8a7b-9c0d1e2f3a4b")]
    #[case("eventtara:checkin:0d7f3c5e-8f43-4f1e-9a55-4a3c2a0f1b6e:guest:5f1c2a3b-4d5e-4f60-8a7b-9c0d1e2f3a4b")]
    #[case("eventtara:checkin:0d7f3c5e-8f43-4f1e-9a55-4a3c2a0f1b6e:5f1c2a3b-4d5e-4f60-8a7b-9c0d1e2f3a4b:extra")]
    fn rejects_malformed_codes(#[case] raw: &str) {
        assert_eq!(raw.parse::<CheckinCode>(), Err(InvalidCheckinCode));
    }

    #[rstest]
    fn invalid_code_message_matches_user_copy() {
        assert_eq!(InvalidCheckinCode.to_string(), "Invalid QR code.");
    }
}
