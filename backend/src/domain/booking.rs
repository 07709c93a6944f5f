//! Bookings, companions and capacity arithmetic.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::UserId;
use super::string_enum::string_enum;

/// Maximum number of companions a single booking may bring.
pub const MAX_COMPANIONS: usize = 10;

string_enum! {
    /// Lifecycle state of a booking.
    pub enum BookingStatus ("booking status") {
        /// Awaiting payment review.
        Pending => "pending",
        /// Seat secured.
        Confirmed => "confirmed",
        /// Withdrawn by the participant.
        Cancelled => "cancelled",
        /// Payment rejected by the organizer.
        Rejected => "rejected",
    }
}

impl BookingStatus {
    /// Statuses that hold a seat and allow check-in.
    pub const ACTIVE: [Self; 2] = [Self::Pending, Self::Confirmed];

    /// Whether the booking holds a seat.
    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }
}

string_enum! {
    /// Settlement state of a booking's fee.
    pub enum PaymentStatus ("payment status") {
        /// Proof submitted or cash expected; not yet reviewed.
        Pending => "pending",
        /// Settled.
        Paid => "paid",
        /// Proof rejected by the organizer.
        Rejected => "rejected",
        /// Returned to the participant.
        Refunded => "refunded",
    }
}

string_enum! {
    /// How the participant pays the organizer.
    pub enum PaymentMethod ("payment method") {
        /// GCash e-wallet transfer.
        Gcash => "gcash",
        /// Maya e-wallet transfer.
        Maya => "maya",
        /// Cash on the day.
        Cash => "cash",
    }
}

/// Additional person joining under a participant's booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Companion {
    /// Companion identifier encoded in their QR code.
    pub id: Uuid,
    /// Parent booking.
    pub booking_id: Uuid,
    /// Name shown at check-in.
    pub full_name: String,
    /// Attendance instant, once scanned.
    pub checked_in_at: Option<DateTime<Utc>>,
}

/// A participant's reservation for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// Booking identifier.
    pub id: Uuid,
    /// Booked event.
    pub event_id: Uuid,
    /// Participant.
    pub user_id: UserId,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Fee settlement state.
    pub payment_status: PaymentStatus,
    /// Chosen payment channel.
    pub payment_method: Option<PaymentMethod>,
    /// Companions riding on this booking.
    pub companions: Vec<Companion>,
    /// Creation instant.
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    /// Seats this booking occupies: the participant plus companions.
    pub fn seats(&self) -> u32 {
        seats_for(self.companions.len())
    }
}

/// Seats needed by one participant bringing `companions` people.
pub fn seats_for(companions: usize) -> u32 {
    u32::try_from(companions).unwrap_or(u32::MAX).saturating_add(1)
}

/// Reasons a booking cannot be accommodated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    /// No seats left at all.
    #[error("Event is fully booked.")]
    FullyBooked,
    /// Some seats left but not enough for the whole party.
    #[error("Not enough spots left for your companions.")]
    NotEnoughForCompanions {
        /// Seats still open.
        remaining: u32,
    },
}

/// Check whether `requested` more seats fit into an event.
///
/// # Examples
/// ```
/// use eventtara::domain::{CapacityError, check_capacity};
///
/// assert_eq!(check_capacity(10, 10, 1), Err(CapacityError::FullyBooked));
/// assert!(check_capacity(10, 7, 3).is_ok());
/// ```
pub fn check_capacity(max_participants: u32, taken: u32, requested: u32) -> Result<(), CapacityError> {
    if taken >= max_participants {
        return Err(CapacityError::FullyBooked);
    }
    let remaining = max_participants - taken;
    if requested > remaining {
        return Err(CapacityError::NotEnoughForCompanions { remaining });
    }
    Ok(())
}

/// Validation failures for companion lists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompanionValidationError {
    /// A companion name was blank.
    #[error("Companion names must not be empty.")]
    BlankName,
    /// Too many companions.
    #[error("A booking may include at most {max} companions.")]
    TooMany {
        /// Maximum accepted count.
        max: usize,
    },
}

/// Trim and validate companion names.
pub fn normalise_companion_names(names: Vec<String>) -> Result<Vec<String>, CompanionValidationError> {
    if names.len() > MAX_COMPANIONS {
        return Err(CompanionValidationError::TooMany { max: MAX_COMPANIONS });
    }
    names
        .into_iter()
        .map(|name| {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                Err(CompanionValidationError::BlankName)
            } else {
                Ok(trimmed.to_owned())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10, 10, 1, Err(CapacityError::FullyBooked))]
    #[case(10, 12, 1, Err(CapacityError::FullyBooked))]
    #[case(10, 8, 3, Err(CapacityError::NotEnoughForCompanions { remaining: 2 }))]
    #[case(10, 8, 2, Ok(()))]
    #[case(1, 0, 1, Ok(()))]
    fn capacity_rules(
        #[case] max: u32,
        #[case] taken: u32,
        #[case] requested: u32,
        #[case] expected: Result<(), CapacityError>,
    ) {
        assert_eq!(check_capacity(max, taken, requested), expected);
    }

    #[rstest]
    fn capacity_messages_match_user_copy() {
        assert_eq!(CapacityError::FullyBooked.to_string(), "Event is fully booked.");
        assert_eq!(
            CapacityError::NotEnoughForCompanions { remaining: 1 }.to_string(),
            "Not enough spots left for your companions."
        );
    }

    #[rstest]
    #[case(BookingStatus::Pending, true)]
    #[case(BookingStatus::Confirmed, true)]
    #[case(BookingStatus::Cancelled, false)]
    #[case(BookingStatus::Rejected, false)]
    fn active_statuses(#[case] status: BookingStatus, #[case] expected: bool) {
        assert_eq!(status.is_active(), expected);
    }

    #[rstest]
    fn companion_names_are_trimmed() {
        let names = normalise_companion_names(vec![" Ana ".to_owned(), "Ben".to_owned()])
            .expect("valid names");
        assert_eq!(names, vec!["Ana".to_owned(), "Ben".to_owned()]);
    }

    #[rstest]
    fn companion_names_reject_blank_and_excess() {
        assert_eq!(
            normalise_companion_names(vec!["  ".to_owned()]),
            Err(CompanionValidationError::BlankName)
        );
        let crowd = vec!["x".to_owned(); MAX_COMPANIONS + 1];
        assert!(matches!(
            normalise_companion_names(crowd),
            Err(CompanionValidationError::TooMany { .. })
        ));
    }

    #[rstest]
    fn seats_include_the_participant() {
        assert_eq!(seats_for(0), 1);
        assert_eq!(seats_for(3), 4);
    }
}
