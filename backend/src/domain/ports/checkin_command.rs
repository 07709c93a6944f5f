//! Driving port for QR check-ins.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::string_enum::string_enum;
use crate::domain::{Badge, Error, UserId};

/// A scan submitted from an organizer's active scan session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinRequest {
    /// Event the scan session is running for.
    pub event_id: Uuid,
    /// Organizer operating the scanner.
    pub scanner_id: UserId,
    /// Raw QR payload.
    pub code: String,
}

string_enum! {
    /// Who was scanned.
    pub enum AttendeeKind ("attendee kind") {
        /// Booking holder.
        Participant => "participant",
        /// Companion under a booking.
        Companion => "companion",
    }
}

/// Outcome of a successful scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinResponse {
    pub attendee_kind: AttendeeKind,
    /// User id for participants, companion id for companions.
    pub attendee_id: Uuid,
    pub name: String,
    pub message: String,
    pub already_checked_in: bool,
    /// Badges the participant unlocked with this check-in.
    pub awarded_badges: Vec<Badge>,
}

/// Driving port for recording attendance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckinCommand: Send + Sync {
    /// Validate a scanned code and record attendance.
    async fn check_in(&self, request: CheckinRequest) -> Result<CheckinResponse, Error>;
}
