//! Driving port for booking mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::string_enum::string_enum;
use crate::domain::{
    Booking, BookingStatus, CheckinCode, Companion, Error, PaymentMethod, PaymentStatus, UserId,
};

/// Serializable companion payload for driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionPayload {
    pub id: Uuid,
    pub full_name: String,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub qr_code: String,
}

/// Serializable booking payload for driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: UserId,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub qr_code: String,
    pub companions: Vec<CompanionPayload>,
    pub booked_at: DateTime<Utc>,
}

fn companion_payload(event_id: Uuid, companion: Companion) -> CompanionPayload {
    let qr_code = CheckinCode::Companion {
        event_id,
        companion_id: companion.id,
    }
    .to_string();
    CompanionPayload {
        id: companion.id,
        full_name: companion.full_name,
        checked_in_at: companion.checked_in_at,
        qr_code,
    }
}

impl From<Booking> for BookingPayload {
    fn from(value: Booking) -> Self {
        let qr_code = CheckinCode::Participant {
            event_id: value.event_id,
            user_id: value.user_id.clone(),
        }
        .to_string();
        let event_id = value.event_id;
        Self {
            id: value.id,
            event_id,
            user_id: value.user_id,
            status: value.status,
            payment_status: value.payment_status,
            payment_method: value.payment_method,
            qr_code,
            companions: value
                .companions
                .into_iter()
                .map(|companion| companion_payload(event_id, companion))
                .collect(),
            booked_at: value.booked_at,
        }
    }
}

/// Request to book an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookingRequest {
    pub event_id: Uuid,
    pub user_id: UserId,
    pub companion_names: Vec<String>,
    pub payment_method: Option<PaymentMethod>,
}

/// Response from booking an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub booking: BookingPayload,
    /// Another active booking whose event time range intersects this one.
    pub overlapping_event_id: Option<Uuid>,
}

/// Request to cancel one's own booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelBookingRequest {
    pub booking_id: Uuid,
    pub user_id: UserId,
}

string_enum! {
    /// Organizer verdict on a submitted payment.
    pub enum PaymentDecision ("payment decision") {
        /// Payment verified.
        Approve => "approve",
        /// Payment could not be verified.
        Reject => "reject",
    }
}

/// Request to approve or reject a booking's payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPaymentRequest {
    pub booking_id: Uuid,
    pub reviewer_id: UserId,
    pub decision: PaymentDecision,
    pub reason: Option<String>,
}

/// Driving port for booking write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Reserve seats for the user and any companions.
    async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<CreateBookingResponse, Error>;

    /// Cancel a pending or confirmed booking owned by the caller.
    async fn cancel_booking(&self, request: CancelBookingRequest) -> Result<BookingPayload, Error>;

    /// Approve or reject a pending payment as the event's organizer.
    async fn review_payment(&self, request: ReviewPaymentRequest) -> Result<BookingPayload, Error>;
}
