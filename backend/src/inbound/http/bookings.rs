//! Booking HTTP handlers.
//!
//! ```text
//! POST /api/v1/events/{event_id}/bookings
//! GET /api/v1/bookings
//! DELETE /api/v1/bookings/{booking_id}
//! PATCH /api/v1/bookings/{booking_id}/payment
//! ```

use actix_web::{delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::PaymentMethod;
use crate::domain::ports::{
    BookingPayload, CancelBookingRequest, CompanionPayload, CreateBookingRequest,
    CreateBookingResponse, PaymentDecision, ReviewPaymentRequest,
};
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::events::{EventPath, parse_event_id};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_enum, parse_uuid};

#[derive(Debug, Deserialize)]
struct BookingPath {
    booking_id: String,
}

fn parse_booking_id(path: BookingPath) -> Result<Uuid, Error> {
    parse_uuid(path.booking_id, FieldName::new("bookingId"))
}

/// Request payload for booking an event.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequestBody {
    /// Full names of companions joining on this booking.
    #[serde(default)]
    pub companions: Vec<String>,
    /// Required for paid events.
    #[schema(example = "gcash")]
    pub payment_method: Option<String>,
}

/// Companion attached to a booking.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanionBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub full_name: String,
    #[schema(format = "date-time")]
    pub checked_in_at: Option<String>,
    /// Check-in QR payload for the companion.
    pub qr_code: String,
}

impl From<CompanionPayload> for CompanionBody {
    fn from(value: CompanionPayload) -> Self {
        Self {
            id: value.id.to_string(),
            full_name: value.full_name,
            checked_in_at: value.checked_in_at.map(|at| at.to_rfc3339()),
            qr_code: value.qr_code,
        }
    }
}

/// Booking as seen by its owner or the event organizer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub event_id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(example = "confirmed")]
    pub status: String,
    #[schema(example = "paid")]
    pub payment_status: String,
    pub payment_method: Option<String>,
    /// Check-in QR payload for the booking owner.
    pub qr_code: String,
    pub companions: Vec<CompanionBody>,
    #[schema(format = "date-time")]
    pub booked_at: String,
}

impl From<BookingPayload> for BookingBody {
    fn from(value: BookingPayload) -> Self {
        Self {
            id: value.id.to_string(),
            event_id: value.event_id.to_string(),
            user_id: value.user_id.to_string(),
            status: value.status.as_str().to_owned(),
            payment_status: value.payment_status.as_str().to_owned(),
            payment_method: value.payment_method.map(|method| method.as_str().to_owned()),
            qr_code: value.qr_code,
            companions: value.companions.into_iter().map(CompanionBody::from).collect(),
            booked_at: value.booked_at.to_rfc3339(),
        }
    }
}

/// Response payload for a new booking.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponseBody {
    pub booking: BookingBody,
    /// Another active booking of the caller whose event overlaps this one.
    #[schema(format = "uuid")]
    pub overlapping_event_id: Option<String>,
}

impl From<CreateBookingResponse> for CreateBookingResponseBody {
    fn from(value: CreateBookingResponse) -> Self {
        Self {
            booking: BookingBody::from(value.booking),
            overlapping_event_id: value.overlapping_event_id.map(|id| id.to_string()),
        }
    }
}

/// The caller's bookings, newest first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListBookingsResponseBody {
    pub bookings: Vec<BookingBody>,
}

/// Organizer decision on a pending payment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPaymentRequestBody {
    #[schema(example = "approve")]
    pub decision: String,
    /// Shown to the participant when rejecting.
    pub reason: Option<String>,
}

/// Book an event for the caller and optional companions.
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/bookings",
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = CreateBookingRequestBody,
    responses(
        (status = 200, description = "Booking created", body = CreateBookingResponseBody),
        (status = 400, description = "Not bookable", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema),
        (status = 409, description = "Already booked", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking",
    security(("SessionCookie" = []))
)]
#[post("/events/{event_id}/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EventPath>,
    payload: web::Json<CreateBookingRequestBody>,
) -> ApiResult<web::Json<CreateBookingResponseBody>> {
    let user_id = session.require_user_id()?;
    let event_id = parse_event_id(path.into_inner())?;
    let CreateBookingRequestBody {
        companions,
        payment_method,
    } = payload.into_inner();
    let payment_method = payment_method
        .map(|raw| parse_enum::<PaymentMethod>(raw, FieldName::new("paymentMethod")))
        .transpose()?;
    let response = state
        .bookings
        .create_booking(CreateBookingRequest {
            event_id,
            user_id,
            companion_names: companions,
            payment_method,
        })
        .await?;
    Ok(web::Json(CreateBookingResponseBody::from(response)))
}

/// List the caller's bookings.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    responses(
        (status = 200, description = "Bookings", body = ListBookingsResponseBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listBookings",
    security(("SessionCookie" = []))
)]
#[get("/bookings")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ListBookingsResponseBody>> {
    let user_id = session.require_user_id()?;
    let bookings = state.bookings_query.list_bookings(&user_id).await?;
    Ok(web::Json(ListBookingsResponseBody {
        bookings: bookings.into_iter().map(BookingBody::from).collect(),
    }))
}

/// Cancel one of the caller's active bookings.
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{booking_id}",
    params(("booking_id" = String, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingBody),
        (status = 400, description = "Not cancellable", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking",
    security(("SessionCookie" = []))
)]
#[delete("/bookings/{booking_id}")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<BookingPath>,
) -> ApiResult<web::Json<BookingBody>> {
    let user_id = session.require_user_id()?;
    let booking_id = parse_booking_id(path.into_inner())?;
    let booking = state
        .bookings
        .cancel_booking(CancelBookingRequest {
            booking_id,
            user_id,
        })
        .await?;
    Ok(web::Json(BookingBody::from(booking)))
}

/// Approve or reject a pending payment as the event organizer.
#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{booking_id}/payment",
    params(("booking_id" = String, Path, description = "Booking identifier")),
    request_body = ReviewPaymentRequestBody,
    responses(
        (status = 200, description = "Payment reviewed", body = BookingBody),
        (status = 400, description = "Already reviewed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the organizer", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "reviewPayment",
    security(("SessionCookie" = []))
)]
#[patch("/bookings/{booking_id}/payment")]
pub async fn review_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<BookingPath>,
    payload: web::Json<ReviewPaymentRequestBody>,
) -> ApiResult<web::Json<BookingBody>> {
    let reviewer_id = session.require_user_id()?;
    let booking_id = parse_booking_id(path.into_inner())?;
    let ReviewPaymentRequestBody { decision, reason } = payload.into_inner();
    let decision = parse_enum::<PaymentDecision>(decision, FieldName::new("decision"))?;
    let booking = state
        .bookings
        .review_payment(ReviewPaymentRequest {
            booking_id,
            reviewer_id,
            decision,
            reason,
        })
        .await?;
    Ok(web::Json(BookingBody::from(booking)))
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
