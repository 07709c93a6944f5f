//! QR check-in HTTP handler.
//!
//! ```text
//! POST /api/v1/events/{event_id}/checkins {"code":"eventtara:checkin:<event>:<user>"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CheckinRequest, CheckinResponse};
use crate::inbound::http::ApiResult;
use crate::inbound::http::achievements::BadgeBody;
use crate::inbound::http::events::{EventPath, parse_event_id};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Scanned QR payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRequestBody {
    #[schema(example = "eventtara:checkin:8c1d3b0e-4a5f-4c8e-9d1e-2f3a4b5c6d7e:3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub code: String,
}

/// Outcome shown on the organizer's scanner.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckinResponseBody {
    #[schema(example = "participant")]
    pub attendee_kind: String,
    #[schema(format = "uuid")]
    pub attendee_id: String,
    pub name: String,
    #[schema(example = "Juan checked in!")]
    pub message: String,
    pub already_checked_in: bool,
    /// Badges unlocked by this check-in.
    pub awarded_badges: Vec<BadgeBody>,
}

impl From<CheckinResponse> for CheckinResponseBody {
    fn from(value: CheckinResponse) -> Self {
        Self {
            attendee_kind: value.attendee_kind.as_str().to_owned(),
            attendee_id: value.attendee_id.to_string(),
            name: value.name,
            message: value.message,
            already_checked_in: value.already_checked_in,
            awarded_badges: value.awarded_badges.into_iter().map(BadgeBody::from).collect(),
        }
    }
}

/// Record attendance from a scanned QR code.
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/checkins",
    params(("event_id" = String, Path, description = "Event being scanned")),
    request_body = CheckinRequestBody,
    responses(
        (status = 200, description = "Checked in, or already checked in", body = CheckinResponseBody),
        (status = 400, description = "Invalid or foreign QR code", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the event organizer", body = ErrorSchema),
        (status = 404, description = "No booking found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["checkins"],
    operation_id = "checkIn",
    security(("SessionCookie" = []))
)]
#[post("/events/{event_id}/checkins")]
pub async fn check_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EventPath>,
    payload: web::Json<CheckinRequestBody>,
) -> ApiResult<web::Json<CheckinResponseBody>> {
    let scanner_id = session.require_user_id()?;
    let event_id = parse_event_id(path.into_inner())?;
    let response = state
        .checkins
        .check_in(CheckinRequest {
            event_id,
            scanner_id,
            code: payload.into_inner().code,
        })
        .await?;
    Ok(web::Json(CheckinResponseBody::from(response)))
}
