//! Event catalogue HTTP handlers.
//!
//! ```text
//! GET /api/v1/events?type=hiking&limit=20
//! GET /api/v1/events/{event_id}
//! POST /api/v1/events
//! PATCH /api/v1/events/{event_id}/status
//! POST /api/v1/events/{event_id}/reviews
//! ```

use actix_web::{get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    CreateEventRequest, EventPayload, GetEventRequest, ListEventsRequest, SubmitReviewRequest,
    TransitionEventRequest,
};
use crate::domain::{Error, EventReview, EventStatus, EventType, NewEvent};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_enum, parse_optional_rfc3339_timestamp, parse_rfc3339_timestamp, parse_uuid,
    parse_uuid_list,
};

#[derive(Debug, Deserialize)]
pub(crate) struct EventPath {
    event_id: String,
}

pub(crate) fn parse_event_id(path: EventPath) -> Result<Uuid, Error> {
    parse_uuid(path.event_id, FieldName::new("eventId"))
}

/// Query parameters for `GET /api/v1/events`.
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsQuery {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub limit: Option<u32>,
}

/// Event returned by catalogue endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub organizer_id: String,
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "hiking")]
    pub event_type: String,
    #[schema(example = "published")]
    pub status: String,
    pub location: String,
    #[schema(format = "date-time")]
    pub starts_at: String,
    #[schema(format = "date-time")]
    pub ends_at: Option<String>,
    /// Registration fee in whole pesos.
    pub price: i32,
    pub max_participants: u32,
}

impl From<EventPayload> for EventBody {
    fn from(value: EventPayload) -> Self {
        Self {
            id: value.id.to_string(),
            organizer_id: value.organizer_id.to_string(),
            title: value.title,
            description: value.description,
            event_type: value.event_type.as_str().to_owned(),
            status: value.status.as_str().to_owned(),
            location: value.location,
            starts_at: value.starts_at.to_rfc3339(),
            ends_at: value.ends_at.map(|at| at.to_rfc3339()),
            price: value.price,
            max_participants: value.max_participants,
        }
    }
}

/// Published events.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsResponseBody {
    pub events: Vec<EventBody>,
}

/// Request payload for creating an event.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequestBody {
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "hiking")]
    pub event_type: String,
    pub location: String,
    #[schema(format = "date-time")]
    pub starts_at: String,
    #[schema(format = "date-time")]
    pub ends_at: Option<String>,
    pub price: i32,
    pub max_participants: i32,
    #[serde(default)]
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub mountain_ids: Vec<String>,
}

fn parse_new_event(payload: CreateEventRequestBody) -> Result<NewEvent, Error> {
    Ok(NewEvent {
        title: payload.title,
        description: payload.description,
        event_type: parse_enum::<EventType>(payload.event_type, FieldName::new("eventType"))?,
        location: payload.location,
        starts_at: parse_rfc3339_timestamp(payload.starts_at, FieldName::new("startsAt"))?,
        ends_at: parse_optional_rfc3339_timestamp(payload.ends_at, FieldName::new("endsAt"))?,
        price: payload.price,
        max_participants: payload.max_participants,
        mountain_ids: parse_uuid_list(payload.mountain_ids, FieldName::new("mountainIds"))?,
    })
}

/// Request payload for a status transition.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEventRequestBody {
    #[schema(example = "published")]
    pub status: String,
}

/// Request payload for reviewing an attended event.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequestBody {
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i32,
    pub body: Option<String>,
}

/// Stored review.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub event_id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    pub rating: u8,
    pub body: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<EventReview> for ReviewBody {
    fn from(value: EventReview) -> Self {
        Self {
            id: value.id.to_string(),
            event_id: value.event_id.to_string(),
            user_id: value.user_id.to_string(),
            rating: value.rating,
            body: value.body,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// List published events ordered by start time.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    params(
        ("type" = Option<String>, Query, description = "Event type filter"),
        ("limit" = Option<u32>, Query, description = "Maximum events returned (1-100)")
    ),
    responses(
        (status = 200, description = "Published events", body = ListEventsResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "listEvents",
    security([])
)]
#[get("/events")]
pub async fn list_events(
    state: web::Data<HttpState>,
    query: web::Query<ListEventsQuery>,
) -> ApiResult<web::Json<ListEventsResponseBody>> {
    let ListEventsQuery { event_type, limit } = query.into_inner();
    let event_type = event_type
        .map(|raw| parse_enum::<EventType>(raw, FieldName::new("type")))
        .transpose()?;
    let events = state
        .events
        .list_events(ListEventsRequest { event_type, limit })
        .await?;
    Ok(web::Json(ListEventsResponseBody {
        events: events.into_iter().map(EventBody::from).collect(),
    }))
}

/// Fetch one event. Drafts are visible only to their organizer.
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}",
    params(("event_id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Event", body = EventBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "getEvent",
    security([])
)]
#[get("/events/{event_id}")]
pub async fn get_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EventPath>,
) -> ApiResult<web::Json<EventBody>> {
    let event_id = parse_event_id(path.into_inner())?;
    let viewer = session.user_id()?;
    let event = state
        .events
        .get_event(GetEventRequest { event_id, viewer })
        .await?;
    Ok(web::Json(EventBody::from(event)))
}

/// Create a draft event owned by the caller's organizer profile.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = CreateEventRequestBody,
    responses(
        (status = 200, description = "Event created", body = EventBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not an organizer", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "createEvent",
    security(("SessionCookie" = []))
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateEventRequestBody>,
) -> ApiResult<web::Json<EventBody>> {
    let user_id = session.require_user_id()?;
    let event = parse_new_event(payload.into_inner())?;
    let created = state
        .event_commands
        .create_event(CreateEventRequest { user_id, event })
        .await?;
    Ok(web::Json(EventBody::from(created)))
}

/// Move an event through its lifecycle.
#[utoipa::path(
    patch,
    path = "/api/v1/events/{event_id}/status",
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = TransitionEventRequestBody,
    responses(
        (status = 200, description = "Event updated", body = EventBody),
        (status = 400, description = "Invalid transition", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "transitionEventStatus",
    security(("SessionCookie" = []))
)]
#[patch("/events/{event_id}/status")]
pub async fn transition_event_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EventPath>,
    payload: web::Json<TransitionEventRequestBody>,
) -> ApiResult<web::Json<EventBody>> {
    let user_id = session.require_user_id()?;
    let event_id = parse_event_id(path.into_inner())?;
    let status = parse_enum::<EventStatus>(payload.into_inner().status, FieldName::new("status"))?;
    let updated = state
        .event_commands
        .transition_status(TransitionEventRequest {
            event_id,
            user_id,
            status,
        })
        .await?;
    Ok(web::Json(EventBody::from(updated)))
}

/// Review an event the caller attended.
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/reviews",
    params(("event_id" = String, Path, description = "Event identifier")),
    request_body = SubmitReviewRequestBody,
    responses(
        (status = 200, description = "Review stored", body = ReviewBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Did not attend", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Already reviewed", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "submitEventReview",
    security(("SessionCookie" = []))
)]
#[post("/events/{event_id}/reviews")]
pub async fn submit_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EventPath>,
    payload: web::Json<SubmitReviewRequestBody>,
) -> ApiResult<web::Json<ReviewBody>> {
    let user_id = session.require_user_id()?;
    let event_id = parse_event_id(path.into_inner())?;
    let SubmitReviewRequestBody { rating, body } = payload.into_inner();
    let review = state
        .event_commands
        .submit_review(SubmitReviewRequest {
            event_id,
            user_id,
            rating,
            body,
        })
        .await?;
    Ok(web::Json(ReviewBody::from(review)))
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
