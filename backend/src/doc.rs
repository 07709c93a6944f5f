//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler in the inbound layer, the request
//! and response bodies they exchange, the external [`ErrorSchema`] wrappers
//! that keep domain types free of utoipa derives, and the session cookie
//! security scheme.
//!
//! Swagger UI serves the document in debug builds; `cargo run --bin
//! openapi-dump` prints it for tooling.

use crate::inbound::http::achievements::{
    AwardedBorderBody, BadgeBody, BorderBody, EarnedBadgeBody, ListBadgesResponseBody,
    ListBordersResponseBody, RefreshAchievementsResponseBody,
};
use crate::inbound::http::auth::{CreateSessionRequestBody, SessionResponseBody};
use crate::inbound::http::bookings::{
    BookingBody, CompanionBody, CreateBookingRequestBody, CreateBookingResponseBody,
    ListBookingsResponseBody, ReviewPaymentRequestBody,
};
use crate::inbound::http::checkins::{CheckinRequestBody, CheckinResponseBody};
use crate::inbound::http::contact::ContactRequestBody;
use crate::inbound::http::events::{
    CreateEventRequestBody, EventBody, ListEventsResponseBody, ReviewBody,
    SubmitReviewRequestBody, TransitionEventRequestBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::social::{
    AddCommentRequestBody, CommentBody, ListCommentsResponseBody, ReactRequestBody,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie issued by POST /api/v1/session.",
            ))),
        );
    }
}

/// OpenAPI document for the EventTara REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "EventTara API",
        description = "Outdoor adventure events: bookings, QR check-ins, badges and social features."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::create_session,
        crate::inbound::http::auth::delete_session,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::get_event,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::transition_event_status,
        crate::inbound::http::events::submit_review,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::list_bookings,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::bookings::review_payment,
        crate::inbound::http::checkins::check_in,
        crate::inbound::http::achievements::list_badges,
        crate::inbound::http::achievements::list_borders,
        crate::inbound::http::achievements::refresh_achievements,
        crate::inbound::http::social::follow_user,
        crate::inbound::http::social::unfollow_user,
        crate::inbound::http::social::react,
        crate::inbound::http::social::unreact,
        crate::inbound::http::social::list_comments,
        crate::inbound::http::social::add_comment,
        crate::inbound::http::social::delete_comment,
        crate::inbound::http::contact::submit_contact,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateSessionRequestBody,
        SessionResponseBody,
        EventBody,
        ListEventsResponseBody,
        CreateEventRequestBody,
        TransitionEventRequestBody,
        SubmitReviewRequestBody,
        ReviewBody,
        CreateBookingRequestBody,
        CompanionBody,
        BookingBody,
        CreateBookingResponseBody,
        ListBookingsResponseBody,
        ReviewPaymentRequestBody,
        CheckinRequestBody,
        CheckinResponseBody,
        BadgeBody,
        EarnedBadgeBody,
        ListBadgesResponseBody,
        BorderBody,
        ListBordersResponseBody,
        AwardedBorderBody,
        RefreshAchievementsResponseBody,
        ReactRequestBody,
        AddCommentRequestBody,
        CommentBody,
        ListCommentsResponseBody,
        ContactRequestBody,
    )),
    tags(
        (name = "session", description = "Supabase token exchange and logout"),
        (name = "events", description = "Event listings, lifecycle and reviews"),
        (name = "bookings", description = "Bookings, companions and payment review"),
        (name = "checkins", description = "QR attendance scanning"),
        (name = "achievements", description = "Badges and avatar borders"),
        (name = "social", description = "Follows, reactions and comments"),
        (name = "contact", description = "Public contact form"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Structure checks on the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn object_has_field(schema: &RefOr<Schema>, field: &str) -> bool {
        matches!(schema, RefOr::T(Schema::Object(obj)) if obj.properties.contains_key(field))
    }

    #[rstest]
    #[case("code")]
    #[case("message")]
    #[case("traceId")]
    fn error_schema_exposes_field(#[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert!(object_has_field(error_schema, field), "missing '{field}'");
    }

    #[rstest]
    #[case("/api/v1/session")]
    #[case("/api/v1/events/{event_id}/checkins")]
    #[case("/api/v1/bookings/{booking_id}/payment")]
    #[case("/api/v1/users/{user_id}/borders")]
    #[case("/api/v1/activities/{activity_id}/comments")]
    #[case("/api/v1/contact")]
    #[case("/health/ready")]
    fn documents_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }

    #[rstest]
    #[case("CheckinResponseBody", "awardedBadges")]
    #[case("BookingBody", "paymentStatus")]
    #[case("EventBody", "maxParticipants")]
    fn body_schema_uses_camel_case(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let body = schemas.get(schema).expect("schema registered");
        assert!(object_has_field(body, field), "{schema} missing '{field}'");
    }
}
