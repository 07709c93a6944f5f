//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test as actix_test;

use crate::domain::UserId;
use crate::domain::ports::{
    MockAchievementEvaluator, MockAchievementsQuery, MockBookingCommand, MockBookingQuery,
    MockCheckinCommand, MockContactCommand, MockEventCommand, MockEventQuery, MockLoginService,
    MockSocialCommand, MockSocialQuery,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mock driving ports; unset expectations panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub events: MockEventQuery,
    pub event_commands: MockEventCommand,
    pub bookings: MockBookingCommand,
    pub bookings_query: MockBookingQuery,
    pub checkins: MockCheckinCommand,
    pub achievements: MockAchievementsQuery,
    pub evaluator: MockAchievementEvaluator,
    pub social: MockSocialCommand,
    pub social_query: MockSocialQuery,
    pub contact: MockContactCommand,
}

impl MockPorts {
    /// Accept any access token as `user_id`.
    pub fn signed_in_as(mut self, user_id: &UserId) -> Self {
        let id = user_id.clone();
        self.login
            .expect_authenticate()
            .returning(move |_| Ok(id.clone()));
        self
    }

    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            login: Arc::new(self.login),
            events: Arc::new(self.events),
            event_commands: Arc::new(self.event_commands),
            bookings: Arc::new(self.bookings),
            bookings_query: Arc::new(self.bookings_query),
            checkins: Arc::new(self.checkins),
            achievements: Arc::new(self.achievements),
            evaluator: Arc::new(self.evaluator),
            social: Arc::new(self.social),
            social_query: Arc::new(self.social_query),
            contact: Arc::new(self.contact),
        })
    }
}

/// Exchange a dummy access token for a session cookie.
///
/// The app must mount [`crate::inbound::http::auth::create_session`] under
/// `/api/v1`.
pub async fn session_cookie<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/session")
        .set_json(serde_json::json!({ "accessToken": "test-access-token" }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
