//! HTTP server assembly: session cookies, trace ids, API routes and probes.

mod config;
mod state_builders;

pub use config::{OutboundAdapters, ServerConfig};
pub(crate) use state_builders::build_outbound_adapters;

use state_builders::build_http_state;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::time::Duration;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use eventtara::Trace;
#[cfg(debug_assertions)]
use eventtara::doc::ApiDoc;
use eventtara::inbound::http::configure_api;
use eventtara::inbound::http::health::{HealthState, live, ready};
use eventtara::inbound::http::session_config::SessionSettings;
use eventtara::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE_NAME: &str = "eventtara_session";
const SESSION_TTL: Duration = Duration::hours(2);

/// Everything a worker thread needs to build its [`App`].
#[derive(Clone)]
struct AppParts {
    health: web::Data<HealthState>,
    http: web::Data<HttpState>,
    session: SessionCookie,
}

/// Cookie settings cloned into each worker.
#[derive(Clone)]
struct SessionCookie {
    key: actix_web::cookie::Key,
    secure: bool,
    same_site: actix_web::cookie::SameSite,
}

impl From<SessionSettings> for SessionCookie {
    fn from(settings: SessionSettings) -> Self {
        Self {
            key: settings.key,
            secure: settings.cookie_secure,
            same_site: settings.same_site,
        }
    }
}

impl SessionCookie {
    /// Private (encrypted) cookie store; the session never leaves the client.
    fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE_NAME.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.secure)
            .cookie_http_only(true)
            .cookie_same_site(self.same_site)
            .cookie_content_security(CookieContentSecurity::Private)
            .session_lifecycle(PersistentSession::default().session_ttl(SESSION_TTL))
            .build()
    }
}

fn build_app(
    parts: AppParts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .wrap(parts.session.middleware())
        .configure(configure_api);

    let app = App::new()
        .app_data(parts.health)
        .app_data(parts.http)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(api);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the EventTara HTTP server.
///
/// Repositories are chosen by [`build_http_state`]: Diesel when the config
/// carries a pool, fixtures otherwise. Readiness flips once the socket is
/// bound; the returned [`Server`] must be awaited to serve requests.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let ServerConfig {
        session,
        bind_addr,
        #[cfg(feature = "metrics")]
        prometheus,
        ..
    } = config;
    let parts = AppParts {
        health: health_state.clone(),
        http: http_state,
        session: SessionCookie::from(session),
    };

    let server = HttpServer::new(move || {
        let app = build_app(parts.clone());
        #[cfg(feature = "metrics")]
        let app = app.wrap(actix_web::middleware::Condition::from_option(
            prometheus.clone(),
        ));
        app
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
