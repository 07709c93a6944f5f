//! Builders for HTTP state from repositories and outbound adapters.
//!
//! A configured database selects the Diesel repositories; otherwise every
//! repository is a fixture. Services are wired identically in both cases.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::warn;

use eventtara::domain::ports::{
    AccessTokenVerifier, AchievementEvaluator, AchievementRepository, BookingRepository,
    CheckinRepository, EventRepository, FixtureAccessTokenVerifier, FixtureAchievementRepository,
    FixtureBookingRepository, FixtureCheckinRepository, FixtureEventRepository,
    FixtureSocialRepository, FixtureUserDirectory, Mailer, SocialRepository, UserDirectory,
};
use eventtara::domain::{
    AchievementService, BookingService, CheckinService, ContactService, EventService, Notifier,
    SocialService, TokenLoginService,
};
use eventtara::inbound::http::session_config::BuildMode;
use eventtara::inbound::http::state::{HttpState, HttpStatePorts};
use eventtara::outbound::auth::JwtAccessTokenVerifier;
use eventtara::outbound::email::{LoggingMailer, ResendConfig, ResendMailer};
use eventtara::outbound::persistence::{
    DieselAchievementRepository, DieselBookingRepository, DieselCheckinRepository,
    DieselEventRepository, DieselSocialRepository, DieselUserDirectory,
};
use eventtara::settings::AppSettings;

use super::{OutboundAdapters, ServerConfig};

/// One adapter per repository port.
struct Repositories<E, B, C, A, S, U> {
    events: Arc<E>,
    bookings: Arc<B>,
    checkins: Arc<C>,
    achievements: Arc<A>,
    social: Arc<S>,
    users: Arc<U>,
}

fn wire_services<E, B, C, A, S, U>(
    repos: Repositories<E, B, C, A, S, U>,
    outbound: &OutboundAdapters,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    E: EventRepository + 'static,
    B: BookingRepository + 'static,
    C: CheckinRepository + 'static,
    A: AchievementRepository + 'static,
    S: SocialRepository + 'static,
    U: UserDirectory + 'static,
{
    let Repositories {
        events,
        bookings,
        checkins,
        achievements,
        social,
        users,
    } = repos;
    let notifier = Notifier::new(outbound.mailer.clone(), outbound.app_url.clone());

    let achievement_service = Arc::new(AchievementService::new(
        achievements,
        users.clone(),
        notifier.clone(),
        clock.clone(),
    ));
    let evaluator: Arc<dyn AchievementEvaluator> = achievement_service.clone();
    let event_service = Arc::new(EventService::new(
        events.clone(),
        checkins.clone(),
        clock.clone(),
    ));
    let booking_service = Arc::new(BookingService::new(
        events.clone(),
        bookings.clone(),
        users.clone(),
        notifier.clone(),
        clock.clone(),
    ));
    let social_service = Arc::new(SocialService::new(social, users.clone(), clock.clone()));

    HttpState::new(HttpStatePorts {
        login: Arc::new(TokenLoginService::new(
            outbound.verifier.clone(),
            users.clone(),
            clock.clone(),
        )),
        events: event_service.clone(),
        event_commands: event_service,
        bookings: booking_service.clone(),
        bookings_query: booking_service,
        checkins: Arc::new(CheckinService::new(
            events,
            bookings,
            checkins,
            users,
            evaluator.clone(),
            clock,
        )),
        achievements: achievement_service,
        evaluator,
        social: social_service.clone(),
        social_query: social_service,
        contact: Arc::new(ContactService::new(
            notifier,
            outbound.contact_inbox.clone(),
        )),
    })
}

/// Build the shared HTTP state from the configured pool or fixtures.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match &config.db_pool {
        Some(pool) => wire_services(
            Repositories {
                events: Arc::new(DieselEventRepository::new(pool.clone())),
                bookings: Arc::new(DieselBookingRepository::new(pool.clone())),
                checkins: Arc::new(DieselCheckinRepository::new(pool.clone())),
                achievements: Arc::new(DieselAchievementRepository::new(pool.clone())),
                social: Arc::new(DieselSocialRepository::new(pool.clone())),
                users: Arc::new(DieselUserDirectory::new(pool.clone())),
            },
            &config.outbound,
            clock,
        ),
        None => fixture_http_state(&config.outbound, clock),
    };
    web::Data::new(state)
}

fn fixture_http_state(outbound: &OutboundAdapters, clock: Arc<dyn Clock>) -> HttpState {
    wire_services(
        Repositories {
            events: Arc::new(FixtureEventRepository),
            bookings: Arc::new(FixtureBookingRepository),
            checkins: Arc::new(FixtureCheckinRepository),
            achievements: Arc::new(FixtureAchievementRepository),
            social: Arc::new(FixtureSocialRepository),
            users: Arc::new(FixtureUserDirectory),
        },
        outbound,
        clock,
    )
}

/// Select the access token verifier.
///
/// Without a JWT secret, debug builds accept bare user UUIDs as tokens;
/// release builds refuse to start.
pub(crate) fn build_token_verifier(
    settings: &AppSettings,
    mode: BuildMode,
) -> std::io::Result<Arc<dyn AccessTokenVerifier>> {
    match (settings.jwt_secret(), mode) {
        (Some(secret), _) => Ok(Arc::new(JwtAccessTokenVerifier::new(secret))),
        (None, BuildMode::Debug) => {
            warn!("EVENTTARA_JWT_SECRET not set; accepting user ids as access tokens (dev only)");
            Ok(Arc::new(FixtureAccessTokenVerifier))
        }
        (None, BuildMode::Release) => Err(std::io::Error::other(
            "EVENTTARA_JWT_SECRET must be set in release builds",
        )),
    }
}

/// Select the mail transport; without an API key mail is only logged.
pub(crate) fn build_mailer(settings: &AppSettings) -> std::io::Result<Arc<dyn Mailer>> {
    match settings.resend_api_key() {
        Some(api_key) => {
            let mailer = ResendMailer::new(ResendConfig {
                api_key,
                sender: settings.mail_from().to_owned(),
                endpoint: None,
                timeout: None,
            })
            .map_err(|err| std::io::Error::other(err.to_string()))?;
            Ok(Arc::new(mailer))
        }
        None => {
            warn!("EVENTTARA_RESEND_API_KEY not set; outgoing mail will only be logged");
            Ok(Arc::new(LoggingMailer))
        }
    }
}

/// Collect the non-database adapters described by `settings`.
pub(crate) fn build_outbound_adapters(
    settings: &AppSettings,
    mode: BuildMode,
) -> std::io::Result<OutboundAdapters> {
    Ok(OutboundAdapters {
        verifier: build_token_verifier(settings, mode)?,
        mailer: build_mailer(settings)?,
        app_url: settings.app_url().to_owned(),
        contact_inbox: settings.contact_inbox().to_owned(),
    })
}
