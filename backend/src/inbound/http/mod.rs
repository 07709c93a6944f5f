//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers are mounted under `/api/v1` by [`configure_api`]; health probes
//! sit at the root.

pub mod achievements;
pub mod auth;
pub mod bookings;
pub mod checkins;
pub mod contact;
pub mod error;
pub mod events;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod social;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// Requires [`state::HttpState`] app data and a session middleware on the
/// enclosing scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::create_session)
        .service(auth::delete_session)
        .service(events::list_events)
        .service(events::create_event)
        .service(events::get_event)
        .service(events::transition_event_status)
        .service(events::submit_review)
        .service(bookings::create_booking)
        .service(bookings::list_bookings)
        .service(bookings::cancel_booking)
        .service(bookings::review_payment)
        .service(checkins::check_in)
        .service(achievements::list_badges)
        .service(achievements::list_borders)
        .service(achievements::refresh_achievements)
        .service(social::follow_user)
        .service(social::unfollow_user)
        .service(social::react)
        .service(social::unreact)
        .service(social::list_comments)
        .service(social::add_comment)
        .service(social::delete_comment)
        .service(contact::submit_contact);
}
