//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AchievementEvaluator, AchievementsQuery, BookingCommand, BookingQuery, CheckinCommand,
    ContactCommand, EventCommand, EventQuery, LoginService, SocialCommand, SocialQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub events: Arc<dyn EventQuery>,
    pub event_commands: Arc<dyn EventCommand>,
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
    pub checkins: Arc<dyn CheckinCommand>,
    pub achievements: Arc<dyn AchievementsQuery>,
    pub evaluator: Arc<dyn AchievementEvaluator>,
    pub social: Arc<dyn SocialCommand>,
    pub social_query: Arc<dyn SocialQuery>,
    pub contact: Arc<dyn ContactCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub events: Arc<dyn EventQuery>,
    pub event_commands: Arc<dyn EventCommand>,
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
    pub checkins: Arc<dyn CheckinCommand>,
    pub achievements: Arc<dyn AchievementsQuery>,
    pub evaluator: Arc<dyn AchievementEvaluator>,
    pub social: Arc<dyn SocialCommand>,
    pub social_query: Arc<dyn SocialQuery>,
    pub contact: Arc<dyn ContactCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// Services implementing several ports are shared by cloning the `Arc`.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use eventtara::domain::ports::{AchievementEvaluator, LoginService};
    /// use eventtara::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// fn build(ports: HttpStatePorts) -> Arc<dyn LoginService> {
    ///     let state = HttpState::new(ports);
    ///     state.login.clone()
    /// }
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            events,
            event_commands,
            bookings,
            bookings_query,
            checkins,
            achievements,
            evaluator,
            social,
            social_query,
            contact,
        } = ports;
        Self {
            login,
            events,
            event_commands,
            bookings,
            bookings_query,
            checkins,
            achievements,
            evaluator,
            social,
            social_query,
            contact,
        }
    }
}
