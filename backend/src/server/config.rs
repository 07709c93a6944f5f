//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use eventtara::domain::ports::{AccessTokenVerifier, Mailer};
use eventtara::inbound::http::session_config::SessionSettings;
use eventtara::outbound::persistence::DbPool;

/// Non-database adapters and the values services need from settings.
#[derive(Clone)]
pub struct OutboundAdapters {
    pub verifier: Arc<dyn AccessTokenVerifier>,
    pub mailer: Arc<dyn Mailer>,
    /// Web app base URL used in email links.
    pub app_url: String,
    /// Destination for contact form inquiries.
    pub contact_inbox: String,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) outbound: OutboundAdapters,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Configuration that serves fixture repositories until a pool is attached.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, outbound: OutboundAdapters) -> Self {
        Self {
            session,
            bind_addr,
            outbound,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool for the Diesel repositories.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: PrometheusMetrics) -> Self {
        self.prometheus = Some(prometheus);
        self
    }
}
