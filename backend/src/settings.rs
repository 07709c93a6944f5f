//! Application settings loaded via OrthoConfig.
//!
//! Every value can come from a CLI flag, an `EVENTTARA_*` environment variable
//! or a configuration file. Missing infrastructure settings select fixture
//! adapters so the API can run without Postgres or mail credentials.

use std::fmt;
use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_POOL_SIZE: u32 = 10;
const DEFAULT_MAIL_FROM: &str = "EventTara <noreply@eventtara.com>";
const DEFAULT_CONTACT_INBOX: &str = "hello@eventtara.com";
const DEFAULT_APP_URL: &str = "http://localhost:3000";

/// Runtime configuration for the EventTara API server.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EVENTTARA")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<SocketAddr>,
    /// Postgres connection URL. Without it, fixture repositories are used.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Run embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Shared secret used to verify Supabase access tokens.
    pub jwt_secret: Option<String>,
    /// Resend API key. Without it, outgoing mail is only logged.
    pub resend_api_key: Option<String>,
    /// `From` header for outgoing mail.
    pub mail_from: Option<String>,
    /// Inbox receiving contact form inquiries.
    pub contact_inbox: Option<String>,
    /// Public web app URL used in email links.
    pub app_url: Option<String>,
}

impl AppSettings {
    /// Listening address, defaulting to all interfaces on port 8080.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or(SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_deref())
    }

    /// Pool size, at least one connection.
    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_DB_POOL_SIZE).max(1)
    }

    /// JWT secret in a buffer that is wiped on drop.
    pub fn jwt_secret(&self) -> Option<Zeroizing<String>> {
        non_blank(self.jwt_secret.as_deref()).map(|secret| Zeroizing::new(secret.to_owned()))
    }

    /// Resend API key in a buffer that is wiped on drop.
    pub fn resend_api_key(&self) -> Option<Zeroizing<String>> {
        non_blank(self.resend_api_key.as_deref()).map(|key| Zeroizing::new(key.to_owned()))
    }

    /// Sender identity for outgoing mail.
    pub fn mail_from(&self) -> &str {
        non_blank(self.mail_from.as_deref()).unwrap_or(DEFAULT_MAIL_FROM)
    }

    /// Contact form destination.
    pub fn contact_inbox(&self) -> &str {
        non_blank(self.contact_inbox.as_deref()).unwrap_or(DEFAULT_CONTACT_INBOX)
    }

    /// Web app base URL without a trailing slash.
    pub fn app_url(&self) -> &str {
        non_blank(self.app_url.as_deref())
            .unwrap_or(DEFAULT_APP_URL)
            .trim_end_matches('/')
    }
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr())
            .field("database_url", &self.database_url().map(|_| "<redacted>"))
            .field("db_pool_size", &self.db_pool_size())
            .field("run_migrations", &self.run_migrations)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field(
                "resend_api_key",
                &self.resend_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("mail_from", &self.mail_from())
            .field("contact_inbox", &self.contact_inbox())
            .field("app_url", &self.app_url())
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
