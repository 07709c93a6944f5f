//! EventTara API entry-point: loads settings, prepares Postgres, and serves
//! the REST API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use eventtara::inbound::http::health::HealthState;
use eventtara::inbound::http::session_config::{BuildMode, session_settings_from_env};
use eventtara::outbound::persistence::{DbPool, PoolConfig, migrate};
use eventtara::settings::AppSettings;

use server::{ServerConfig, build_outbound_adapters, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os().map(OsString::from))
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    info!(settings = ?settings, "settings loaded");

    let mode = BuildMode::from_debug_assertions();
    let session = session_settings_from_env(&DefaultEnv::new(), mode)
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let outbound = build_outbound_adapters(&settings, mode)?;

    let mut config = ServerConfig::new(session, settings.bind_addr(), outbound);
    match settings.database_url() {
        Some(database_url) => {
            if settings.run_migrations {
                migrate(database_url.to_owned())
                    .await
                    .map_err(|err| std::io::Error::other(err.to_string()))?;
            }
            let pool = DbPool::new(
                PoolConfig::new(database_url).with_max_size(settings.db_pool_size()),
            )
            .await
            .map_err(|err| std::io::Error::other(err.to_string()))?;
            config = config.with_db_pool(pool);
        }
        None => warn!("EVENTTARA_DATABASE_URL not set; serving fixture data"),
    }

    #[cfg(feature = "metrics")]
    {
        let prometheus = actix_web_prom::PrometheusMetricsBuilder::new("eventtara")
            .endpoint("/metrics")
            .build()
            .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))?;
        config = config.with_metrics(prometheus);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %settings.bind_addr(), "starting EventTara API");
    create_server(health_state, config)?.await
}
