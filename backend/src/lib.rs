//! EventTara backend library.
//!
//! Hexagonal layout: `domain` holds the booking, check-in and achievement
//! rules behind port traits; `inbound` adapts HTTP onto the driving ports;
//! `outbound` implements the driven ports with Postgres, Resend and JWT.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
