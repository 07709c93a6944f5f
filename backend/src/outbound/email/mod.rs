//! Outbound mail adapters.
//!
//! [`ResendMailer`] delivers through the Resend HTTP API. [`LoggingMailer`]
//! records messages in the log and is used when no API key is configured.

mod logging;
mod resend;

pub use logging::LoggingMailer;
pub use resend::{ResendConfig, ResendMailer};
