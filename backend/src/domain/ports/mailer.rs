//! Port for transactional email delivery.

use async_trait::async_trait;

use crate::domain::EmailMessage;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail transports.
    pub enum MailerError {
        /// The transport could not be reached.
        Transport { message: String } =>
            "mail transport failed: {message}",
        /// The provider refused the message.
        Rejected { status: u16, message: String } =>
            "mail provider rejected message ({status}): {message}",
    }
}

/// Port for sending one email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message.
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError>;
}

/// Fixture mailer that accepts and drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMailer;

#[async_trait]
impl Mailer for FixtureMailer {
    async fn send(&self, _message: &EmailMessage) -> Result<(), MailerError> {
        Ok(())
    }
}
