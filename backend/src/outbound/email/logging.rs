//! Mailer that logs instead of sending.

use async_trait::async_trait;
use tracing::info;

use crate::domain::EmailMessage;
use crate::domain::ports::{Mailer, MailerError};

/// Logs the envelope of every message and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            reply_to = ?message.reply_to,
            html_bytes = message.html.len(),
            "email delivery disabled; message logged"
        );
        Ok(())
    }
}
