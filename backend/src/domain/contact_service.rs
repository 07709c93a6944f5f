//! Contact form relay.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{ContactCommand, ContactRequest};
use crate::domain::{ContactInquiry, Error, Notifier};

/// Relays validated inquiries to the team inbox.
#[derive(Clone)]
pub struct ContactService {
    notifier: Notifier,
    inbox: String,
}

impl ContactService {
    /// Create a service delivering to `inbox`.
    pub fn new(notifier: Notifier, inbox: impl Into<String>) -> Self {
        Self {
            notifier,
            inbox: inbox.into(),
        }
    }
}

#[async_trait]
impl ContactCommand for ContactService {
    async fn submit_inquiry(&self, request: ContactRequest) -> Result<(), Error> {
        let inquiry = ContactInquiry::new(&request.name, &request.email, &request.message)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let message = self.notifier.contact_inquiry(&self.inbox, &inquiry);
        self.notifier.send(&message).await.map_err(|err| {
            warn!(error = %err, "contact inquiry delivery failed");
            Error::service_unavailable("Could not send your message. Please try again later.")
        })?;
        info!(reply_to = %inquiry.email(), "contact inquiry relayed");
        Ok(())
    }
}
