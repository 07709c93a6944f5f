//! Driving port for the public contact form.

use async_trait::async_trait;

use crate::domain::Error;

/// Raw contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Driving port for relaying contact inquiries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactCommand: Send + Sync {
    /// Validate and relay an inquiry to the team inbox.
    async fn submit_inquiry(&self, request: ContactRequest) -> Result<(), Error>;
}
