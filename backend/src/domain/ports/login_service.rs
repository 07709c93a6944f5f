//! Driving port for exchanging identity-provider tokens for a session.
//!
//! Inbound adapters call it to authenticate a caller without knowing how the
//! token is verified.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify the access token and return the authenticated user id.
    async fn authenticate(&self, token: &AccessToken) -> Result<UserId, Error>;
}
