//! Access-token login.
//!
//! Verifies an identity-provider token and makes sure a profile row exists
//! for first-time users, so signup timestamps feed border evaluation.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{AccessTokenError, AccessTokenVerifier, LoginService, UserDirectory};
use crate::domain::repository_errors::map_directory_error;
use crate::domain::{AccessToken, Error, UserContact, UserId};

/// [`LoginService`] backed by an [`AccessTokenVerifier`].
#[derive(Clone)]
pub struct TokenLoginService<U> {
    verifier: Arc<dyn AccessTokenVerifier>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> TokenLoginService<U> {
    /// Create a login service.
    pub fn new(verifier: Arc<dyn AccessTokenVerifier>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            verifier,
            users,
            clock,
        }
    }
}

#[async_trait]
impl<U> LoginService for TokenLoginService<U>
where
    U: UserDirectory,
{
    async fn authenticate(&self, token: &AccessToken) -> Result<UserId, Error> {
        let identity = self.verifier.verify(token.expose()).map_err(|err| {
            debug!(error = %err, "access token rejected");
            match err {
                AccessTokenError::Expired => Error::unauthorized("Session has expired."),
                AccessTokenError::Invalid { .. } => Error::unauthorized("Invalid access token."),
            }
        })?;

        if let Some(email) = identity.email {
            let contact = UserContact {
                id: identity.user_id.clone(),
                email,
                full_name: identity.full_name,
            };
            self.users
                .ensure_profile(&contact, self.clock.utc())
                .await
                .map_err(map_directory_error)?;
        }
        Ok(identity.user_id)
    }
}
