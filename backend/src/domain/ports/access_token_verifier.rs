//! Port for verifying identity-provider access tokens.

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised while verifying an access token.
    pub enum AccessTokenError {
        /// Signature, audience or claims are invalid.
        Invalid { message: String } => "access token is invalid: {message}",
        /// The token has expired.
        Expired => "access token has expired",
    }
}

/// Identity claims extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Subject of the token.
    pub user_id: UserId,
    /// Email claim, when present.
    pub email: Option<String>,
    /// Display name from the user metadata, when present.
    pub full_name: Option<String>,
}

/// Port for turning a bearer token into a user identity.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokenVerifier: Send + Sync {
    /// Verify the token and return its identity claims.
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, AccessTokenError>;
}

/// Development verifier that accepts a bare user UUID as the token.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccessTokenVerifier;

impl AccessTokenVerifier for FixtureAccessTokenVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, AccessTokenError> {
        let user_id =
            UserId::new(token.trim()).map_err(|err| AccessTokenError::invalid(err.to_string()))?;
        Ok(VerifiedIdentity {
            user_id,
            email: None,
            full_name: None,
        })
    }
}
