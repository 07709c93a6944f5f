//! Authentication primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when a session exchange payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessTokenValidationError {
    /// Token was missing or blank once trimmed.
    EmptyToken,
}

impl fmt::Display for AccessTokenValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyToken => write!(f, "access token must not be empty"),
        }
    }
}

impl std::error::Error for AccessTokenValidationError {}

/// Bearer token issued by the identity provider.
///
/// The token is wiped from memory on drop and never printed by `Debug`.
///
/// # Examples
/// ```
/// use eventtara::domain::AccessToken;
///
/// let token = AccessToken::new(" eyJhbGciOiJIUzI1NiJ9.e30.sig ").unwrap();
/// assert_eq!(token.expose(), "eyJhbGciOiJIUzI1NiJ9.e30.sig");
/// assert!(AccessToken::new("  ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Validate and wrap a raw token.
    pub fn new(raw: &str) -> Result<Self, AccessTokenValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AccessTokenValidationError::EmptyToken);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Borrow the raw token for verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}
