//! HS256 verification of Supabase access tokens.
//!
//! Tokens must carry `aud = "authenticated"`, a future `exp` and a UUID `sub`.
//! Email and `user_metadata.full_name` are optional.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::UserId;
use crate::domain::ports::{AccessTokenError, AccessTokenVerifier, VerifiedIdentity};

const AUDIENCE: &str = "authenticated";

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
}

/// Verifies tokens signed with the project's shared JWT secret.
pub struct JwtAccessTokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAccessTokenVerifier {
    /// Build a verifier for `secret`. The secret buffer is wiped on drop.
    pub fn new(secret: Zeroizing<String>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[AUDIENCE]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl AccessTokenVerifier for JwtAccessTokenVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, AccessTokenError> {
        let data = decode::<Claims>(token.trim(), &self.key, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => AccessTokenError::expired(),
                _ => AccessTokenError::invalid(err.to_string()),
            }
        })?;
        let claims = data.claims;
        let user_id = UserId::new(&claims.sub)
            .map_err(|err| AccessTokenError::invalid(format!("sub: {err}")))?;
        Ok(VerifiedIdentity {
            user_id,
            email: claims.email.filter(|email| !email.trim().is_empty()),
            full_name: claims
                .user_metadata
                .full_name
                .map(|name| name.trim().to_owned())
                .filter(|name| !name.is_empty()),
        })
    }
}
