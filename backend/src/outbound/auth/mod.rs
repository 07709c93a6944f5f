//! Identity-provider token adapters.

mod jwt;

pub use jwt::JwtAccessTokenVerifier;
