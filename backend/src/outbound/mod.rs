//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **email**: Resend HTTP mailer and a logging fallback
//! - **auth**: Supabase access token verification
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod auth;
pub mod email;
pub mod persistence;
