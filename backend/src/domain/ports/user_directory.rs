//! Port for reading user contact details.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{UserContact, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "user directory query failed: {message}",
    }
}

/// Port for resolving users to contact details.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Contact details for a user, if the profile exists.
    async fn find_contact(&self, user_id: &UserId)
    -> Result<Option<UserContact>, UserDirectoryError>;

    /// Create a profile row for a user seen for the first time.
    async fn ensure_profile(
        &self,
        contact: &UserContact,
        signed_up_at: DateTime<Utc>,
    ) -> Result<(), UserDirectoryError>;
}

/// Fixture directory that knows every user under a placeholder address.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn find_contact(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserContact>, UserDirectoryError> {
        Ok(Some(UserContact {
            id: user_id.clone(),
            email: format!("{user_id}@users.eventtara.invalid"),
            full_name: None,
        }))
    }

    async fn ensure_profile(
        &self,
        _contact: &UserContact,
        _signed_up_at: DateTime<Utc>,
    ) -> Result<(), UserDirectoryError> {
        Ok(())
    }
}
