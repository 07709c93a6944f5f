//! Driving port for booking reads.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

use super::BookingPayload;

/// Driving port for booking read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// The user's bookings, newest first.
    async fn list_bookings(&self, user_id: &UserId) -> Result<Vec<BookingPayload>, Error>;
}
