//! Driving port for social reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Error;

use super::CommentPayload;

/// Driving port for social read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialQuery: Send + Sync {
    /// Comments on a feed activity, oldest first.
    async fn list_comments(&self, activity_id: &Uuid) -> Result<Vec<CommentPayload>, Error>;
}
