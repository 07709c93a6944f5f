//! Driving port for follows, reactions and comments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Comment, Error, ReactionKind, UserId};

/// Serializable comment payload for driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPayload {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub user_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentPayload {
    fn from(value: Comment) -> Self {
        Self {
            id: value.id,
            activity_id: value.activity_id,
            user_id: value.user_id,
            body: value.body,
            created_at: value.created_at,
        }
    }
}

/// Driving port for social write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialCommand: Send + Sync {
    /// Follow another user.
    async fn follow(&self, follower: &UserId, target: &UserId) -> Result<(), Error>;

    /// Stop following a user.
    async fn unfollow(&self, follower: &UserId, target: &UserId) -> Result<(), Error>;

    /// React to a feed activity.
    async fn react(
        &self,
        user_id: &UserId,
        activity_id: &Uuid,
        kind: ReactionKind,
    ) -> Result<(), Error>;

    /// Withdraw a reaction.
    async fn unreact(&self, user_id: &UserId, activity_id: &Uuid) -> Result<(), Error>;

    /// Comment on a feed activity.
    async fn add_comment(
        &self,
        user_id: &UserId,
        activity_id: &Uuid,
        body: String,
    ) -> Result<CommentPayload, Error>;

    /// Delete one of the caller's comments.
    async fn delete_comment(&self, user_id: &UserId, comment_id: &Uuid) -> Result<(), Error>;
}
