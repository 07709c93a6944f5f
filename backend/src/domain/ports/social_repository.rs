//! Port for follows, reactions and comments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Comment, Reaction, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by social repository adapters.
    pub enum SocialRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "social repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "social repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Duplicate => "social record already exists",
    }
}

/// Port for the social graph and feed interactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialRepository: Send + Sync {
    /// Record that `follower` follows `following`.
    async fn insert_follow(
        &self,
        follower: &UserId,
        following: &UserId,
        created_at: DateTime<Utc>,
    ) -> Result<(), SocialRepositoryError>;

    /// Remove a follow; returns whether one existed.
    async fn delete_follow(
        &self,
        follower: &UserId,
        following: &UserId,
    ) -> Result<bool, SocialRepositoryError>;

    /// Record a reaction.
    async fn insert_reaction(&self, reaction: &Reaction) -> Result<(), SocialRepositoryError>;

    /// Remove the user's reaction to an activity; returns whether one existed.
    async fn delete_reaction(
        &self,
        user_id: &UserId,
        activity_id: &Uuid,
    ) -> Result<bool, SocialRepositoryError>;

    /// Record a comment.
    async fn insert_comment(&self, comment: &Comment) -> Result<(), SocialRepositoryError>;

    /// Find a comment by id.
    async fn find_comment(&self, comment_id: &Uuid)
    -> Result<Option<Comment>, SocialRepositoryError>;

    /// Delete a comment; returns whether it existed.
    async fn delete_comment(&self, comment_id: &Uuid) -> Result<bool, SocialRepositoryError>;

    /// Comments on an activity, oldest first.
    async fn list_comments(&self, activity_id: &Uuid)
    -> Result<Vec<Comment>, SocialRepositoryError>;
}

/// Fixture implementation for running without a database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSocialRepository;

#[async_trait]
impl SocialRepository for FixtureSocialRepository {
    async fn insert_follow(
        &self,
        _follower: &UserId,
        _following: &UserId,
        _created_at: DateTime<Utc>,
    ) -> Result<(), SocialRepositoryError> {
        Ok(())
    }

    async fn delete_follow(
        &self,
        _follower: &UserId,
        _following: &UserId,
    ) -> Result<bool, SocialRepositoryError> {
        Ok(false)
    }

    async fn insert_reaction(&self, _reaction: &Reaction) -> Result<(), SocialRepositoryError> {
        Ok(())
    }

    async fn delete_reaction(
        &self,
        _user_id: &UserId,
        _activity_id: &Uuid,
    ) -> Result<bool, SocialRepositoryError> {
        Ok(false)
    }

    async fn insert_comment(&self, _comment: &Comment) -> Result<(), SocialRepositoryError> {
        Ok(())
    }

    async fn find_comment(
        &self,
        _comment_id: &Uuid,
    ) -> Result<Option<Comment>, SocialRepositoryError> {
        Ok(None)
    }

    async fn delete_comment(&self, _comment_id: &Uuid) -> Result<bool, SocialRepositoryError> {
        Ok(false)
    }

    async fn list_comments(
        &self,
        _activity_id: &Uuid,
    ) -> Result<Vec<Comment>, SocialRepositoryError> {
        Ok(Vec::new())
    }
}
