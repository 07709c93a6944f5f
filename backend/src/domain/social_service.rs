//! Social graph and feed interaction service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{
    CommentPayload, SocialCommand, SocialQuery, SocialRepository, SocialRepositoryError,
    UserDirectory,
};
use crate::domain::repository_errors::{map_directory_error, map_social_error};
use crate::domain::{Comment, Error, Reaction, ReactionKind, UserId};

/// Map a write failure, turning unique violations into `conflict(message)`.
fn conflict_or(message: &'static str) -> impl Fn(SocialRepositoryError) -> Error {
    move |err| match err {
        SocialRepositoryError::Duplicate => Error::conflict(message),
        other => map_social_error(other),
    }
}

/// Social service implementing the social command and query ports.
#[derive(Clone)]
pub struct SocialService<S, U> {
    social: Arc<S>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<S, U> SocialService<S, U> {
    /// Create a new social service.
    pub fn new(social: Arc<S>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            social,
            users,
            clock,
        }
    }
}

#[async_trait]
impl<S, U> SocialCommand for SocialService<S, U>
where
    S: SocialRepository,
    U: UserDirectory,
{
    async fn follow(&self, follower: &UserId, target: &UserId) -> Result<(), Error> {
        if follower == target {
            return Err(Error::invalid_request("You cannot follow yourself."));
        }
        self.users
            .find_contact(target)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found("User not found."))?;

        self.social
            .insert_follow(follower, target, self.clock.utc())
            .await
            .map_err(conflict_or("Already following this user."))
    }

    async fn unfollow(&self, follower: &UserId, target: &UserId) -> Result<(), Error> {
        let removed = self
            .social
            .delete_follow(follower, target)
            .await
            .map_err(map_social_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found("You are not following this user."))
        }
    }

    async fn react(
        &self,
        user_id: &UserId,
        activity_id: &Uuid,
        kind: ReactionKind,
    ) -> Result<(), Error> {
        let reaction = Reaction {
            user_id: user_id.clone(),
            activity_id: *activity_id,
            kind,
            created_at: self.clock.utc(),
        };
        self.social
            .insert_reaction(&reaction)
            .await
            .map_err(conflict_or("You have already reacted to this activity."))
    }

    async fn unreact(&self, user_id: &UserId, activity_id: &Uuid) -> Result<(), Error> {
        let removed = self
            .social
            .delete_reaction(user_id, activity_id)
            .await
            .map_err(map_social_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found("Reaction not found."))
        }
    }

    async fn add_comment(
        &self,
        user_id: &UserId,
        activity_id: &Uuid,
        body: String,
    ) -> Result<CommentPayload, Error> {
        let comment = Comment::new(*activity_id, user_id.clone(), &body, self.clock.utc())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.social
            .insert_comment(&comment)
            .await
            .map_err(map_social_error)?;
        Ok(CommentPayload::from(comment))
    }

    async fn delete_comment(&self, user_id: &UserId, comment_id: &Uuid) -> Result<(), Error> {
        let comment = self
            .social
            .find_comment(comment_id)
            .await
            .map_err(map_social_error)?
            .ok_or_else(|| Error::not_found("Comment not found."))?;
        if &comment.user_id != user_id {
            return Err(Error::forbidden("You can only delete your own comments."));
        }
        let removed = self
            .social
            .delete_comment(comment_id)
            .await
            .map_err(map_social_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found("Comment not found."))
        }
    }
}

#[async_trait]
impl<S, U> SocialQuery for SocialService<S, U>
where
    S: SocialRepository,
    U: UserDirectory,
{
    async fn list_comments(&self, activity_id: &Uuid) -> Result<Vec<CommentPayload>, Error> {
        let comments = self
            .social
            .list_comments(activity_id)
            .await
            .map_err(map_social_error)?;
        Ok(comments.into_iter().map(CommentPayload::from).collect())
    }
}

#[cfg(test)]
#[path = "social_service_tests.rs"]
mod tests;
