//! PostgreSQL-backed `SocialRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{SocialRepository, SocialRepositoryError};
use crate::domain::{Comment, Reaction, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CommentRow, FollowRow, ReactionRow};
use super::pool::DbPool;
use super::schema::{feed_comments, feed_reactions, user_follows};

/// Diesel-backed implementation of the social repository port.
#[derive(Clone)]
pub struct DieselSocialRepository {
    pool: DbPool,
}

impl DieselSocialRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SocialRepository for DieselSocialRepository {
    async fn insert_follow(
        &self,
        follower: &UserId,
        following: &UserId,
        created_at: DateTime<Utc>,
    ) -> Result<(), SocialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(user_follows::table)
            .values(FollowRow {
                follower_id: *follower.as_uuid(),
                following_id: *following.as_uuid(),
                created_at,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete_follow(
        &self,
        follower: &UserId,
        following: &UserId,
    ) -> Result<bool, SocialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(
            user_follows::table
                .filter(user_follows::follower_id.eq(follower.as_uuid()))
                .filter(user_follows::following_id.eq(following.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map(|deleted| deleted > 0)
        .map_err(map_diesel_error)
    }

    async fn insert_reaction(&self, reaction: &Reaction) -> Result<(), SocialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(feed_reactions::table)
            .values(ReactionRow::from(reaction))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete_reaction(
        &self,
        user_id: &UserId,
        activity_id: &Uuid,
    ) -> Result<bool, SocialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(
            feed_reactions::table
                .filter(feed_reactions::user_id.eq(user_id.as_uuid()))
                .filter(feed_reactions::activity_id.eq(activity_id)),
        )
        .execute(&mut conn)
        .await
        .map(|deleted| deleted > 0)
        .map_err(map_diesel_error)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), SocialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(feed_comments::table)
            .values(CommentRow::from(comment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_comment(
        &self,
        comment_id: &Uuid,
    ) -> Result<Option<Comment>, SocialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        feed_comments::table
            .filter(feed_comments::id.eq(comment_id))
            .select(CommentRow::as_select())
            .first::<CommentRow>(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Comment::from))
            .map_err(map_diesel_error)
    }

    async fn delete_comment(&self, comment_id: &Uuid) -> Result<bool, SocialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(feed_comments::table.filter(feed_comments::id.eq(comment_id)))
            .execute(&mut conn)
            .await
            .map(|deleted| deleted > 0)
            .map_err(map_diesel_error)
    }

    async fn list_comments(
        &self,
        activity_id: &Uuid,
    ) -> Result<Vec<Comment>, SocialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CommentRow> = feed_comments::table
            .filter(feed_comments::activity_id.eq(activity_id))
            .order((feed_comments::created_at.asc(), feed_comments::id.asc()))
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
