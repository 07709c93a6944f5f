//! Follow, reaction and comment HTTP handlers.
//!
//! ```text
//! POST|DELETE /api/v1/users/{user_id}/follow
//! POST|DELETE /api/v1/activities/{activity_id}/reactions
//! GET|POST /api/v1/activities/{activity_id}/comments
//! DELETE /api/v1/comments/{comment_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::CommentPayload;
use crate::domain::{Error, ReactionKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::achievements::{UserPath, parse_path_user_id};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_enum, parse_uuid};

#[derive(Debug, Deserialize)]
struct ActivityPath {
    activity_id: String,
}

fn parse_activity_id(path: ActivityPath) -> Result<Uuid, Error> {
    parse_uuid(path.activity_id, FieldName::new("activityId"))
}

#[derive(Debug, Deserialize)]
struct CommentPath {
    comment_id: String,
}

/// Reaction to a feed activity.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReactRequestBody {
    #[schema(example = "fire")]
    pub kind: String,
}

/// New comment on a feed activity.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequestBody {
    pub body: String,
}

/// Stored comment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub activity_id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    pub body: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<CommentPayload> for CommentBody {
    fn from(value: CommentPayload) -> Self {
        Self {
            id: value.id.to_string(),
            activity_id: value.activity_id.to_string(),
            user_id: value.user_id.to_string(),
            body: value.body,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Comments on an activity, oldest first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsResponseBody {
    pub comments: Vec<CommentBody>,
}

/// Follow another user.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/follow",
    params(("user_id" = String, Path, description = "User to follow")),
    responses(
        (status = 204, description = "Following"),
        (status = 400, description = "Cannot follow yourself", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 409, description = "Already following", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "followUser",
    security(("SessionCookie" = []))
)]
#[post("/users/{user_id}/follow")]
pub async fn follow_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserPath>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    let target = parse_path_user_id(path.into_inner())?;
    state.social.follow(&follower, &target).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Stop following a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/follow",
    params(("user_id" = String, Path, description = "User to unfollow")),
    responses(
        (status = 204, description = "Unfollowed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not following", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "unfollowUser",
    security(("SessionCookie" = []))
)]
#[delete("/users/{user_id}/follow")]
pub async fn unfollow_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserPath>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    let target = parse_path_user_id(path.into_inner())?;
    state.social.unfollow(&follower, &target).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// React to a feed activity.
#[utoipa::path(
    post,
    path = "/api/v1/activities/{activity_id}/reactions",
    params(("activity_id" = String, Path, description = "Feed activity identifier")),
    request_body = ReactRequestBody,
    responses(
        (status = 204, description = "Reaction recorded"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Already reacted", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "reactToActivity",
    security(("SessionCookie" = []))
)]
#[post("/activities/{activity_id}/reactions")]
pub async fn react(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ActivityPath>,
    payload: web::Json<ReactRequestBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let activity_id = parse_activity_id(path.into_inner())?;
    let kind = parse_enum::<ReactionKind>(payload.into_inner().kind, FieldName::new("kind"))?;
    state.social.react(&user_id, &activity_id, kind).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Remove the caller's reaction from a feed activity.
#[utoipa::path(
    delete,
    path = "/api/v1/activities/{activity_id}/reactions",
    params(("activity_id" = String, Path, description = "Feed activity identifier")),
    responses(
        (status = 204, description = "Reaction removed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Reaction not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "removeReaction",
    security(("SessionCookie" = []))
)]
#[delete("/activities/{activity_id}/reactions")]
pub async fn unreact(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ActivityPath>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let activity_id = parse_activity_id(path.into_inner())?;
    state.social.unreact(&user_id, &activity_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List comments on a feed activity.
#[utoipa::path(
    get,
    path = "/api/v1/activities/{activity_id}/comments",
    params(("activity_id" = String, Path, description = "Feed activity identifier")),
    responses(
        (status = 200, description = "Comments", body = ListCommentsResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "listComments",
    security([])
)]
#[get("/activities/{activity_id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<ActivityPath>,
) -> ApiResult<web::Json<ListCommentsResponseBody>> {
    let activity_id = parse_activity_id(path.into_inner())?;
    let comments = state.social_query.list_comments(&activity_id).await?;
    Ok(web::Json(ListCommentsResponseBody {
        comments: comments.into_iter().map(CommentBody::from).collect(),
    }))
}

/// Comment on a feed activity.
#[utoipa::path(
    post,
    path = "/api/v1/activities/{activity_id}/comments",
    params(("activity_id" = String, Path, description = "Feed activity identifier")),
    request_body = AddCommentRequestBody,
    responses(
        (status = 200, description = "Comment stored", body = CommentBody),
        (status = 400, description = "Invalid comment", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "addComment",
    security(("SessionCookie" = []))
)]
#[post("/activities/{activity_id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ActivityPath>,
    payload: web::Json<AddCommentRequestBody>,
) -> ApiResult<web::Json<CommentBody>> {
    let user_id = session.require_user_id()?;
    let activity_id = parse_activity_id(path.into_inner())?;
    let comment = state
        .social
        .add_comment(&user_id, &activity_id, payload.into_inner().body)
        .await?;
    Ok(web::Json(CommentBody::from(comment)))
}

/// Delete one of the caller's comments.
#[utoipa::path(
    delete,
    path = "/api/v1/comments/{comment_id}",
    params(("comment_id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not your comment", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "deleteComment",
    security(("SessionCookie" = []))
)]
#[delete("/comments/{comment_id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CommentPath>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let comment_id = parse_uuid(path.into_inner().comment_id, FieldName::new("commentId"))?;
    state.social.delete_comment(&user_id, &comment_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "social_tests.rs"]
mod tests;
