//! Session bridge between identity-provider tokens and cookie sessions.
//!
//! ```text
//! POST /api/v1/session {"accessToken":"<jwt>"}
//! DELETE /api/v1/session
//! ```

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{AccessToken, AccessTokenValidationError, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/session`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequestBody {
    /// Access token issued by the identity provider.
    pub access_token: String,
}

/// Response body for a newly established session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponseBody {
    #[schema(format = "uuid")]
    pub user_id: String,
}

fn map_token_validation_error(err: AccessTokenValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "accessToken", "code": "invalid_access_token" }))
}

/// Exchange an access token for a session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/session",
    request_body = CreateSessionRequestBody,
    responses(
        (status = 200, description = "Session established", body = SessionResponseBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Token rejected", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "createSession",
    security([])
)]
#[post("/session")]
pub async fn create_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateSessionRequestBody>,
) -> ApiResult<web::Json<SessionResponseBody>> {
    let token =
        AccessToken::new(&payload.into_inner().access_token).map_err(map_token_validation_error)?;
    let user_id = state.login.authenticate(&token).await?;
    session.persist_user(&user_id)?;
    info!(user_id = %user_id, "session established");
    Ok(web::Json(SessionResponseBody {
        user_id: user_id.to_string(),
    }))
}

/// Log out by discarding the session cookie.
#[utoipa::path(
    delete,
    path = "/api/v1/session",
    responses((status = 204, description = "Session cleared")),
    tags = ["session"],
    operation_id = "deleteSession"
)]
#[delete("/session")]
pub async fn delete_session(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
