//! Contact form HTTP handler.
//!
//! ```text
//! POST /api/v1/contact {"name":"Bea","email":"bea@example.ph","message":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ContactRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Inquiry submitted from the public contact page.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequestBody {
    pub name: String,
    #[schema(format = "email")]
    pub email: String,
    /// Between 10 and 5000 characters.
    pub message: String,
}

impl From<ContactRequestBody> for ContactRequest {
    fn from(value: ContactRequestBody) -> Self {
        Self {
            name: value.name,
            email: value.email,
            message: value.message,
        }
    }
}

/// Relay a contact inquiry to the team inbox.
#[utoipa::path(
    post,
    path = "/api/v1/contact",
    request_body = ContactRequestBody,
    responses(
        (status = 202, description = "Inquiry sent"),
        (status = 400, description = "Invalid inquiry", body = ErrorSchema),
        (status = 503, description = "Mail transport unavailable", body = ErrorSchema)
    ),
    tags = ["contact"],
    operation_id = "submitContactInquiry",
    security([])
)]
#[post("/contact")]
pub async fn submit_contact(
    state: web::Data<HttpState>,
    payload: web::Json<ContactRequestBody>,
) -> ApiResult<HttpResponse> {
    state
        .contact
        .submit_inquiry(ContactRequest::from(payload.into_inner()))
        .await?;
    Ok(HttpResponse::Accepted().finish())
}
