//! Reqwest-backed Resend mailer.
//!
//! The adapter owns transport details only: payload serialisation, bearer
//! authentication and HTTP status mapping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::EmailMessage;
use crate::domain::ports::{Mailer, MailerError};

const DEFAULT_ENDPOINT: &str = "https://api.resend.com/emails";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Resend credentials and sender identity.
pub struct ResendConfig {
    /// API key sent as a bearer token.
    pub api_key: Zeroizing<String>,
    /// `From` header, e.g. `EventTara <noreply@eventtara.com>`.
    pub sender: String,
    /// Emails endpoint; defaults to the public Resend API.
    pub endpoint: Option<Url>,
    /// Whole-request timeout.
    pub timeout: Option<Duration>,
}

/// Mailer that posts each message to Resend.
pub struct ResendMailer {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
    sender: String,
}

impl ResendMailer {
    /// Build the mailer and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Transport`] when the endpoint is malformed or
    /// the client cannot be constructed.
    pub fn new(config: ResendConfig) -> Result<Self, MailerError> {
        let endpoint = match config.endpoint {
            Some(endpoint) => endpoint,
            None => Url::parse(DEFAULT_ENDPOINT)
                .map_err(|err| MailerError::transport(format!("invalid endpoint: {err}")))?,
        };
        let client = Client::builder()
            .timeout(config.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|err| MailerError::transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
            sender: config.sender,
        })
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

impl<'a> SendEmailRequest<'a> {
    fn new(sender: &'a str, message: &'a EmailMessage) -> Self {
        Self {
            from: sender,
            to: [message.to.as_str()],
            subject: &message.subject,
            html: &message.html,
            reply_to: message.reply_to.as_deref(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.as_str())
            .json(&SendEmailRequest::new(&self.sender, message))
            .send()
            .await
            .map_err(|err| MailerError::transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| MailerError::transport(err.to_string()))?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MailerError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let preview: String = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_CHAR_LIMIT)
        .collect();
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        MailerError::transport(format!("status {}: {preview}", status.as_u16()))
    } else {
        MailerError::rejected(status.as_u16(), preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn payload_wraps_recipient_and_omits_missing_reply_to() {
        let message = EmailMessage {
            to: "juan@example.ph".to_owned(),
            subject: "Booking confirmed".to_owned(),
            html: "<p>Hi</p>".to_owned(),
            reply_to: None,
        };
        let payload = serde_json::to_value(SendEmailRequest::new(
            "EventTara <noreply@eventtara.com>",
            &message,
        ))
        .expect("payload serialises");

        assert_eq!(
            payload,
            json!({
                "from": "EventTara <noreply@eventtara.com>",
                "to": ["juan@example.ph"],
                "subject": "Booking confirmed",
                "html": "<p>Hi</p>"
            })
        );
    }

    #[rstest]
    fn payload_carries_reply_to() {
        let message = EmailMessage {
            to: "team@eventtara.com".to_owned(),
            subject: "Contact".to_owned(),
            html: String::new(),
            reply_to: Some("bea@example.ph".to_owned()),
        };
        let payload = serde_json::to_value(SendEmailRequest::new("noreply@eventtara.com", &message))
            .expect("payload serialises");
        assert_eq!(payload["reply_to"], "bea@example.ph");
    }

    #[rstest]
    #[case(StatusCode::UNPROCESSABLE_ENTITY, true)]
    #[case(StatusCode::FORBIDDEN, true)]
    #[case(StatusCode::TOO_MANY_REQUESTS, false)]
    #[case(StatusCode::BAD_GATEWAY, false)]
    fn status_mapping(#[case] status: StatusCode, #[case] rejected: bool) {
        let error = map_status_error(status, b"{\"message\": \"invalid `to` field\"}");
        assert_eq!(matches!(error, MailerError::Rejected { .. }), rejected);
        assert!(error.to_string().contains(&status.as_u16().to_string()));
    }

    #[rstest]
    fn builds_with_default_endpoint() {
        let mailer = ResendMailer::new(ResendConfig {
            api_key: Zeroizing::new("re_test".to_owned()),
            sender: "noreply@eventtara.com".to_owned(),
            endpoint: None,
            timeout: None,
        })
        .expect("mailer builds");
        assert_eq!(mailer.endpoint.as_str(), DEFAULT_ENDPOINT);
    }
}
