//! Transactional email composition and best-effort delivery.
//!
//! Templates produce inline-styled HTML. Every user-supplied string passes
//! through [`escape_html`] before interpolation.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::warn;

use super::achievements::Badge;
use super::event::{Event, PH_UTC_OFFSET_HOURS};
use super::ports::{Mailer, MailerError};
use super::{ContactInquiry, UserContact};

/// Outbound email envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Address replies should go to.
    pub reply_to: Option<String>,
}

/// Escape text for safe interpolation into HTML.
///
/// # Examples
/// ```
/// use eventtara::domain::escape_html;
///
/// assert_eq!(escape_html("<b>Tom & \"Jerry\"</b>"), "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;");
/// ```
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render a peso amount, or `Free` for zero.
pub fn format_price(price: i32) -> String {
    if price <= 0 {
        return "Free".to_owned();
    }
    let digits = price.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("₱{grouped}")
}

/// Render an instant in Philippine time.
pub fn format_local_datetime(at: DateTime<Utc>) -> String {
    let local = at.naive_utc() + TimeDelta::hours(PH_UTC_OFFSET_HOURS);
    local.format("%A, %B %-d, %Y at %-I:%M %p").to_string()
}

fn layout(heading: &str, body: &str) -> String {
    format!(
        "<div style=\"font-family:Arial,Helvetica,sans-serif;max-width:560px;margin:0 auto;\
         padding:24px;color:#1f2937;\">\
         <h1 style=\"color:#166534;font-size:22px;margin:0 0 16px;\">{heading}</h1>\
         {body}\
         <p style=\"margin-top:32px;font-size:12px;color:#6b7280;\">EventTara &middot; \
         Adventures around the Philippines</p></div>"
    )
}

fn button(href: &str, label: &str) -> String {
    format!(
        "<p style=\"margin:24px 0;\"><a href=\"{href}\" style=\"background:#166534;color:#ffffff;\
         padding:12px 20px;border-radius:6px;text-decoration:none;\">{label}</a></p>"
    )
}

/// Composes templated emails and hands them to a [`Mailer`].
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    app_url: String,
}

impl Notifier {
    /// Create a notifier linking back to `app_url`.
    pub fn new(mailer: Arc<dyn Mailer>, app_url: impl Into<String>) -> Self {
        Self {
            mailer,
            app_url: app_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn event_url(&self, event: &Event) -> String {
        format!("{}/events/{}", self.app_url, event.id)
    }

    /// Booking confirmation for a participant.
    pub fn booking_confirmation(&self, recipient: &UserContact, event: &Event) -> EmailMessage {
        let body = format!(
            "<p>Hi {name},</p>\
             <p>Your spot for <strong>{title}</strong> is confirmed.</p>\
             <table style=\"border-collapse:collapse;\">\
             <tr><td style=\"padding:4px 12px 4px 0;color:#6b7280;\">When</td><td>{when}</td></tr>\
             <tr><td style=\"padding:4px 12px 4px 0;color:#6b7280;\">Where</td><td>{location}</td></tr>\
             <tr><td style=\"padding:4px 12px 4px 0;color:#6b7280;\">Fee</td><td>{price}</td></tr>\
             </table>\
             <p>Show your QR code to the organizer when you arrive.</p>{button}",
            name = escape_html(recipient.display_name()),
            title = escape_html(&event.title),
            when = format_local_datetime(event.starts_at),
            location = escape_html(&event.location),
            price = format_price(event.price),
            button = button(&self.event_url(event), "View event"),
        );
        EmailMessage {
            to: recipient.email.clone(),
            subject: format!("You're in: {}", event.title),
            html: layout("Booking confirmed", &body),
            reply_to: None,
        }
    }

    /// Payment rejection notice with the organizer's optional reason.
    pub fn payment_rejected(
        &self,
        recipient: &UserContact,
        event: &Event,
        reason: Option<&str>,
    ) -> EmailMessage {
        let reason = reason
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(|text| {
                format!(
                    "<p style=\"padding:12px;background:#fef2f2;border-left:4px solid #dc2626;\">\
                     {}</p>",
                    escape_html(text)
                )
            })
            .unwrap_or_default();
        let body = format!(
            "<p>Hi {name},</p>\
             <p>The organizer of <strong>{title}</strong> could not verify your payment.</p>\
             {reason}\
             <p>If you think this is a mistake, reach out to the organizer or book again with a \
             new proof of payment.</p>{button}",
            name = escape_html(recipient.display_name()),
            title = escape_html(&event.title),
            button = button(&self.event_url(event), "View event"),
        );
        EmailMessage {
            to: recipient.email.clone(),
            subject: format!("Payment not approved: {}", event.title),
            html: layout("Payment not approved", &body),
            reply_to: None,
        }
    }

    /// Badge award announcement.
    pub fn badge_awarded(&self, recipient: &UserContact, badge: &Badge) -> EmailMessage {
        let description = badge
            .description
            .as_deref()
            .map(|text| format!("<p style=\"color:#4b5563;\">{}</p>", escape_html(text)))
            .unwrap_or_default();
        let image = badge
            .image_url
            .as_deref()
            .map(|url| {
                format!(
                    "<img src=\"{}\" alt=\"\" width=\"96\" height=\"96\" style=\"display:block;\
                     margin:16px 0;\"/>",
                    escape_html(url)
                )
            })
            .unwrap_or_default();
        let body = format!(
            "<p>Hi {name},</p>\
             <p>You just earned the <strong>{title}</strong> badge!</p>{image}{description}{button}",
            name = escape_html(recipient.display_name()),
            title = escape_html(&badge.title),
            button = button(
                &format!("{}/profile/{}", self.app_url, recipient.id),
                "See your badges"
            ),
        );
        EmailMessage {
            to: recipient.email.clone(),
            subject: format!("New badge unlocked: {}", badge.title),
            html: layout("Badge unlocked", &body),
            reply_to: None,
        }
    }

    /// Contact form relay addressed to the team inbox.
    pub fn contact_inquiry(&self, inbox: &str, inquiry: &ContactInquiry) -> EmailMessage {
        let body = format!(
            "<p><strong>From:</strong> {name} &lt;{email}&gt;</p>\
             <p style=\"white-space:pre-wrap;\">{message}</p>",
            name = escape_html(inquiry.name()),
            email = escape_html(inquiry.email()),
            message = escape_html(inquiry.message()),
        );
        EmailMessage {
            to: inbox.to_owned(),
            subject: format!("Contact inquiry from {}", inquiry.name()),
            html: layout("New contact inquiry", &body),
            reply_to: Some(inquiry.email().to_owned()),
        }
    }

    /// Deliver a message, surfacing transport failures.
    pub async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        self.mailer.send(message).await
    }

    /// Deliver a message, logging and discarding failures.
    pub async fn send_best_effort(&self, message: &EmailMessage) {
        if let Err(err) = self.mailer.send(message).await {
            warn!(subject = %message.subject, error = %err, "email delivery failed");
        }
    }
}
