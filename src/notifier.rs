use std::fmt::Debug;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use crate::calendar;
use crate::domain::AttendanceStatus;
use crate::domain::RsvpSubmission;
use crate::email_client::Attachment;
use crate::email_client::MailRelay;
use crate::email_client::OutboundEmail;
use crate::email_client::RelayError;
use crate::utils::error_chain_fmt;

pub const INVITE_FILENAME: &str = "wedding.ics";
pub const INVITE_CONTENT_TYPE: &str = "text/calendar; charset=utf-8; method=REQUEST";

#[derive(thiserror::Error)]
pub enum NotifyError {
    #[error("Could not dispatch RSVP email")]
    Dispatch(#[from] RelayError),
}

impl Debug for NotifyError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Turns an RSVP into exactly one email to the guest, with the calendar invite
/// attached iff they are coming.
///
/// Holds no per-request state; a single instance is shared by all workers.
pub struct RsvpNotifier {
    relay: Arc<dyn MailRelay>,
    organizer: String,
}

impl RsvpNotifier {
    /// `organizer` is the address put in the invite's `ORGANIZER`; falls back
    /// to `calendar::DEFAULT_ORGANIZER`
    pub fn new(
        relay: Arc<dyn MailRelay>,
        organizer: Option<&str>,
    ) -> Self {
        Self {
            relay,
            organizer: calendar::organizer_or_default(organizer).to_string(),
        }
    }

    /// Build the email without sending it. `now` feeds the invite's `DTSTAMP`
    /// and `UID`.
    pub fn compose(
        &self,
        rsvp: &RsvpSubmission,
        now: DateTime<Utc>,
    ) -> OutboundEmail {
        let name = rsvp.name.as_ref();

        let attachment = rsvp.status.is_coming().then(|| Attachment {
            filename: INVITE_FILENAME.to_string(),
            content: calendar::build_invite(name, rsvp.email.as_ref(), &self.organizer, now),
            content_type: INVITE_CONTENT_TYPE.to_string(),
        });

        OutboundEmail {
            recipient: rsvp.email.clone(),
            subject: subject(rsvp.status).to_string(),
            text_body: text_body(name, rsvp.status),
            html_body: html_body(name, rsvp.status, rsvp.message.as_deref()),
            attachment,
        }
    }

    /// Compose and send. A single attempt; the caller only learns whether the
    /// relay accepted the message.
    #[tracing::instrument(
        name = "Notifying guest",
        skip(self, rsvp),
        fields(
            guest_email = %rsvp.email.as_ref(),
            status = rsvp.status.as_str(),
        )
    )]
    pub async fn notify(
        &self,
        rsvp: &RsvpSubmission,
    ) -> Result<(), NotifyError> {
        let email = self.compose(rsvp, Utc::now());
        self.relay.send(&email).await?;
        Ok(())
    }
}

fn subject(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Coming => "🎉 Thank you for confirming – Mahmoud & Sajda Wedding",
        AttendanceStatus::HaveFun => "❤️ Thank you – we’ll miss you at the wedding",
    }
}

fn text_body(
    name: &str,
    status: AttendanceStatus,
) -> String {
    match status {
        AttendanceStatus::Coming => format!(
            r#"Dear {name},

Thank you for confirming that you'll join our wedding!

We added a calendar event for you – please find it attached.

We can't wait to see you there!

Best,
Mahmoud & Sajda"#
        ),
        AttendanceStatus::HaveFun => format!(
            r#"Dear {name},

Thank you for your wishes!

We’re sad you can’t join, but we really appreciate your love and message.

Best,
Mahmoud & Sajda"#
        ),
    }
}

/// Guest text is html-escaped before going into the markup; newlines in the
/// message become `<br/>`.
fn html_body(
    name: &str,
    status: AttendanceStatus,
    message: Option<&str>,
) -> String {
    let name = htmlescape::encode_minimal(name);
    let (thanks, calendar_hint) = match status {
        AttendanceStatus::Coming => (
            "Thank you for confirming that you'll join our wedding! 🎉",
            "<p>You’ll find a calendar event attached so you can save the date easily.</p>",
        ),
        AttendanceStatus::HaveFun => ("Thank you for your lovely message and wishes ❤️", ""),
    };
    let message = match message {
        Some(m) => htmlescape::encode_minimal(m)
            .replace("\r\n", "\n")
            .replace('\n', "<br/>"),
        None => "<i>No message provided.</i>".to_string(),
    };

    format!(
        r#"<p>Dear {name},</p>
<p>{thanks}</p>
{calendar_hint}
<p>Your message to us:</p>
<blockquote style="border-left: 4px solid #f472b6; padding-left: 8px; color: #555;">
  {message}
</blockquote>
<p>With love,<br/>Mahmoud &amp; Sajda</p>
"#
    )
}
