use std::fmt::Debug;

use actix_web::error::InternalError;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::ResponseError;
use anyhow::Context;
use serde::Deserialize;
use serde_json::json;

use crate::domain::AttendanceStatus;
use crate::domain::GuestEmail;
use crate::domain::GuestMessage;
use crate::domain::GuestName;
use crate::domain::RsvpSubmission;
use crate::notifier::RsvpNotifier;
use crate::utils::error_chain_fmt;

/// Raw JSON body of `POST /api/rsvp`. Every field is optional here so that a
/// missing field goes through `RsvpError` like any other invalid input.
#[derive(Deserialize)]
pub struct RsvpForm {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl TryFrom<RsvpForm> for RsvpSubmission {
    type Error = String;
    fn try_from(value: RsvpForm) -> Result<Self, Self::Error> {
        let name = GuestName::parse(value.name.ok_or("Missing name")?)?;
        let email = GuestEmail::parse(value.email.ok_or("Missing email")?)?;
        let status = AttendanceStatus::try_from(value.status.ok_or("Missing status")?)?;
        let message = GuestMessage::parse(value.message);
        Ok(Self {
            name,
            email,
            status,
            message,
        })
    }
}

/// Only two outcomes are visible to the guest: bad input (400) or a generic
/// server error (500). Details stay in the logs.
#[derive(thiserror::Error)]
pub enum RsvpError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for RsvpError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for RsvpError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let msg = match self {
            Self::ValidationError(_) => "Invalid data",
            Self::UnexpectedError(_) => "Server error",
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": msg }))
    }
}

/// Registered via `web::JsonConfig`, so that a body that is not JSON at all
/// gets the same 400 as a JSON body with missing fields.
pub fn json_error_handler(
    err: JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    tracing::warn!(error.message = %err, "rejecting unparseable RSVP body");
    let resp = RsvpError::ValidationError(err.to_string()).error_response();
    InternalError::from_response(err, resp).into()
}

/// `POST /api/rsvp`
///
/// Parses the submission, then sends the guest a confirmation email (with the
/// calendar invite attached if they are coming).
///
/// # Request example
///
/// ```sh
///     curl -i -H 'Content-Type: application/json' \
///         -d '{"name":"Layla","email":"layla@example.com","status":"coming","message":"So happy for you!"}' \
///         http://127.0.0.1:8000/api/rsvp
/// ```
///
/// Responds `{"ok":true}`, `400 {"error":"Invalid data"}`, or
/// `500 {"error":"Server error"}`.
#[tracing::instrument(
    name = "Handling RSVP",
    skip(form, notifier),
    fields(
        guest_name = ?form.name,
        guest_email = ?form.email,
        status = ?form.status,
    )
)]
pub async fn rsvp(
    form: web::Json<RsvpForm>,
    notifier: web::Data<RsvpNotifier>,
) -> Result<HttpResponse, RsvpError> {
    let submission = RsvpSubmission::try_from(form.into_inner()).map_err(|e| {
        tracing::warn!(error.message = %e, "rejecting RSVP");
        RsvpError::ValidationError(e)
    })?;

    tracing::info!(
        has_message = submission.message.as_deref().is_some(),
        "RSVP received"
    );

    notifier
        .notify(&submission)
        .await
        .context("Failed to send RSVP confirmation")
        .map_err(|e| {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "RSVP failed"
            );
            RsvpError::UnexpectedError(e)
        })?;

    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}
