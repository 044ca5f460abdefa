use std::fmt::Debug;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Attachment as MimeAttachment;
use lettre::message::Mailbox;
use lettre::message::MultiPart;
use lettre::message::SinglePart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::Tls;
use lettre::transport::smtp::client::TlsParameters;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;
use secrecy::ExposeSecret;

use crate::configuration::EmailClientSettings;
use crate::domain::GuestEmail;
use crate::utils::error_chain_fmt;

/// A file attached to an `OutboundEmail`
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content: String,
    /// Full media type, parameters included (`text/calendar; method=REQUEST`)
    pub content_type: String,
}

/// Everything needed to send one message; the sender is the relay's concern.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub recipient: GuestEmail,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub attachment: Option<Attachment>,
}

#[derive(thiserror::Error)]
pub enum RelayError {
    #[error("Invalid relay configuration: {0}")]
    Configuration(String),
    #[error("Invalid address {0:?}")]
    Address(String, #[source] lettre::address::AddressError),
    #[error("Could not build message")]
    Message(#[source] lettre::error::Error),
    #[error("SMTP relay did not accept the message")]
    Transport(#[source] lettre::transport::smtp::Error),
    /// For relays that refuse a message without an SMTP exchange
    #[error("Relay rejected the message: {0}")]
    Rejected(String),
}

impl Debug for RelayError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Anything that can deliver an `OutboundEmail`. The success of `send` means
/// the relay accepted the message, nothing more.
#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn send(
        &self,
        email: &OutboundEmail,
    ) -> Result<(), RelayError>;
}

/// `MailRelay` over SMTP.
///
/// The transport is built on every `send` (there is at most one message per
/// request), so bad settings surface as a failed dispatch rather than a failed
/// startup.
pub struct SmtpRelay {
    settings: EmailClientSettings,
}

impl SmtpRelay {
    pub fn new(settings: EmailClientSettings) -> Self { Self { settings } }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, RelayError> {
        let host = self.settings.host.trim();
        if host.is_empty() {
            return Err(RelayError::Configuration("SMTP host is not set".to_string()));
        }

        let tls_params = TlsParameters::new(host.to_string()).map_err(RelayError::Transport)?;
        // 465 is implicit TLS (SMTPS), everything else negotiates STARTTLS
        let tls = match (self.settings.require_tls, self.settings.port) {
            (true, 465) => Tls::Wrapper(tls_params),
            (true, _) => Tls::Required(tls_params),
            (false, _) => Tls::Opportunistic(tls_params),
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(self.settings.port)
            .tls(tls)
            .timeout(Some(self.settings.timeout()));

        if let (Some(user), Some(pass)) = (&self.settings.username, &self.settings.password) {
            builder = builder.credentials(Credentials::new(
                user.clone(),
                pass.expose_secret().clone(),
            ));
        }

        Ok(builder.build())
    }

    fn sender(&self) -> Result<Mailbox, RelayError> {
        let sender = self
            .settings
            .sender_address()
            .ok_or_else(|| RelayError::Configuration("no sender address".to_string()))?;
        parse_mailbox(sender)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, RelayError> {
    address
        .parse()
        .map_err(|e| RelayError::Address(address.to_string(), e))
}

/// `multipart/alternative` (text + html), wrapped in `multipart/mixed` together
/// with the attachment when there is one.
fn build_message(
    from: Mailbox,
    email: &OutboundEmail,
) -> Result<Message, RelayError> {
    let to = parse_mailbox(email.recipient.as_ref())?;

    let body = MultiPart::alternative()
        .singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_PLAIN)
                .body(email.text_body.clone()),
        )
        .singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(email.html_body.clone()),
        );

    let builder = Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone());

    let message = match &email.attachment {
        Some(attachment) => {
            let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
                RelayError::Configuration(format!(
                    "bad attachment type {:?}: {e}",
                    attachment.content_type
                ))
            })?;
            builder.multipart(
                MultiPart::mixed().multipart(body).singlepart(
                    MimeAttachment::new(attachment.filename.clone())
                        .body(attachment.content.clone(), content_type),
                ),
            )
        }
        None => builder.multipart(body),
    };

    message.map_err(RelayError::Message)
}

#[async_trait]
impl MailRelay for SmtpRelay {
    #[tracing::instrument(
        name = "Relaying email over SMTP",
        skip(self, email),
        fields(
            relay_host = %self.settings.host,
            relay_port = self.settings.port,
            recipient = %email.recipient.as_ref(),
            attachment = email.attachment.is_some(),
        )
    )]
    async fn send(
        &self,
        email: &OutboundEmail,
    ) -> Result<(), RelayError> {
        let message = build_message(self.sender()?, email)?;
        let transport = self.transport()?;
        let response = transport
            .send(message)
            .await
            .map_err(RelayError::Transport)?;
        tracing::info!(code = %response.code(), "relay accepted message");
        Ok(())
    }
}
