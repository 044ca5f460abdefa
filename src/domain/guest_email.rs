use lettre::message::Mailbox;
use validator::ValidateEmail;

/// Parsed email address; used for the guest (recipient) only. The sender comes
/// from configuration and is parsed by the relay.
///
/// Must also be accepted by the SMTP relay's own address parser, which is
/// stricter than `validator` (no `a..b@`, no `[1.2.3.4]` domains).
#[derive(Debug, Clone)]
pub struct GuestEmail(String);

impl GuestEmail {
    pub fn parse(email: String) -> Result<Self, String> {
        let email = email.trim().to_string();
        let deliverable = email.parse::<Mailbox>().is_ok();
        match ValidateEmail::validate_email(&email) && deliverable {
            true => Ok(Self(email)),
            false => Err(format!("Invalid email: {email:?}")),
        }
    }
}

impl AsRef<str> for GuestEmail {
    fn as_ref(&self) -> &str { &self.0 }
}
