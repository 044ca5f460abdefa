/// Optional free-text note from the guest. Blank input counts as no message.
#[derive(Debug, Clone, Default)]
pub struct GuestMessage(Option<String>);

impl GuestMessage {
    pub fn parse(message: Option<String>) -> Self {
        Self(message.filter(|m| !m.trim().is_empty()))
    }

    pub fn as_deref(&self) -> Option<&str> { self.0.as_deref() }
}
