/// Guest name as typed into the RSVP form: anything but empty/whitespace. The
/// calendar and email renderers escape it for their own formats.
///
/// Must be instantiated with `GuestName::parse`.
#[derive(Debug, Clone)]
pub struct GuestName(String);

impl GuestName {
    pub fn parse(name: String) -> Result<Self, String> {
        let name = name.trim().to_string();
        match name.is_empty() {
            false => Ok(Self(name)),
            true => Err("Invalid name: empty".to_string()),
        }
    }
}

impl AsRef<str> for GuestName {
    fn as_ref(&self) -> &str { &self.0 }
}
