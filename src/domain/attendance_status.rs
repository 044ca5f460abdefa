/// Whether the guest is coming. On the wire: `"coming"` or `"have_fun"` (the
/// latter being the form's "can't make it, have fun" button).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Coming,
    HaveFun,
}

impl AttendanceStatus {
    pub fn is_coming(&self) -> bool { matches!(self, Self::Coming) }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coming => "coming",
            Self::HaveFun => "have_fun",
        }
    }
}

impl TryFrom<String> for AttendanceStatus {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim() {
            "coming" => Ok(Self::Coming),
            "have_fun" => Ok(Self::HaveFun),
            s => Err(format!("Invalid status: {s:?}")),
        }
    }
}
