use super::AttendanceStatus;
use super::GuestEmail;
use super::GuestMessage;
use super::GuestName;

/// A parsed RSVP. Lives for a single request; nothing is persisted.
#[derive(Debug, Clone)]
pub struct RsvpSubmission {
    pub name: GuestName,
    pub email: GuestEmail,
    pub status: AttendanceStatus,
    pub message: GuestMessage,
}
