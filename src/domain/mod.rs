mod attendance_status;
mod guest_email;
mod guest_message;
mod guest_name;
mod rsvp_submission;
// allow external `use` statements to skip `guest_name` etc
pub use attendance_status::AttendanceStatus;
pub use guest_email::GuestEmail;
pub use guest_message::GuestMessage;
pub use guest_name::GuestName;
pub use rsvp_submission::RsvpSubmission;
