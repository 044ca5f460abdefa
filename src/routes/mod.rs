mod health_check;
mod rsvp;

pub use health_check::*;
pub use rsvp::*;
