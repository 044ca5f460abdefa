//! iCalendar (RFC 5545) invite for the wedding, addressed to a single guest.
//!
//! The document is written line by line rather than through a calendar
//! library: parameter values such as the attendee `CN` must be backslash
//! escaped (not quoted), and lines are never folded.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use chrono::DateTime;
use chrono::Utc;

/// Used as organizer when no sender address is configured
pub const DEFAULT_ORGANIZER: &str = "wedding@example.com";

const ICS_TIMESTAMP: &str = "%Y%m%dT%H%M%SZ";
const CRLF: &str = "\r\n";

/// The (only) event. Times are UTC, already in iCalendar form.
pub struct WeddingEvent {
    pub product_id: &'static str,
    pub uid_domain: &'static str,
    pub summary: &'static str,
    pub location: &'static str,
    pub organizer_name: &'static str,
    pub starts_at: &'static str,
    pub ends_at: &'static str,
}

// 20 Dec 2025, 7 PM Cairo
pub const WEDDING: WeddingEvent = WeddingEvent {
    product_id: "-//Mahmoud & Sajda Wedding//EN",
    uid_domain: "wedding.mahmoud-sajda",
    summary: "Mahmoud & Sajda Wedding 💍",
    location: "Wedding Venue Name, Cairo, Egypt",
    organizer_name: "Mahmoud & Sajda",
    starts_at: "20251220T170000Z",
    ends_at: "20251220T210000Z",
};

impl WeddingEvent {
    fn description(
        &self,
        guest_name: &str,
    ) -> String {
        format!(
            "Join us to celebrate the wedding of Mahmoud Kamal El-Din and Sajda Abu Bakr! We \
             can't wait to see you, {guest_name}."
        )
    }
}

/// Breaks ties between invites generated within the same millisecond
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// `wedding-<email>-<millis>-<seq>@<domain>`; distinct for every call within
/// the process, even for the same guest.
fn unique_id(
    guest_email: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!(
        "wedding-{guest_email}-{}-{seq}@{}",
        generated_at.timestamp_millis(),
        WEDDING.uid_domain
    )
}

/// Escape TEXT values (RFC 5545 3.3.11): backslash, comma, semicolon, and line
/// breaks (as a literal `\n`).
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            // CRLF is a single line break
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Configured organizer address, or `DEFAULT_ORGANIZER`
pub fn organizer_or_default(configured: Option<&str>) -> &str {
    configured
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_ORGANIZER)
}

/// Render the wedding invite for one guest. `generated_at` becomes `DTSTAMP`
/// and seeds the `UID`.
///
/// Lines are CRLF-separated; there is no trailing CRLF after `END:VCALENDAR`.
pub fn build_invite(
    guest_name: &str,
    guest_email: &str,
    organizer_email: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", WEDDING.product_id),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:REQUEST".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", unique_id(guest_email, generated_at)),
        format!("DTSTAMP:{}", generated_at.format(ICS_TIMESTAMP)),
        format!("DTSTART:{}", WEDDING.starts_at),
        format!("DTEND:{}", WEDDING.ends_at),
        format!("SUMMARY:{}", escape_text(WEDDING.summary)),
        format!(
            "DESCRIPTION:{}",
            escape_text(&WEDDING.description(guest_name))
        ),
        format!("LOCATION:{}", escape_text(WEDDING.location)),
        format!(
            "ORGANIZER;CN={}:mailto:{organizer_email}",
            escape_text(WEDDING.organizer_name)
        ),
        format!(
            "ATTENDEE;CN={};RSVP=TRUE:mailto:{guest_email}",
            escape_text(guest_name)
        ),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    lines.join(CRLF)
}
