//! Calendar-invite generation for completed bookings.
//!
//! A downstream consumer of the wizard's `submitted` signal: given a
//! completed booking, produce an RFC 5545 `VCALENDAR` text block suitable
//! for an `.ics` download, and a Google Calendar template URL for the "add
//! to calendar" affordance. Nothing is sent anywhere; generation is the
//! whole job.

use chrono::NaiveDate;

use crate::catalog::Course;
use crate::wizard::BookingRecord;

/// A calendar invite for one booked course.
#[derive(Debug, Clone)]
pub struct CalendarInvite {
    uid: String,
    title: String,
    details: String,
    /// First day, inclusive.
    start: NaiveDate,
    /// Day after the last day; all-day events use exclusive ends.
    end_exclusive: NaiveDate,
}

impl CalendarInvite {
    /// Build an invite for a course.
    pub fn for_course(course: &Course) -> Self {
        Self {
            uid: format!("{}@enrolla", course.id),
            title: course.title.clone(),
            details: format!("Course with {}", course.instructor),
            start: course.start_date,
            end_exclusive: course.end_date() + chrono::Duration::days(1),
        }
    }

    /// Build an invite for a completed booking, naming the attendee in the
    /// details when the booking collected one.
    pub fn for_booking(record: &BookingRecord) -> Self {
        let mut invite = Self::for_course(&record.course);
        if let Some(name) = record.field("name").filter(|n| !n.is_empty()) {
            invite.details = format!("{}, booked for {}", invite.details, name);
        }
        invite
    }

    /// The event title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Render the invite as an `.ics` document.
    ///
    /// All-day event with a `DATE` start and exclusive `DATE` end, CRLF line
    /// endings, and text fields escaped per RFC 5545.
    pub fn to_ics(&self) -> String {
        let lines = [
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//Enrolla//Booking//EN".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", self.uid),
            format!("DTSTART;VALUE=DATE:{}", self.start.format("%Y%m%d")),
            format!("DTEND;VALUE=DATE:{}", self.end_exclusive.format("%Y%m%d")),
            format!("SUMMARY:{}", escape_ics(&self.title)),
            format!("DESCRIPTION:{}", escape_ics(&self.details)),
            "END:VEVENT".to_string(),
            "END:VCALENDAR".to_string(),
        ];
        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }

    /// The Google Calendar "render template" URL for this invite.
    pub fn google_calendar_url(&self) -> String {
        format!(
            "https://calendar.google.com/calendar/render?action=TEMPLATE&text={}&details={}&dates={}/{}",
            percent_encode(&self.title),
            percent_encode(&self.details),
            self.start.format("%Y%m%d"),
            self.end_exclusive.format("%Y%m%d"),
        )
    }
}

/// Escape RFC 5545 TEXT values: backslash, semicolon, comma, newline.
fn escape_ics(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Minimal query-component percent encoding: unreserved characters pass,
/// everything else becomes `%XX` per UTF-8 byte.
fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_fixtures::sample_catalog;
    use crate::wizard::summary;
    use std::collections::HashMap;

    #[test]
    fn test_ics_document_shape() {
        let catalog = sample_catalog();
        let invite = CalendarInvite::for_course(catalog.get("design-systems").unwrap());
        let ics = invite.to_ics();

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert!(ics.contains("UID:design-systems@enrolla\r\n"));
        assert!(ics.contains("DTSTART;VALUE=DATE:20251215\r\n"));
        // Two-day course: exclusive end lands on the 17th.
        assert!(ics.contains("DTEND;VALUE=DATE:20251217\r\n"));
        assert!(ics.contains("SUMMARY:Design Systems Fundamentals\r\n"));
    }

    #[test]
    fn test_ics_escapes_text_fields() {
        let catalog = sample_catalog();
        let mut course = catalog.get("design-systems").unwrap().clone();
        course.title = "Design; Systems, Intro".to_string();
        let ics = CalendarInvite::for_course(&course).to_ics();
        assert!(ics.contains("SUMMARY:Design\\; Systems\\, Intro\r\n"));
    }

    #[test]
    fn test_google_url_encodes_query_values() {
        let catalog = sample_catalog();
        let invite = CalendarInvite::for_course(catalog.get("advanced-react").unwrap());
        let url = invite.google_calendar_url();

        assert!(url.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE"));
        assert!(url.contains("text=Advanced%20React%20Patterns"));
        assert!(url.contains("&dates=20251220/20251222"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_booking_invite_names_the_attendee() {
        let catalog = sample_catalog();
        let course = catalog.get("design-systems").unwrap().clone();
        let fields = vec![("name".to_string(), "Ada Lovelace".to_string())];
        let rows = summary::project(&course, &[], &HashMap::new());
        let record = BookingRecord {
            course,
            fields,
            rows,
        };

        let invite = CalendarInvite::for_booking(&record);
        assert!(invite.to_ics().contains("booked for Ada Lovelace"));
    }
}
