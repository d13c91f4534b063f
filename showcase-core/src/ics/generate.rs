//! ICS file generation.

use icalendar::{Calendar, Component, EventLike};

use super::format_utc_basic;
use crate::event::CalendarEvent;

const PRODID: &str = "-//Showcase//Event Export//EN";

/// Generate the `.ics` document for a single event.
///
/// Output depends only on the event, so identical events give
/// byte-identical files. Lines are CRLF terminated and folded at 75 octets.
pub fn build_file_payload(event: &CalendarEvent) -> String {
    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.summary(&normalize_newlines(&event.title));
    ics_event.add_property("DTSTART", format_utc_basic(&event.start_date));
    ics_event.add_property("DTEND", format_utc_basic(&event.end_date));
    ics_event.description(&normalize_newlines(&event.description));
    ics_event.location(&normalize_newlines(event.location.display_location()));

    cal.push(ics_event.done());
    let cal = cal.done();

    strip_ics_bloat(&cal.to_string())
}

/// Clean up icalendar output
/// - Replace PRODID with ours
/// - Remove CALSCALE:GREGORIAN (it's the default)
/// - Remove the generated DTSTAMP and UID, which change on every call
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" || line.starts_with("DTSTAMP:") || line.starts_with("UID:") {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// The TEXT escaper only knows `\n`; bare and paired carriage returns become one.
fn normalize_newlines(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\r', "\n")
}

/// Download name for an event.
///
/// Whitespace runs and path separators become a single hyphen, and leading
/// dots are dropped, so the name always stays inside the target directory.
pub fn file_name_for(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut in_gap = false;

    for c in title.chars() {
        if c.is_whitespace() || c == '/' || c == '\\' {
            if !in_gap {
                stem.push('-');
            }
            in_gap = true;
        } else {
            stem.push(c);
            in_gap = false;
        }
    }

    let stem = stem.trim_start_matches('.');
    if stem.is_empty() {
        return "event.ics".to_string();
    }
    format!("{stem}.ics")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::LocationDetail;
    use chrono::{TimeZone, Utc};
    use icalendar::parser::{read_calendar, unfold};

    fn make_test_event() -> CalendarEvent {
        CalendarEvent::new(
            "Demo Day".to_string(),
            "Line one\nLine two".to_string(),
            Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap(),
            LocationDetail::Physical {
                address: "1 Main St, Springfield".to_string(),
            },
        )
        .unwrap()
    }

    fn parsed_prop(ics: &str, name: &str) -> Option<String> {
        let unfolded = unfold(ics);
        let calendar = read_calendar(&unfolded).expect("Payload should parse");
        let vevent = calendar.components.iter().find(|c| c.name == "VEVENT")?;
        vevent.find_prop(name).map(|p| p.val.to_string())
    }

    #[test]
    fn test_payload_envelope() {
        let ics = build_file_payload(&make_test_event());

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"), "ICS:\n{}", ics);
        assert!(ics.ends_with("END:VCALENDAR\r\n"), "ICS:\n{}", ics);
        assert!(ics.contains("VERSION:2.0\r\n"));
        assert!(ics.contains("PRODID:-//Showcase//Event Export//EN\r\n"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
        assert_eq!(ics.matches("END:VEVENT").count(), 1);
        assert!(!ics.contains("CALSCALE"), "ICS:\n{}", ics);
        assert!(!ics.contains("\n\n"), "No blank lines expected");
        assert!(!ics.replace("\r\n", "").contains('\n'), "Every line ends in CRLF");
    }

    #[test]
    fn test_payload_fields() {
        let ics = build_file_payload(&make_test_event());

        assert!(ics.contains("SUMMARY:Demo Day\r\n"));
        assert!(ics.contains("DTSTART:20250615T100000Z\r\n"));
        assert!(ics.contains("DTEND:20250615T120000Z\r\n"));
        assert!(ics.contains("LOCATION:1 Main St\\, Springfield\r\n"));
    }

    #[test]
    fn test_description_newlines_escaped() {
        let mut event = make_test_event();
        event.description = "a\nb\r\nc\rd".to_string();
        let ics = build_file_payload(&event);

        let description = ics
            .lines()
            .find(|l| l.starts_with("DESCRIPTION:"))
            .expect("Should have DESCRIPTION line");
        assert_eq!(description, "DESCRIPTION:a\\nb\\nc\\nd");
    }

    #[test]
    fn test_special_characters_escaped() {
        let mut event = make_test_event();
        event.title = "Rust; Go, and C\\C++".to_string();
        let ics = build_file_payload(&event);

        assert!(ics.contains("SUMMARY:Rust\\; Go\\, and C\\\\C++\r\n"), "ICS:\n{}", ics);
        assert_eq!(parsed_prop(&ics, "SUMMARY").as_deref(), Some("Rust; Go, and C\\C++"));
    }

    #[test]
    fn test_virtual_location() {
        let mut event = make_test_event();
        event.location = LocationDetail::Virtual {
            link: "https://meet.example.com/x".to_string(),
        };
        let ics = build_file_payload(&event);
        assert!(ics.contains("LOCATION:Virtual Event\r\n"));
    }

    #[test]
    fn test_payload_is_deterministic() {
        let ics = build_file_payload(&make_test_event());
        assert_eq!(ics, build_file_payload(&make_test_event()));
        assert!(!ics.contains("DTSTAMP:"), "ICS:\n{}", ics);
        assert!(!ics.contains("UID:"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_payload_parses_as_calendar() {
        let ics = build_file_payload(&make_test_event());

        assert_eq!(parsed_prop(&ics, "SUMMARY").as_deref(), Some("Demo Day"));
        assert_eq!(parsed_prop(&ics, "DTSTART").as_deref(), Some("20250615T100000Z"));
        assert_eq!(parsed_prop(&ics, "DESCRIPTION").as_deref(), Some("Line one\nLine two"));
    }

    #[test]
    fn test_long_multibyte_description_is_folded() {
        let mut event = make_test_event();
        event.description = format!("{} {}", "a".repeat(150), "Café ☕ über straße ".repeat(12));
        let ics = build_file_payload(&event);

        for line in ics.split("\r\n") {
            assert!(line.len() <= 75, "Line of {} octets: {:?}", line.len(), line);
        }
        assert!(ics.contains("\r\n "), "Long description should be folded");

        // Folding never splits a character and unfolds back to the original
        assert_eq!(parsed_prop(&ics, "DESCRIPTION"), Some(event.description.clone()));
    }

    #[test]
    fn test_file_name_for() {
        assert_eq!(file_name_for("Demo Day"), "Demo-Day.ics");
        assert_eq!(file_name_for("Rust  \t Meetup 2025"), "Rust-Meetup-2025.ics");
        assert_eq!(file_name_for(" padded "), "-padded-.ics");
    }

    #[test]
    fn test_file_name_for_strips_path_components() {
        assert_eq!(file_name_for("../escaped"), "-escaped.ics");
        assert_eq!(file_name_for("/etc/passwd"), "-etc-passwd.ics");
        assert_eq!(file_name_for("a\\..\\b"), "a-..-b.ics");
        assert_eq!(file_name_for(".hidden talk"), "hidden-talk.ics");
        assert_eq!(file_name_for(".."), "event.ics");

        for title in ["../escaped", "/abs", "x/../../y", "..\\win"] {
            let name = file_name_for(title);
            assert!(!name.contains('/') && !name.contains('\\'), "{title} -> {name}");
            assert!(!name.starts_with('.'), "{title} -> {name}");
        }
    }
}
