//! Web calendar "add event" links.

use url::{Url, form_urlencoded};

use super::format_utc_basic;
use crate::error::{ShowcaseError, ShowcaseResult};
use crate::event::CalendarEvent;

/// Google Calendar's event template endpoint
pub const DEFAULT_PROVIDER_URL: &str = "https://calendar.google.com/calendar/render";

/// Deep link into the default web calendar.
pub fn build_provider_url(event: &CalendarEvent) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(event_params(event))
        .finish();
    format!("{DEFAULT_PROVIDER_URL}?{query}")
}

/// Deep link against a configured provider endpoint.
///
/// Existing query parameters on `base` are kept; the event fields are
/// appended as `action`, `text`, `dates`, `details` and `location`.
pub fn build_provider_url_with(base: &Url, event: &CalendarEvent) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut().extend_pairs(event_params(event));
    url
}

fn event_params(event: &CalendarEvent) -> [(&'static str, String); 5] {
    let dates = format!(
        "{}/{}",
        format_utc_basic(&event.start_date),
        format_utc_basic(&event.end_date)
    );

    [
        ("action", "TEMPLATE".to_string()),
        ("text", event.title.clone()),
        ("dates", dates),
        ("details", event.description.clone()),
        ("location", event.location.display_location().to_string()),
    ]
}

/// Parse a configured provider endpoint.
pub fn parse_provider_base(raw: &str) -> ShowcaseResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| ShowcaseError::Config(format!("Invalid calendar_provider_url '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ShowcaseError::Config(format!(
            "calendar_provider_url '{raw}' cannot carry query parameters"
        )));
    }
    Ok(url)
}
