//! Calendar exports.
//!
//! An event can leave the site two ways: as a deep link that pre-fills a
//! web calendar's "new event" form, or as an RFC 5545 `.ics` payload for
//! desktop and mobile calendar apps.

mod generate;
mod provider_url;

pub use generate::{build_file_payload, file_name_for};
pub use provider_url::{
    DEFAULT_PROVIDER_URL, build_provider_url, build_provider_url_with, parse_provider_base,
};

use chrono::{DateTime, Utc};

/// Compact UTC form used by both exports, e.g. `20250615T100000Z`.
pub(crate) fn format_utc_basic(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}
