pub mod calendar_url;
pub mod device_id;
pub mod export;
pub mod hash_password;

use std::path::Path;

use anyhow::{Context, Result};
use showcase_core::event::{CalendarEvent, EventDraft};

/// Read a TOML event file and validate its dates.
pub fn load_event(path: &Path) -> Result<CalendarEvent> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    let draft: EventDraft = toml::from_str(&content)
        .with_context(|| format!("Could not parse event file {}", path.display()))?;

    CalendarEvent::try_from(draft).with_context(|| format!("Invalid event in {}", path.display()))
}
