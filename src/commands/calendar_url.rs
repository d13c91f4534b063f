use std::path::Path;

use anyhow::Result;
use showcase_core::ics::{build_provider_url, build_provider_url_with, parse_provider_base};

use crate::commands::load_event;

pub fn run(event_path: &Path, provider_url: Option<&str>) -> Result<()> {
    let event = load_event(event_path)?;

    let url = match provider_url {
        Some(raw) => build_provider_url_with(&parse_provider_base(raw)?, &event).to_string(),
        None => build_provider_url(&event),
    };

    println!("{url}");
    Ok(())
}
