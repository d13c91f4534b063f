use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use showcase_core::event::CalendarEvent;
use showcase_core::ics::{build_file_payload, file_name_for};

use crate::commands::load_event;
use crate::render::Render;

pub fn run(event_path: &Path, out_dir: &Path) -> Result<()> {
    let event = load_event(event_path)?;
    let path = write_ics(&event, out_dir)?;

    println!("{}", event.render());
    println!("   written to {}", path.display());
    Ok(())
}

/// Write the payload as `<out_dir>/<title-with-hyphens>.ics`.
fn write_ics(event: &CalendarEvent, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Could not create {}", out_dir.display()))?;
    let path = out_dir.join(file_name_for(&event.title));
    std::fs::write(&path, build_file_payload(event))
        .with_context(|| format!("Could not write {}", path.display()))?;

    Ok(path)
}
