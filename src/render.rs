//! Colored terminal rendering for showcase-core types.

use owo_colors::OwoColorize;
use showcase_core::event::CalendarEvent;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let when = format!(
            "{} → {}",
            self.start_date.format("%Y-%m-%d %H:%M"),
            self.end_date.format("%H:%M UTC")
        );
        format!(
            "📅 {} {} {}",
            self.title.bold(),
            when.dimmed(),
            self.location.display_location().cyan()
        )
    }
}
