//! New-event notification throttling.

use chrono::{DateTime, Duration, Utc};

use crate::event::EventRecord;

/// Tracks the last visit and last prompt so users are told about new
/// events at most once per interval.
#[derive(Debug, Clone)]
pub struct NotificationThrottle {
    last_visit: Option<DateTime<Utc>>,
    last_prompt: Option<DateTime<Utc>>,
    interval: Duration,
}

impl NotificationThrottle {
    pub fn new(interval: Duration) -> Self {
        NotificationThrottle {
            last_visit: None,
            last_prompt: None,
            interval,
        }
    }

    pub fn with_last_visit(mut self, last_visit: DateTime<Utc>) -> Self {
        self.last_visit = Some(last_visit);
        self
    }

    pub fn last_visit(&self) -> Option<DateTime<Utc>> {
        self.last_visit
    }

    /// Events created after the last visit (all of them on a first visit).
    pub fn new_events_since_last_visit<'a>(&self, events: &'a [EventRecord]) -> Vec<&'a EventRecord> {
        events
            .iter()
            .filter(|e| self.last_visit.is_none_or(|visit| e.created_at > visit))
            .collect()
    }

    /// Prompt only when something is new and the interval has passed.
    pub fn should_prompt(&self, now: DateTime<Utc>, events: &[EventRecord]) -> bool {
        if self.new_events_since_last_visit(events).is_empty() {
            return false;
        }
        self.last_prompt
            .is_none_or(|prompted| now - prompted >= self.interval)
    }

    pub fn mark_prompted(&mut self, now: DateTime<Utc>) {
        self.last_prompt = Some(now);
    }

    pub fn mark_visited(&mut self, now: DateTime<Utc>) {
        self.last_visit = Some(now);
    }
}
