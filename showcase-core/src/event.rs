//! Community events and their calendar representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::EVENTS;
use crate::error::{ShowcaseError, ShowcaseResult};
use crate::store::{Document, DocumentStore, FilterOp, Query};

/// Location shown on calendar exports for online events
pub const VIRTUAL_LOCATION: &str = "Virtual Event";

/// Where an event takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LocationDetail {
    Virtual { link: String },
    Physical { address: String },
}

impl LocationDetail {
    /// The LOCATION text used by calendar exports.
    pub fn display_location(&self) -> &str {
        match self {
            LocationDetail::Virtual { .. } => VIRTUAL_LOCATION,
            LocationDetail::Physical { address } => address,
        }
    }
}

/// An event with validated dates, ready for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: LocationDetail,
}

impl CalendarEvent {
    pub fn new(
        title: String,
        description: String,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        location: LocationDetail,
    ) -> ShowcaseResult<Self> {
        if title.trim().is_empty() {
            return Err(ShowcaseError::InvalidEvent("title is required".into()));
        }
        if start_date > end_date {
            return Err(ShowcaseError::InvalidEvent(format!(
                "start {} is after end {}",
                start_date.to_rfc3339(),
                end_date.to_rfc3339()
            )));
        }

        Ok(CalendarEvent {
            title,
            description,
            start_date,
            end_date,
            location,
        })
    }
}

/// An event as entered in a form; dates may be missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: LocationDetail,
}

impl TryFrom<EventDraft> for CalendarEvent {
    type Error = ShowcaseError;

    fn try_from(draft: EventDraft) -> ShowcaseResult<Self> {
        let start = draft
            .start_date
            .ok_or_else(|| ShowcaseError::InvalidEvent("start date is required".into()))?;
        let end = draft
            .end_date
            .ok_or_else(|| ShowcaseError::InvalidEvent("end date is required".into()))?;

        CalendarEvent::new(draft.title, draft.description, start, end, draft.location)
    }
}

/// A stored event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: CalendarEvent,
}

impl EventRecord {
    pub fn from_document(document: Document) -> ShowcaseResult<Self> {
        Ok(serde_json::from_value(Value::Object(document))?)
    }

    fn to_document(&self) -> ShowcaseResult<Document> {
        match serde_json::to_value(self)? {
            Value::Object(mut map) => {
                map.remove("id");
                Ok(map)
            }
            _ => Err(ShowcaseError::Serialization("event is not an object".into())),
        }
    }
}

pub async fn create_event<S: DocumentStore>(
    store: &S,
    event: CalendarEvent,
    now: DateTime<Utc>,
) -> ShowcaseResult<EventRecord> {
    let mut record = EventRecord {
        id: String::new(),
        created_at: now,
        event,
    };
    record.id = store.create(EVENTS, record.to_document()?).await?;

    tracing::info!(id = %record.id, title = %record.event.title, "Event created");
    Ok(record)
}

pub async fn get_event<S: DocumentStore>(store: &S, id: &str) -> ShowcaseResult<EventRecord> {
    let document = store
        .get(EVENTS, id)
        .await?
        .ok_or_else(|| ShowcaseError::NotFound {
            collection: EVENTS.to_string(),
            id: id.to_string(),
        })?;
    EventRecord::from_document(document)
}

/// All events, soonest start first.
pub async fn list_events<S: DocumentStore>(store: &S) -> ShowcaseResult<Vec<EventRecord>> {
    let mut events = store
        .query(EVENTS, &Query::new())
        .await?
        .into_iter()
        .map(EventRecord::from_document)
        .collect::<ShowcaseResult<Vec<_>>>()?;

    events.sort_by_key(|e| e.event.start_date);
    Ok(events)
}

/// Events created strictly after `since`.
pub async fn events_created_since<S: DocumentStore>(
    store: &S,
    since: DateTime<Utc>,
) -> ShowcaseResult<Vec<EventRecord>> {
    let query = Query::new().filter("created_at", FilterOp::Gt, since.timestamp_millis());
    let mut events = store
        .query(EVENTS, &query)
        .await?
        .into_iter()
        .map(EventRecord::from_document)
        .collect::<ShowcaseResult<Vec<_>>>()?;

    events.sort_by_key(|e| e.created_at);
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, hour, 0, 0).unwrap()
    }

    fn demo(start: u32, end: u32) -> CalendarEvent {
        CalendarEvent::new(
            "Demo".into(),
            String::new(),
            at(start),
            at(end),
            LocationDetail::Virtual { link: "https://meet.example.com/demo".into() },
        )
        .unwrap()
    }

    #[test]
    fn test_inverted_dates_rejected() {
        let result = CalendarEvent::new(
            "Demo".into(),
            String::new(),
            at(12),
            at(10),
            LocationDetail::Physical { address: "Hall A".into() },
        );
        assert!(matches!(result, Err(ShowcaseError::InvalidEvent(_))));
    }

    #[test]
    fn test_zero_length_event_allowed() {
        assert!(
            CalendarEvent::new(
                "Demo".into(),
                String::new(),
                at(10),
                at(10),
                LocationDetail::Physical { address: "Hall A".into() }
            )
            .is_ok()
        );
    }

    #[test]
    fn test_draft_missing_dates_rejected() {
        let draft = EventDraft {
            title: "Demo".into(),
            description: String::new(),
            start_date: Some(at(10)),
            end_date: None,
            location: LocationDetail::Physical { address: "Hall A".into() },
        };

        let result = CalendarEvent::try_from(draft);
        assert!(matches!(result, Err(ShowcaseError::InvalidEvent(msg)) if msg.contains("end date")));
    }

    #[test]
    fn test_location_detail_json_shape() {
        let location: LocationDetail =
            serde_json::from_str(r#"{"type": "physical", "address": "1 Main St"}"#).unwrap();
        assert_eq!(location.display_location(), "1 Main St");

        let virtual_location = LocationDetail::Virtual { link: "https://x".into() };
        assert_eq!(virtual_location.display_location(), VIRTUAL_LOCATION);
        assert_eq!(
            serde_json::to_value(&virtual_location).unwrap(),
            serde_json::json!({"type": "virtual", "link": "https://x"})
        );
    }

    #[tokio::test]
    async fn test_list_events_soonest_first() {
        let store = MemoryStore::new();
        let now = at(0);
        create_event(&store, demo(14, 15), now).await.unwrap();
        let early = create_event(&store, demo(9, 10), now).await.unwrap();

        let events = list_events(&store).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], early);
        assert_eq!(get_event(&store, &early.id).await.unwrap(), early);
    }

    #[tokio::test]
    async fn test_events_created_since() {
        let store = MemoryStore::new();
        let visit = at(8);
        create_event(&store, demo(9, 10), visit - Duration::hours(1)).await.unwrap();
        let fresh = create_event(&store, demo(11, 12), visit + Duration::minutes(5))
            .await
            .unwrap();

        let new_events = events_created_since(&store, visit).await.unwrap();
        assert_eq!(new_events, vec![fresh]);
    }
}
