//! Event and calendar export endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use showcase_core::auth::AuthProvider;
use showcase_core::event::{
    CalendarEvent, EventDraft, EventRecord, create_event, events_created_since, get_event,
    list_events,
};
use showcase_core::ics::{build_file_payload, build_provider_url_with, file_name_for};

use crate::routes::{AppError, bearer_token};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list).post(create))
        .route("/events/new", get(created_since))
        .route("/events/{id}/calendar-url", get(calendar_url))
        .route("/events/{id}/ics", get(ics_file))
}

/// GET /events - Soonest first
async fn list(State(state): State<AppState>) -> Result<Json<Vec<EventRecord>>, AppError> {
    Ok(Json(list_events(&*state.store).await?))
}

/// POST /events - Create an event (signed-in users only)
async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<EventDraft>,
) -> Result<(StatusCode, Json<EventRecord>), AppError> {
    let token = bearer_token(&headers).ok_or_else(AppError::unauthorized)?;
    let Some(identity) = state.auth.current_user(token).await else {
        return Err(AppError::unauthorized());
    };

    let event = CalendarEvent::try_from(draft)?;
    let record = create_event(&*state.store, event, Utc::now()).await?;
    tracing::info!(id = %record.id, by = %identity.email, "Event published");

    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Deserialize)]
pub struct SinceQuery {
    pub since: DateTime<Utc>,
}

/// GET /events/new?since=.. - Events created after a visit
async fn created_since(
    State(state): State<AppState>,
    Query(query): Query<SinceQuery>,
) -> Result<Json<Vec<EventRecord>>, AppError> {
    Ok(Json(events_created_since(&*state.store, query.since).await?))
}

#[derive(Serialize)]
pub struct CalendarUrlResponse {
    pub url: String,
}

/// GET /events/:id/calendar-url - Web calendar deep link
async fn calendar_url(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CalendarUrlResponse>, AppError> {
    let record = get_event(&*state.store, &id).await?;
    let url = build_provider_url_with(&state.provider_base, &record.event);
    Ok(Json(CalendarUrlResponse { url: url.into() }))
}

/// GET /events/:id/ics - Download the event as an .ics file
async fn ics_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = get_event(&*state.store, &id).await?;
    let payload = build_file_payload(&record.event);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        file_name_for(&record.event.title).replace(['"', '\\'], "")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        payload,
    ))
}
