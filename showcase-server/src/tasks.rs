//! Background tickers owned by the server.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::Mutex;

use showcase_core::event::list_events;
use showcase_core::notify::NotificationThrottle;
use showcase_core::schedule::Ticker;
use showcase_core::sweep::sweep_expired;

use crate::state::AppState;

/// Start the expiration sweep and the new-event check.
pub fn start(state: &AppState) -> Result<Vec<Ticker>> {
    let store = state.store.clone();
    let vote_sessions = state.vote_sessions.clone();
    let sweep = Ticker::spawn("expiration-sweep", state.config.sweep_interval, move || {
        let store = store.clone();
        let vote_sessions = vote_sessions.clone();
        async move {
            match sweep_expired(&*store, Utc::now()).await {
                Ok(report) => vote_sessions.forget_proposals(&report.deleted).await,
                Err(e) => tracing::error!(error = %e, "Expiration sweep failed"),
            }
        }
    });

    let store = state.store.clone();
    let throttle = Arc::new(Mutex::new(
        NotificationThrottle::new(state.config.notification_throttle()?).with_last_visit(Utc::now()),
    ));
    let event_check = Ticker::spawn("event-check", state.config.event_check_interval, move || {
        let store = store.clone();
        let throttle = throttle.clone();
        async move {
            let events = match list_events(&*store).await {
                Ok(events) => events,
                Err(e) => {
                    tracing::error!(error = %e, "Event check failed");
                    return;
                }
            };

            let now = Utc::now();
            let mut throttle = throttle.lock().await;
            if throttle.should_prompt(now, &events) {
                let fresh = throttle.new_events_since_last_visit(&events);
                let titles: Vec<&str> = fresh.iter().map(|e| e.event.title.as_str()).collect();
                tracing::info!(count = titles.len(), titles = ?titles, "New events published");
                throttle.mark_prompted(now);
                throttle.mark_visited(now);
            }
        }
    });

    Ok(vec![sweep, event_check])
}

pub async fn stop(tickers: Vec<Ticker>) {
    for ticker in tickers {
        let name = ticker.name();
        ticker.stop().await;
        tracing::info!(ticker = name, "Stopped");
    }
}
