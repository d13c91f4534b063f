use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use showcase_core::auth::MemoryAuth;
use showcase_core::config::ShowcaseConfig;
use showcase_core::store::MemoryStore;
use showcase_core::voting::VoteSession;
use tokio::sync::Mutex;
use url::Url;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub auth: Arc<MemoryAuth>,
    pub vote_sessions: VoteSessions,
    pub provider_base: Url,
    pub proposal_lifetime: chrono::Duration,
    pub config: Arc<ShowcaseConfig>,
}

impl AppState {
    pub fn new(config: ShowcaseConfig) -> Result<Self> {
        Ok(AppState {
            store: Arc::new(MemoryStore::new()),
            auth: Arc::new(MemoryAuth::new(&config.accounts)),
            vote_sessions: VoteSessions::default(),
            provider_base: config.provider_base()?,
            proposal_lifetime: config.proposal_lifetime()?,
            config: Arc::new(config),
        })
    }
}

/// Advisory vote caches, one per device id.
///
/// Entries exist only for devices with a recorded vote on a live proposal.
/// The lock is never held across a store call.
#[derive(Clone, Default)]
pub struct VoteSessions {
    inner: Arc<Mutex<HashMap<String, VoteSession>>>,
}

impl VoteSessions {
    /// Copy of the device's cache, empty if it has none.
    pub async fn snapshot(&self, device_id: &str) -> VoteSession {
        self.inner
            .lock()
            .await
            .get(device_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn record(&self, device_id: &str, proposal_id: &str) {
        self.inner
            .lock()
            .await
            .entry(device_id.to_string())
            .or_default()
            .record(proposal_id);
    }

    /// Remove deleted proposals from every cache and drop caches left empty.
    pub async fn forget_proposals(&self, proposal_ids: &[String]) {
        if proposal_ids.is_empty() {
            return;
        }

        let mut sessions = self.inner.lock().await;
        sessions.retain(|_, session| {
            for id in proposal_ids {
                session.forget(id);
            }
            !session.is_empty()
        });
    }

    #[cfg(test)]
    pub async fn device_count(&self) -> usize {
        self.inner.lock().await.len()
    }
}
