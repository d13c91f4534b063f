//! Proposal and voting endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use showcase_core::fingerprint::{DeviceSignals, VoterIdentity};
use showcase_core::proposal::{Proposal, ProposalDraft, get_proposal, list_proposals, submit_proposal};
use showcase_core::voting::{VoteResult, VoteType, apply_vote, can_vote};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/proposals", get(list).post(create))
        .route("/proposals/{id}/vote", post(vote))
        .route("/proposals/{id}/can-vote", get(check_vote))
}

/// Proposal as returned by the API (voter ids stay server-side)
#[derive(Serialize)]
pub struct ProposalView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub skills: String,
    pub repo_url: String,
    pub author: String,
    pub upvotes: u64,
    pub downvotes: u64,
    pub voter_count: usize,
    pub created_at: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
}

impl From<Proposal> for ProposalView {
    fn from(p: Proposal) -> Self {
        ProposalView {
            voter_count: p.voters.len(),
            id: p.id,
            title: p.title,
            description: p.description,
            skills: p.skills,
            repo_url: p.repo_url,
            author: p.author,
            upvotes: p.upvotes,
            downvotes: p.downvotes,
            created_at: p.created_at,
            expiration_date: p.expiration_date,
        }
    }
}

/// GET /proposals - Newest first
async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProposalView>>, AppError> {
    let proposals = list_proposals(&*state.store).await?;
    Ok(Json(proposals.into_iter().map(ProposalView::from).collect()))
}

/// POST /proposals - Submit a proposal
async fn create(
    State(state): State<AppState>,
    Json(draft): Json<ProposalDraft>,
) -> Result<(StatusCode, Json<ProposalView>), AppError> {
    let proposal = submit_proposal(&*state.store, draft, Utc::now(), state.proposal_lifetime).await?;
    Ok((StatusCode::CREATED, Json(proposal.into())))
}

/// Device signals as reported by the browser
#[derive(Deserialize)]
pub struct VoteRequest {
    #[serde(default)]
    pub user_agent: Option<String>,
    pub language: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub timezone_offset: i32,
}

impl VoteRequest {
    /// Fall back to the request's User-Agent header when the body omits it.
    fn into_signals(self, headers: &HeaderMap) -> DeviceSignals {
        let user_agent = self.user_agent.unwrap_or_else(|| {
            headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        });

        DeviceSignals {
            user_agent,
            language: self.language,
            screen_width: self.screen_width,
            screen_height: self.screen_height,
            timezone_offset: self.timezone_offset,
        }
    }
}

/// POST /proposals/:id/vote - Upvote once per device
async fn vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<VoteRequest>,
) -> Result<Json<VoteResult>, AppError> {
    let device_id = req.into_signals(&headers).voter_id();
    let proposal = get_proposal(&*state.store, &id).await?;

    let mut session = state.vote_sessions.snapshot(&device_id).await;
    let result = apply_vote(&*state.store, &mut session, &proposal, &device_id, VoteType::Upvote).await;
    if session.has_voted(&proposal.id) {
        state.vote_sessions.record(&device_id, &proposal.id).await;
    }

    Ok(Json(result?))
}

#[derive(Deserialize)]
pub struct CanVoteQuery {
    pub device_id: String,
}

#[derive(Serialize)]
pub struct CanVoteResponse {
    pub can_vote: bool,
}

/// GET /proposals/:id/can-vote?device_id=.. - Check against current state
async fn check_vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CanVoteQuery>,
) -> Result<Json<CanVoteResponse>, AppError> {
    let proposal = get_proposal(&*state.store, &id).await?;
    let session = state.vote_sessions.snapshot(&query.device_id).await;

    Ok(Json(CanVoteResponse {
        can_vote: can_vote(&proposal, &query.device_id, &session),
    }))
}
