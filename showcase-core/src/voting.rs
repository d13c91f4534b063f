//! One vote per device per proposal.
//!
//! The authoritative record is the proposal's `voters` set in the store.
//! A vote is a single gated patch: add the device to `voters`, and only if
//! that changed the set, increment the counter. Concurrent votes from
//! different devices both land, and a repeated request from the same device
//! (another tab, a network retry) can never count twice.
//!
//! `VoteSession` is an advisory per-session cache that lets callers refuse
//! a second vote without a round trip.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::PROPOSALS;
use crate::error::{ShowcaseError, ShowcaseResult};
use crate::proposal::Proposal;
use crate::store::{DocumentStore, Patch};

/// Kinds of vote a device can cast.
///
/// Proposals carry a `downvotes` counter, but no action increments it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
}

impl VoteType {
    fn counter_field(self) -> &'static str {
        match self {
            VoteType::Upvote => "upvotes",
        }
    }
}

/// Counts after a successful vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResult {
    pub proposal_id: String,
    pub upvotes: u64,
    pub downvotes: u64,
    pub voter_count: usize,
}

impl VoteResult {
    fn from_proposal(proposal: &Proposal) -> Self {
        VoteResult {
            proposal_id: proposal.id.clone(),
            upvotes: proposal.upvotes,
            downvotes: proposal.downvotes,
            voter_count: proposal.voters.len(),
        }
    }
}

/// Proposals the current session has already voted on.
#[derive(Debug, Clone, Default)]
pub struct VoteSession {
    voted: HashSet<String>,
}

impl VoteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_voted(&self, proposal_id: &str) -> bool {
        self.voted.contains(proposal_id)
    }

    pub fn record(&mut self, proposal_id: &str) {
        self.voted.insert(proposal_id.to_string());
    }

    /// Drop a proposal that no longer exists. Returns whether it was cached.
    pub fn forget(&mut self, proposal_id: &str) -> bool {
        self.voted.remove(proposal_id)
    }

    pub fn is_empty(&self) -> bool {
        self.voted.is_empty()
    }
}

/// Local check against the last fetched snapshot and the session cache.
pub fn can_vote(proposal: &Proposal, device_id: &str, session: &VoteSession) -> bool {
    !session.has_voted(&proposal.id) && proposal.can_vote(device_id)
}

/// Cast a vote for `device_id` on `proposal`.
///
/// `proposal` is the caller's latest snapshot. If it already lists the
/// device, or the session has voted, no request is sent. If the store
/// reports the device was already present (another tab won the race), the
/// counter is left untouched and `AlreadyVoted` is returned.
pub async fn apply_vote<S: DocumentStore>(
    store: &S,
    session: &mut VoteSession,
    proposal: &Proposal,
    device_id: &str,
    vote_type: VoteType,
) -> ShowcaseResult<VoteResult> {
    if !can_vote(proposal, device_id, session) {
        tracing::warn!(proposal = %proposal.id, device = %device_id, "Vote refused locally");
        return Err(ShowcaseError::AlreadyVoted(proposal.id.clone()));
    }

    let patch = Patch::new()
        .array_union("voters", device_id)
        .increment(vote_type.counter_field(), 1)
        .gate_on_union();

    let outcome = match store.update(PROPOSALS, &proposal.id, &patch).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(proposal = %proposal.id, error = %e, "Vote request failed");
            return Err(e);
        }
    };

    session.record(&proposal.id);

    if !outcome.union_added {
        tracing::warn!(proposal = %proposal.id, device = %device_id, "Device already in voters");
        return Err(ShowcaseError::AlreadyVoted(proposal.id.clone()));
    }

    let updated = Proposal::from_document(outcome.document)?;
    tracing::info!(
        proposal = %updated.id,
        upvotes = updated.upvotes,
        "Vote recorded"
    );

    Ok(VoteResult::from_proposal(&updated))
}
