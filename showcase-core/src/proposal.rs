//! Project proposals.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::PROPOSALS;
use crate::error::{ShowcaseError, ShowcaseResult};
use crate::store::{Direction, Document, DocumentStore, Query};

/// A proposal as submitted through the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProposalDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub repo_url: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// Store-assigned id (empty until created)
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub skills: String,
    pub repo_url: String,
    pub author: String,

    pub upvotes: u64,
    /// Stored and returned, but nothing increments it
    pub downvotes: u64,
    /// Device ids that have voted, without duplicates
    pub voters: Vec<String>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expiration_date: DateTime<Utc>,
}

impl Proposal {
    pub fn new(draft: ProposalDraft, now: DateTime<Utc>, lifetime: Duration) -> ShowcaseResult<Self> {
        if draft.title.trim().is_empty() {
            return Err(ShowcaseError::InvalidProposal("title is required".into()));
        }
        if draft.author.trim().is_empty() {
            return Err(ShowcaseError::InvalidProposal("author is required".into()));
        }

        Ok(Proposal {
            id: String::new(),
            title: draft.title,
            description: draft.description,
            skills: draft.skills,
            repo_url: draft.repo_url,
            author: draft.author,
            upvotes: 0,
            downvotes: 0,
            voters: Vec::new(),
            created_at: now,
            expiration_date: now + lifetime,
        })
    }

    /// A device may vote unless it is already among the voters.
    pub fn can_vote(&self, device_id: &str) -> bool {
        !self.voters.iter().any(|v| v == device_id)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date < now
    }

    pub fn from_document(document: Document) -> ShowcaseResult<Self> {
        Ok(serde_json::from_value(Value::Object(document))?)
    }

    pub fn to_document(&self) -> ShowcaseResult<Document> {
        match serde_json::to_value(self)? {
            Value::Object(mut map) => {
                map.remove("id");
                Ok(map)
            }
            _ => Err(ShowcaseError::Serialization("proposal is not an object".into())),
        }
    }
}

/// Store a new proposal and return it with its assigned id.
pub async fn submit_proposal<S: DocumentStore>(
    store: &S,
    draft: ProposalDraft,
    now: DateTime<Utc>,
    lifetime: Duration,
) -> ShowcaseResult<Proposal> {
    let mut proposal = Proposal::new(draft, now, lifetime)?;
    proposal.id = store.create(PROPOSALS, proposal.to_document()?).await?;

    tracing::info!(id = %proposal.id, title = %proposal.title, "Proposal submitted");
    Ok(proposal)
}

pub async fn get_proposal<S: DocumentStore>(store: &S, id: &str) -> ShowcaseResult<Proposal> {
    let document = store
        .get(PROPOSALS, id)
        .await?
        .ok_or_else(|| ShowcaseError::NotFound {
            collection: PROPOSALS.to_string(),
            id: id.to_string(),
        })?;
    Proposal::from_document(document)
}

/// All stored proposals, newest first.
pub async fn list_proposals<S: DocumentStore>(store: &S) -> ShowcaseResult<Vec<Proposal>> {
    let query = Query::new().order_by("created_at", Direction::Descending);
    store
        .query(PROPOSALS, &query)
        .await?
        .into_iter()
        .map(Proposal::from_document)
        .collect()
}
