//! Expiration sweep for proposals.
//!
//! Each expired proposal is deleted independently. A failed deletion is
//! logged and left for the next sweep.

use chrono::{DateTime, Utc};

use crate::constants::PROPOSALS;
use crate::error::ShowcaseResult;
use crate::proposal::Proposal;
use crate::store::{DocumentStore, FilterOp, Query};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
}

/// Proposals whose expiration date is strictly before `now`.
pub fn select_expired(proposals: &[Proposal], now: DateTime<Utc>) -> Vec<&Proposal> {
    proposals.iter().filter(|p| p.is_expired(now)).collect()
}

/// Delete every proposal that expired before `now`.
///
/// Only the initial query can fail the sweep as a whole.
pub async fn sweep_expired<S: DocumentStore>(
    store: &S,
    now: DateTime<Utc>,
) -> ShowcaseResult<SweepReport> {
    let query = Query::new().filter("expiration_date", FilterOp::Lt, now.timestamp_millis());
    let expired = store
        .query(PROPOSALS, &query)
        .await?
        .into_iter()
        .map(Proposal::from_document)
        .collect::<ShowcaseResult<Vec<_>>>()?;

    let mut report = SweepReport::default();

    for proposal in select_expired(&expired, now) {
        match store.delete(PROPOSALS, &proposal.id).await {
            Ok(()) => report.deleted.push(proposal.id.clone()),
            Err(e) => {
                tracing::warn!(id = %proposal.id, error = %e, "Could not delete expired proposal");
                report.failed.push(proposal.id.clone());
            }
        }
    }

    if !report.deleted.is_empty() || !report.failed.is_empty() {
        tracing::info!(
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "Expired proposals swept"
        );
    }

    Ok(report)
}
