//! Finalization
//!
//! Emits a snapshot of a closed proposal's accumulators. Nothing is stored,
//! so finalizing again recomputes and re-emits the same snapshot.

use std::sync::Arc;

use ballot_common::{Clock, Identity, OrganizationId, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BallotError, BallotResult};
use crate::event::{EngineEvent, EventSink};
use crate::ownership::AdminRole;
use crate::proposal::{ProposalPhase, ProposalStore};

/// Accumulated weight of one option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTally {
    pub option: u64,
    pub weight: u128,
}

/// Outcome of finalizing a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizationResult {
    pub proposal_id: ProposalId,
    pub organization: OrganizationId,
    /// One entry per option that received a vote, ascending by option
    pub results: Vec<OptionTally>,
    pub total: u128,
    pub quorum: u128,
    pub quorum_reached: bool,
    pub finalized_at: Timestamp,
}

impl FinalizationResult {
    /// Accumulated weight of `option`; zero when it received no votes
    pub fn weight_of(&self, option: u64) -> u128 {
        self.results
            .iter()
            .find(|t| t.option == option)
            .map(|t| t.weight)
            .unwrap_or(0)
    }
}

/// Produces results for closed proposals
pub struct Finalizer {
    store: Arc<ProposalStore>,
    admin: Arc<AdminRole>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    enforce_quorum: bool,
}

impl Finalizer {
    pub fn new(
        store: Arc<ProposalStore>,
        admin: Arc<AdminRole>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
        enforce_quorum: bool,
    ) -> Self {
        Self {
            store,
            admin,
            clock,
            events,
            enforce_quorum,
        }
    }

    /// Finalize a proposal whose window has ended. Administrator only.
    ///
    /// Quorum is reported, and only enforced when configured to.
    pub async fn finalize(
        &self,
        caller: &Identity,
        proposal_id: &ProposalId,
    ) -> BallotResult<FinalizationResult> {
        self.admin.require(caller).await?;

        let entry = self.store.entry(proposal_id).await?;
        let record = entry.lock().await;

        let now = self.clock.now();
        if record.phase_at(now) != ProposalPhase::Closed {
            return Err(BallotError::VotingStillActive {
                proposal_id: *proposal_id,
                now,
                end: record.end,
            });
        }

        let quorum_reached = record.total >= record.quorum;
        if self.enforce_quorum && !quorum_reached {
            return Err(BallotError::QuorumNotReached {
                proposal_id: *proposal_id,
                total: record.total,
                quorum: record.quorum,
            });
        }

        let results: Vec<OptionTally> = record
            .tallies()
            .iter()
            .map(|(&option, &weight)| OptionTally { option, weight })
            .collect();

        let result = FinalizationResult {
            proposal_id: *proposal_id,
            organization: record.organization,
            results: results.clone(),
            total: record.total,
            quorum: record.quorum,
            quorum_reached,
            finalized_at: now,
        };
        drop(record);

        self.events
            .emit(EngineEvent::ProposalFinalized {
                proposal_id: *proposal_id,
                results,
                total: result.total,
                quorum_reached,
            })
            .await;
        info!(
            "Finalized {}: {} options, total {}, quorum {} reached={}",
            proposal_id,
            result.results.len(),
            result.total,
            result.quorum,
            quorum_reached
        );

        Ok(result)
    }
}
