//! Vote submission
//!
//! The only runtime mutator of vote state. A submission holds its proposal's
//! lock across the membership check, signer recovery and the accumulator
//! update, so two submissions claiming the same signer cannot both pass.
//! The lock is released before the event is handed to the sink.

use std::sync::Arc;

use ballot_common::{Clock, Identity, ProposalId};
use ballot_crypto::{vote_message, SignatureVerifier};
use tracing::{info, warn};

use crate::error::{BallotError, BallotResult};
use crate::event::{EngineEvent, EventSink};
use crate::proposal::{ProposalPhase, ProposalStore};

/// Accepts signed votes into the proposal store
pub struct BallotEngine {
    store: Arc<ProposalStore>,
    verifier: Arc<dyn SignatureVerifier>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
}

impl BallotEngine {
    pub fn new(
        store: Arc<ProposalStore>,
        verifier: Arc<dyn SignatureVerifier>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            store,
            verifier,
            clock,
            events,
        }
    }

    /// Submit a vote signed by `claimed_signer`.
    ///
    /// The signature must cover the canonical `(signer, proposal, option,
    /// weight)` message. Weight is taken as given; only the signer's
    /// endorsement of this exact pair is checked.
    pub async fn submit_vote(
        &self,
        proposal_id: &ProposalId,
        option: u64,
        weight: u128,
        claimed_signer: &Identity,
        signature: &[u8],
    ) -> BallotResult<()> {
        let entry = self.store.entry(proposal_id).await?;
        let mut record = entry.lock().await;

        let now = self.clock.now();
        if record.phase_at(now) != ProposalPhase::Open {
            warn!("Vote by {} on {} outside window at {}", claimed_signer, proposal_id, now);
            return Err(BallotError::VotingNotActive {
                proposal_id: *proposal_id,
                now,
                start: record.start,
                end: record.end,
            });
        }

        if record.has_voted(claimed_signer) {
            warn!("Replay by {} on {}", claimed_signer, proposal_id);
            return Err(BallotError::AlreadyVoted {
                proposal_id: *proposal_id,
                signer: *claimed_signer,
            });
        }

        let message = vote_message(claimed_signer, proposal_id, option, weight);
        let recovered = self.verifier.verify(&message, signature)?;
        if recovered != *claimed_signer {
            warn!(
                "Signature on {} claims {} but recovers {}",
                proposal_id, claimed_signer, recovered
            );
            return Err(BallotError::InvalidSignature {
                claimed: *claimed_signer,
                recovered,
            });
        }

        record.record_vote(*claimed_signer, option, weight)?;
        let total = record.total;
        drop(record);

        self.events
            .emit(EngineEvent::VoteRecorded {
                signer: *claimed_signer,
                proposal_id: *proposal_id,
                option,
                weight,
            })
            .await;
        info!(
            "Recorded vote by {} on {}: option {} weight {} (total {})",
            claimed_signer, proposal_id, option, weight, total
        );

        Ok(())
    }
}
