//! Shared fixture for unit tests

use std::sync::Arc;

use ballot_common::{Identity, ManualClock, OrganizationId, ProposalId};
use ballot_crypto::{Secp256k1Verifier, VoterKey};

use crate::event::{EngineEvent, EventLog};
use crate::manager::{BallotManager, ManagerOptions};

pub(crate) struct Fixture {
    pub manager: BallotManager,
    pub clock: Arc<ManualClock>,
    pub log: Arc<EventLog>,
    pub admin: Identity,
    pub org: OrganizationId,
    pub proposal: ProposalId,
}

/// Organization `O1` and proposal `P1` (window 100..=200, quorum 10), clock at 0
pub(crate) async fn fixture(options: ManagerOptions) -> Fixture {
    let clock = Arc::new(ManualClock::new(0));
    let log = Arc::new(EventLog::new());
    let admin = Identity::from_bytes([0xad; 20]);
    let manager = BallotManager::new(
        admin,
        clock.clone(),
        Arc::new(Secp256k1Verifier),
        log.clone(),
        options,
    )
    .unwrap();

    let org = OrganizationId::from_label("O1");
    let proposal = ProposalId::from_label("P1");
    manager
        .register_organization(&admin, org, Identity::from_bytes([0xa; 20]), "O1", "", "")
        .await
        .unwrap();
    manager
        .open_proposal(&admin, org, proposal, "P1", 100, 200, 10)
        .await
        .unwrap();

    Fixture {
        manager,
        clock,
        log,
        admin,
        org,
        proposal,
    }
}

impl Fixture {
    /// Sign and submit a vote as `key`
    pub async fn vote(&self, key: &VoterKey, option: u64, weight: u128) -> crate::BallotResult<()> {
        let sig = key.sign_vote(&self.proposal, option, weight).unwrap();
        self.manager
            .submit_vote(&self.proposal, option, weight, &key.identity(), sig.as_ref())
            .await
    }

    pub async fn votes_recorded(&self) -> Vec<EngineEvent> {
        self.log
            .events()
            .await
            .into_iter()
            .filter(|e| matches!(e, EngineEvent::VoteRecorded { .. }))
            .collect()
    }
}
