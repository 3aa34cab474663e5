//! End-to-end ballot lifecycle
//!
//! Organization O1 owned by A, proposal P1 open from 100 to 200 with quorum
//! 10, B and C voting around the window.

use std::sync::Arc;

use ballot::engine::{EventLog, OptionTally, ProposalPhase};
use ballot::{
    BallotError, BallotManager, EngineConfig, EngineEvent, Identity, ManualClock,
    OrganizationId, ProposalId, Secp256k1Verifier, VoterKey,
};

struct Setup {
    manager: BallotManager,
    clock: Arc<ManualClock>,
    log: Arc<EventLog>,
    admin: Identity,
}

fn setup() -> Setup {
    let admin_key = VoterKey::generate();
    let admin = admin_key.identity();
    let clock = Arc::new(ManualClock::new(0));
    let log = Arc::new(EventLog::new());
    let manager = BallotManager::from_config(
        &EngineConfig::new(admin),
        clock.clone(),
        Arc::new(Secp256k1Verifier),
        log.clone(),
    )
    .unwrap();

    Setup {
        manager,
        clock,
        log,
        admin,
    }
}

async fn vote(
    manager: &BallotManager,
    key: &VoterKey,
    proposal: &ProposalId,
    option: u64,
    weight: u128,
) -> Result<(), BallotError> {
    let sig = key.sign_vote(proposal, option, weight).unwrap();
    manager
        .submit_vote(proposal, option, weight, &key.identity(), sig.as_ref())
        .await
}

#[tokio::test]
async fn test_reference_scenario() {
    let Setup {
        manager,
        clock,
        log,
        admin,
    } = setup();

    let a = VoterKey::generate();
    let b = VoterKey::generate();
    let c = VoterKey::generate();

    let o1 = OrganizationId::from_label("O1");
    let p1 = ProposalId::from_label("P1");

    manager
        .register_organization(&admin, o1, a.identity(), "O1", "first org", "bafy-o1")
        .await
        .unwrap();
    assert_eq!(manager.organization(&o1).await.unwrap().owner, a.identity());

    manager
        .open_proposal(&admin, o1, p1, "first proposal", 100, 200, 10)
        .await
        .unwrap();
    assert_eq!(manager.proposal_status(&p1).await.unwrap(), ProposalPhase::Pending);

    clock.set(150);
    vote(&manager, &b, &p1, 1, 5).await.unwrap();
    let summary = manager.proposal(&p1).await.unwrap();
    assert_eq!(summary.total, 5);
    assert_eq!(summary.quorum, 10);

    clock.set(160);
    assert!(matches!(
        vote(&manager, &b, &p1, 0, 100).await,
        Err(BallotError::AlreadyVoted { .. })
    ));

    clock.set(250);
    assert!(matches!(
        vote(&manager, &c, &p1, 1, 3).await,
        Err(BallotError::VotingNotActive { .. })
    ));
    assert_eq!(manager.proposal_status(&p1).await.unwrap(), ProposalPhase::Closed);

    let result = manager.finalize(&admin, &p1).await.unwrap();
    assert_eq!(result.results, vec![OptionTally { option: 1, weight: 5 }]);
    assert_eq!(result.total, 5);
    assert!(!result.quorum_reached);

    let events = log.events().await;
    assert!(matches!(events[0], EngineEvent::OrganizationRegistered { .. }));
    assert!(matches!(events[1], EngineEvent::ProposalCreated { .. }));
    assert_eq!(
        events[2],
        EngineEvent::VoteRecorded {
            signer: b.identity(),
            proposal_id: p1,
            option: 1,
            weight: 5,
        }
    );
    assert!(matches!(events[3], EngineEvent::ProposalFinalized { total: 5, .. }));
    assert_eq!(events.len(), 4);
}

#[tokio::test]
async fn test_failures_emit_nothing() {
    let Setup {
        manager,
        clock,
        log,
        admin,
    } = setup();
    let outsider = VoterKey::generate().identity();
    let o1 = OrganizationId::from_label("O1");
    let p1 = ProposalId::from_label("P1");

    assert!(manager
        .register_organization(&outsider, o1, outsider, "O1", "", "")
        .await
        .is_err());
    assert!(manager
        .open_proposal(&admin, o1, p1, "", 100, 200, 0)
        .await
        .is_err());
    assert!(manager.transfer_ownership(&outsider, outsider).await.is_err());
    clock.set(150);
    assert!(vote(&manager, &VoterKey::generate(), &p1, 0, 1).await.is_err());
    assert!(manager.finalize(&admin, &p1).await.is_err());

    assert!(log.is_empty().await);
    assert!(manager.organization(&o1).await.is_none());
    assert!(manager.proposal(&p1).await.is_none());
}

#[tokio::test]
async fn test_voters_across_proposals_are_independent() {
    let Setup {
        manager,
        clock,
        admin,
        ..
    } = setup();
    let o1 = OrganizationId::from_label("O1");
    let p1 = ProposalId::from_label("P1");
    let p2 = ProposalId::from_label("P2");
    manager
        .register_organization(&admin, o1, admin, "O1", "", "")
        .await
        .unwrap();
    manager.open_proposal(&admin, o1, p1, "", 100, 200, 0).await.unwrap();
    manager.open_proposal(&admin, o1, p2, "", 100, 300, 0).await.unwrap();

    let voter = VoterKey::generate();
    clock.set(150);
    vote(&manager, &voter, &p1, 0, 2).await.unwrap();
    vote(&manager, &voter, &p2, 1, 9).await.unwrap();

    assert!(manager.has_voted(&p1, &voter.identity()).await.unwrap());
    assert!(manager.has_voted(&p2, &voter.identity()).await.unwrap());

    clock.set(250);
    assert!(manager.finalize(&admin, &p1).await.is_ok());
    assert!(matches!(
        manager.finalize(&admin, &p2).await,
        Err(BallotError::VotingStillActive { .. })
    ));
    assert_eq!(manager.proposals_of(&o1).await, vec![p1, p2]);
}
