//! Proposal store
//!
//! Proposals live in an arena keyed by a globally unique id. Each record sits
//! behind its own mutex so vote submissions only contend per proposal.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use ballot_common::{Clock, Identity, OrganizationId, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::error::{BallotError, BallotResult};
use crate::event::{EngineEvent, EventSink};
use crate::ownership::AdminRole;
use crate::registry::OrganizationRegistry;

/// Phase of a proposal at a given instant. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalPhase {
    /// Before `start`
    Pending,
    /// `start <= now <= end`
    Open,
    /// After `end`
    Closed,
}

impl ProposalPhase {
    pub fn at(now: Timestamp, start: Timestamp, end: Timestamp) -> Self {
        if now < start {
            ProposalPhase::Pending
        } else if now <= end {
            ProposalPhase::Open
        } else {
            ProposalPhase::Closed
        }
    }
}

/// Public view of a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSummary {
    pub description: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub quorum: u128,
    /// Running total of weighted votes
    pub total: u128,
}

/// Full proposal state; accumulators and voter set stay inside the crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProposalRecord {
    pub(crate) id: ProposalId,
    pub(crate) organization: OrganizationId,
    pub(crate) description: String,
    pub(crate) start: Timestamp,
    pub(crate) end: Timestamp,
    pub(crate) quorum: u128,
    pub(crate) total: u128,
    voters: HashSet<Identity>,
    tallies: BTreeMap<u64, u128>,
}

impl ProposalRecord {
    fn new(
        id: ProposalId,
        organization: OrganizationId,
        description: String,
        start: Timestamp,
        end: Timestamp,
        quorum: u128,
    ) -> Self {
        Self {
            id,
            organization,
            description,
            start,
            end,
            quorum,
            total: 0,
            voters: HashSet::new(),
            tallies: BTreeMap::new(),
        }
    }

    pub(crate) fn phase_at(&self, now: Timestamp) -> ProposalPhase {
        ProposalPhase::at(now, self.start, self.end)
    }

    pub(crate) fn has_voted(&self, signer: &Identity) -> bool {
        self.voters.contains(signer)
    }

    /// Per-option accumulators, ascending by option index
    pub(crate) fn tallies(&self) -> &BTreeMap<u64, u128> {
        &self.tallies
    }

    pub(crate) fn summary(&self) -> ProposalSummary {
        ProposalSummary {
            description: self.description.clone(),
            start: self.start,
            end: self.end,
            quorum: self.quorum,
            total: self.total,
        }
    }

    /// Record a vote: signer into the voter set, weight onto the option and
    /// the running total. All-or-nothing.
    pub(crate) fn record_vote(
        &mut self,
        signer: Identity,
        option: u64,
        weight: u128,
    ) -> BallotResult<()> {
        if self.voters.contains(&signer) {
            return Err(BallotError::AlreadyVoted {
                proposal_id: self.id,
                signer,
            });
        }

        let current = self.tallies.get(&option).copied().unwrap_or(0);
        let tally = current
            .checked_add(weight)
            .ok_or(BallotError::TallyOverflow(self.id))?;
        let total = self
            .total
            .checked_add(weight)
            .ok_or(BallotError::TallyOverflow(self.id))?;

        self.voters.insert(signer);
        self.tallies.insert(option, tally);
        self.total = total;
        Ok(())
    }
}

#[derive(Default)]
struct Arena {
    records: HashMap<ProposalId, Arc<Mutex<ProposalRecord>>>,
    by_organization: HashMap<OrganizationId, Vec<ProposalId>>,
}

/// Keyed store of proposals
pub struct ProposalStore {
    arena: RwLock<Arena>,
    registry: Arc<OrganizationRegistry>,
    admin: Arc<AdminRole>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
}

impl ProposalStore {
    pub fn new(
        registry: Arc<OrganizationRegistry>,
        admin: Arc<AdminRole>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            arena: RwLock::new(Arena::default()),
            registry,
            admin,
            clock,
            events,
        }
    }

    /// Open a proposal under a registered organization. Administrator only.
    ///
    /// Proposal ids are unique across all organizations.
    #[allow(clippy::too_many_arguments)]
    pub async fn open(
        &self,
        caller: &Identity,
        organization: OrganizationId,
        id: ProposalId,
        description: impl Into<String>,
        start: Timestamp,
        end: Timestamp,
        quorum: u128,
    ) -> BallotResult<ProposalSummary> {
        self.admin.require(caller).await?;

        if !self.registry.contains(&organization).await {
            return Err(BallotError::UnknownOrganization(organization));
        }
        if start >= end {
            return Err(BallotError::InvalidWindow { start, end });
        }

        let mut arena = self.arena.write().await;
        if arena.records.contains_key(&id) {
            return Err(BallotError::AlreadyExists(format!("proposal {}", id)));
        }

        let record = ProposalRecord::new(id, organization, description.into(), start, end, quorum);
        let summary = record.summary();
        arena.records.insert(id, Arc::new(Mutex::new(record)));
        arena.by_organization.entry(organization).or_default().push(id);
        drop(arena);

        self.events
            .emit(EngineEvent::ProposalCreated {
                id,
                organization,
                start,
                end,
                quorum,
            })
            .await;
        info!(
            "Opened proposal {} under {} (window {}..={}, quorum {})",
            id, organization, start, end, quorum
        );

        Ok(summary)
    }

    /// Handle to a proposal record, for the vote and finalization paths
    pub(crate) async fn entry(&self, id: &ProposalId) -> BallotResult<Arc<Mutex<ProposalRecord>>> {
        self.arena
            .read()
            .await
            .records
            .get(id)
            .cloned()
            .ok_or(BallotError::UnknownProposal(*id))
    }

    /// Summary of a proposal
    pub async fn get(&self, id: &ProposalId) -> Option<ProposalSummary> {
        let entry = self.entry(id).await.ok()?;
        let summary = entry.lock().await.summary();
        Some(summary)
    }

    /// Phase of a proposal at the clock's current time
    pub async fn status(&self, id: &ProposalId) -> BallotResult<ProposalPhase> {
        let entry = self.entry(id).await?;
        let phase = entry.lock().await.phase_at(self.clock.now());
        debug!("Proposal {} is {:?}", id, phase);
        Ok(phase)
    }

    /// Whether `signer` already voted on the proposal
    pub async fn has_voted(&self, id: &ProposalId, signer: &Identity) -> BallotResult<bool> {
        let entry = self.entry(id).await?;
        let voted = entry.lock().await.has_voted(signer);
        Ok(voted)
    }

    /// Ids of proposals opened under an organization, in creation order
    pub async fn proposals_of(&self, organization: &OrganizationId) -> Vec<ProposalId> {
        self.arena
            .read()
            .await
            .by_organization
            .get(organization)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventLog;
    use ballot_common::ManualClock;
    use proptest::prelude::*;

    fn id(b: u8) -> Identity {
        Identity::from_bytes([b; 20])
    }

    const ADMIN: u8 = 0xad;

    async fn setup() -> (ProposalStore, Arc<ManualClock>, Arc<EventLog>) {
        let log = Arc::new(EventLog::new());
        let clock = Arc::new(ManualClock::new(0));
        let admin = Arc::new(AdminRole::new(id(ADMIN), log.clone()).unwrap());
        let registry = Arc::new(OrganizationRegistry::new(
            admin.clone(),
            clock.clone(),
            log.clone(),
        ));
        registry
            .register(&id(ADMIN), OrganizationId::from_label("O1"), id(0xa), "O1", "", "")
            .await
            .unwrap();
        let store = ProposalStore::new(registry, admin, clock.clone(), log.clone());
        (store, clock, log)
    }

    #[test]
    fn test_phase_boundaries() {
        assert_eq!(ProposalPhase::at(99, 100, 200), ProposalPhase::Pending);
        assert_eq!(ProposalPhase::at(100, 100, 200), ProposalPhase::Open);
        assert_eq!(ProposalPhase::at(200, 100, 200), ProposalPhase::Open);
        assert_eq!(ProposalPhase::at(201, 100, 200), ProposalPhase::Closed);
    }

    #[tokio::test]
    async fn test_open_and_get() {
        let (store, _, log) = setup().await;
        let org = OrganizationId::from_label("O1");
        let pid = ProposalId::from_label("P1");

        let summary = store.open(&id(ADMIN), org, pid, "Budget", 100, 200, 10).await.unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(store.get(&pid).await, Some(summary));
        assert_eq!(store.proposals_of(&org).await, vec![pid]);
        assert_eq!(log.len().await, 2);
    }

    #[tokio::test]
    async fn test_open_rejections() {
        let (store, _, log) = setup().await;
        let org = OrganizationId::from_label("O1");
        let pid = ProposalId::from_label("P1");

        assert!(matches!(
            store.open(&id(1), org, pid, "", 100, 200, 0).await,
            Err(BallotError::Unauthorized { .. })
        ));
        assert!(matches!(
            store.open(&id(ADMIN), OrganizationId::from_label("O2"), pid, "", 100, 200, 0).await,
            Err(BallotError::UnknownOrganization(_))
        ));
        assert!(matches!(
            store.open(&id(ADMIN), org, pid, "", 200, 200, 0).await,
            Err(BallotError::InvalidWindow { start: 200, end: 200 })
        ));
        assert!(store.get(&pid).await.is_none());
        assert_eq!(log.len().await, 1);

        store.open(&id(ADMIN), org, pid, "", 100, 200, 0).await.unwrap();
        assert!(matches!(
            store.open(&id(ADMIN), org, pid, "again", 300, 400, 0).await,
            Err(BallotError::AlreadyExists(_))
        ));
        assert_eq!(store.get(&pid).await.unwrap().start, 100);
    }

    #[tokio::test]
    async fn test_status_follows_clock() {
        let (store, clock, _) = setup().await;
        let pid = ProposalId::from_label("P1");
        store
            .open(&id(ADMIN), OrganizationId::from_label("O1"), pid, "", 100, 200, 0)
            .await
            .unwrap();

        clock.set(50);
        assert_eq!(store.status(&pid).await.unwrap(), ProposalPhase::Pending);
        clock.set(150);
        assert_eq!(store.status(&pid).await.unwrap(), ProposalPhase::Open);
        clock.set(250);
        assert_eq!(store.status(&pid).await.unwrap(), ProposalPhase::Closed);

        assert!(matches!(
            store.status(&ProposalId::from_label("nope")).await,
            Err(BallotError::UnknownProposal(_))
        ));
    }

    #[test]
    fn test_record_vote_overflow_keeps_state() {
        let pid = ProposalId::from_label("P1");
        let mut record =
            ProposalRecord::new(pid, OrganizationId::from_label("O1"), String::new(), 0, 1, 0);
        record.record_vote(id(1), 0, u128::MAX).unwrap();

        let before = record.clone();
        assert!(matches!(
            record.record_vote(id(2), 1, 1),
            Err(BallotError::TallyOverflow(_))
        ));
        assert_eq!(record, before);
        assert!(!record.has_voted(&id(2)));
    }

    proptest! {
        #[test]
        fn prop_total_equals_sum_of_tallies(
            votes in proptest::collection::vec((0u64..8, 0u128..1_000_000), 0..64),
        ) {
            let mut record = ProposalRecord::new(
                ProposalId::from_label("P"),
                OrganizationId::from_label("O"),
                String::new(),
                0,
                1,
                0,
            );
            for (i, (option, weight)) in votes.iter().enumerate() {
                let mut signer = [0u8; 20];
                signer[..8].copy_from_slice(&(i as u64 + 1).to_be_bytes());
                record.record_vote(Identity::from_bytes(signer), *option, *weight).unwrap();
            }
            let sum: u128 = record.tallies().values().sum();
            prop_assert_eq!(record.total, sum);
            prop_assert_eq!(record.voters.len(), votes.len());
        }

        #[test]
        fn prop_phase_is_total_and_ordered(
            now in 0u64..1000,
            start in 0u64..1000,
            len in 1u64..1000,
        ) {
            let end = start + len;
            let phase = ProposalPhase::at(now, start, end);
            prop_assert_eq!(phase == ProposalPhase::Open, start <= now && now <= end);
            prop_assert_eq!(phase == ProposalPhase::Pending, now < start);
        }
    }
}
