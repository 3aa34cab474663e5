//! Ballot manager
//!
//! Wires the administrator role, registry, proposal store, vote engine and
//! finalizer over one clock, one verifier and one event sink, and exposes the
//! administrative, public and read surfaces in one place.

use std::sync::Arc;

use ballot_common::{Clock, Identity, OrganizationId, ProposalId, Timestamp};
use ballot_config::EngineConfig;
use ballot_crypto::SignatureVerifier;
use tokio::sync::mpsc;
use tracing::info;

use crate::engine::BallotEngine;
use crate::error::BallotResult;
use crate::event::{ChannelSink, EngineEvent, EventSink};
use crate::finalizer::{FinalizationResult, Finalizer};
use crate::ownership::AdminRole;
use crate::proposal::{ProposalPhase, ProposalStore, ProposalSummary};
use crate::registry::{Organization, OrganizationRegistry};

/// Options not carried by the collaborators themselves
#[derive(Debug, Clone, Default)]
pub struct ManagerOptions {
    pub enforce_quorum: bool,
}

/// Entry point to the ballot engine
pub struct BallotManager {
    admin: Arc<AdminRole>,
    registry: Arc<OrganizationRegistry>,
    proposals: Arc<ProposalStore>,
    engine: BallotEngine,
    finalizer: Finalizer,
}

impl BallotManager {
    /// Create a manager administered by `admin`
    pub fn new(
        admin: Identity,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn SignatureVerifier>,
        events: Arc<dyn EventSink>,
        options: ManagerOptions,
    ) -> BallotResult<Self> {
        let admin = Arc::new(AdminRole::new(admin, events.clone())?);
        let registry = Arc::new(OrganizationRegistry::new(
            admin.clone(),
            clock.clone(),
            events.clone(),
        ));
        let proposals = Arc::new(ProposalStore::new(
            registry.clone(),
            admin.clone(),
            clock.clone(),
            events.clone(),
        ));
        let engine = BallotEngine::new(proposals.clone(), verifier, clock.clone(), events.clone());
        let finalizer = Finalizer::new(
            proposals.clone(),
            admin.clone(),
            clock,
            events,
            options.enforce_quorum,
        );

        Ok(Self {
            admin,
            registry,
            proposals,
            engine,
            finalizer,
        })
    }

    /// Create a manager from configuration
    pub fn from_config(
        config: &EngineConfig,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn SignatureVerifier>,
        events: Arc<dyn EventSink>,
    ) -> BallotResult<Self> {
        let admin = config.admin_identity()?;
        info!(
            "Starting ballot manager (admin {}, enforce_quorum {})",
            admin, config.enforce_quorum
        );
        Self::new(
            admin,
            clock,
            verifier,
            events,
            ManagerOptions {
                enforce_quorum: config.enforce_quorum,
            },
        )
    }

    /// Create a manager whose events are forwarded over a channel sized by
    /// `config.event_buffer`
    pub fn with_channel(
        config: &EngineConfig,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> BallotResult<(Self, mpsc::Receiver<EngineEvent>)> {
        let (sink, receiver) = ChannelSink::new(config.event_buffer);
        let manager = Self::from_config(config, clock, verifier, Arc::new(sink))?;
        Ok((manager, receiver))
    }

    // Administrative surface

    pub async fn register_organization(
        &self,
        caller: &Identity,
        id: OrganizationId,
        owner: Identity,
        name: impl Into<String>,
        description: impl Into<String>,
        metadata_ref: impl Into<String>,
    ) -> BallotResult<Organization> {
        self.registry
            .register(caller, id, owner, name, description, metadata_ref)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn open_proposal(
        &self,
        caller: &Identity,
        organization: OrganizationId,
        id: ProposalId,
        description: impl Into<String>,
        start: Timestamp,
        end: Timestamp,
        quorum: u128,
    ) -> BallotResult<ProposalSummary> {
        self.proposals
            .open(caller, organization, id, description, start, end, quorum)
            .await
    }

    pub async fn finalize(
        &self,
        caller: &Identity,
        proposal_id: &ProposalId,
    ) -> BallotResult<FinalizationResult> {
        self.finalizer.finalize(caller, proposal_id).await
    }

    pub async fn transfer_ownership(
        &self,
        caller: &Identity,
        new_owner: Identity,
    ) -> BallotResult<()> {
        self.admin.transfer(caller, new_owner).await
    }

    // Public surface

    pub async fn submit_vote(
        &self,
        proposal_id: &ProposalId,
        option: u64,
        weight: u128,
        claimed_signer: &Identity,
        signature: &[u8],
    ) -> BallotResult<()> {
        self.engine
            .submit_vote(proposal_id, option, weight, claimed_signer, signature)
            .await
    }

    // Read surface

    pub async fn organization(&self, id: &OrganizationId) -> Option<Organization> {
        self.registry.lookup(id).await
    }

    pub async fn proposal(&self, id: &ProposalId) -> Option<ProposalSummary> {
        self.proposals.get(id).await
    }

    pub async fn proposal_status(&self, id: &ProposalId) -> BallotResult<ProposalPhase> {
        self.proposals.status(id).await
    }

    pub async fn has_voted(&self, id: &ProposalId, signer: &Identity) -> BallotResult<bool> {
        self.proposals.has_voted(id, signer).await
    }

    pub async fn proposals_of(&self, organization: &OrganizationId) -> Vec<ProposalId> {
        self.proposals.proposals_of(organization).await
    }

    pub async fn owner(&self) -> Identity {
        self.admin.owner().await
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &Arc<ProposalStore> {
        &self.proposals
    }
}
