//! Audit events
//!
//! Exactly one event is emitted per successful mutation and none on failure.
//! Sinks are the hand-off point to external indexers and observers.

use async_trait::async_trait;
use ballot_common::{Identity, OrganizationId, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use tracing::warn;

use crate::finalizer::OptionTally;

/// Events emitted by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    OrganizationRegistered {
        id: OrganizationId,
        owner: Identity,
        name: String,
        metadata_ref: String,
    },
    ProposalCreated {
        id: ProposalId,
        organization: OrganizationId,
        start: Timestamp,
        end: Timestamp,
        quorum: u128,
    },
    VoteRecorded {
        signer: Identity,
        proposal_id: ProposalId,
        option: u64,
        weight: u128,
    },
    ProposalFinalized {
        proposal_id: ProposalId,
        results: Vec<OptionTally>,
        total: u128,
        quorum_reached: bool,
    },
    OwnershipTransferred {
        previous: Identity,
        new_owner: Identity,
    },
}

/// Destination for engine events
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event. Delivery problems are the sink's to handle; the
    /// mutation that produced the event has already been applied.
    async fn emit(&self, event: EngineEvent);
}

/// In-memory append-only event log
#[derive(Debug, Default)]
pub struct EventLog {
    events: RwLock<Vec<EngineEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event emitted so far, in order
    pub async fn events(&self) -> Vec<EngineEvent> {
        self.events.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventSink for EventLog {
    async fn emit(&self, event: EngineEvent) {
        self.events.write().await.push(event);
    }
}

/// Forwards events over a bounded tokio channel.
///
/// Never waits on the receiver: when the channel is full or closed the event
/// is dropped with a warning, so a stalled indexer cannot hold up voting.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<EngineEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver an indexer should drain
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn emit(&self, event: EngineEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!("Event channel full, discarding {:?}", event);
            }
            Err(TrySendError::Closed(event)) => {
                warn!("Event receiver dropped, discarding {:?}", event);
            }
        }
    }
}
