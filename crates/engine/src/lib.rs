//! Signed ballot tally engine
//!
//! Registers organizations, opens time-bounded proposals under them, accepts
//! votes whose signer is recovered from the signature, and finalizes weighted
//! tallies once voting closes.
//!
//! Proposal phase is never stored; it is derived from the injected [`Clock`]
//! each time it matters.
//!
//! [`Clock`]: ballot_common::Clock

pub mod engine;
pub mod error;
pub mod event;
pub mod finalizer;
pub mod manager;
pub mod ownership;
pub mod proposal;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::BallotEngine;
pub use error::{BallotError, BallotResult};
pub use event::{ChannelSink, EngineEvent, EventLog, EventSink};
pub use finalizer::{FinalizationResult, Finalizer, OptionTally};
pub use manager::{BallotManager, ManagerOptions};
pub use ownership::AdminRole;
pub use proposal::{ProposalPhase, ProposalStore, ProposalSummary};
pub use registry::{Organization, OrganizationRegistry};
