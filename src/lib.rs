//! Ballot
//!
//! Off-chain signed ballot tallying: organizations, time-bounded proposals,
//! signature-authenticated weighted votes and finalized results.

/// Module version information
pub mod version {
    /// The current version of the ballot library
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

pub use ballot_common as common;
pub use ballot_config as config;
pub use ballot_crypto as crypto;
pub use ballot_engine as engine;

pub use ballot_common::{Clock, Identity, ManualClock, OrganizationId, ProposalId, SystemClock};
pub use ballot_config::EngineConfig;
pub use ballot_crypto::{Secp256k1Verifier, SignatureVerifier, VoterKey};
pub use ballot_engine::{BallotError, BallotManager, BallotResult, EngineEvent, FinalizationResult};

/// Install logging at the configured level
pub fn init_logging(config: &EngineConfig) -> ballot_common::Result<()> {
    ballot_common::init_logging(&config.log_level)
}
