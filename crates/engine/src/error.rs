//! Error taxonomy of the ballot engine
//!
//! Every failure leaves engine state untouched and is distinguishable by
//! variant, so callers can match on the violated precondition.

use ballot_common::{Identity, OrganizationId, ProposalId, Timestamp};
use ballot_config::ConfigError;
use ballot_crypto::CryptoError;
use thiserror::Error;

/// Error types for ballot operations
#[derive(Error, Debug)]
pub enum BallotError {
    /// Caller does not hold the administrator role
    #[error("Unauthorized: {caller} does not hold the administrator role")]
    Unauthorized { caller: Identity },

    #[error("Unknown organization: {0}")]
    UnknownOrganization(OrganizationId),

    #[error("Unknown proposal: {0}")]
    UnknownProposal(ProposalId),

    /// Duplicate organization or proposal identifier
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Null identity where an owner is required
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("Invalid voting window: start {start} is not before end {end}")]
    InvalidWindow { start: Timestamp, end: Timestamp },

    #[error("Voting not active on {proposal_id} at {now} (window {start}..={end})")]
    VotingNotActive {
        proposal_id: ProposalId,
        now: Timestamp,
        start: Timestamp,
        end: Timestamp,
    },

    #[error("Voting still active on {proposal_id} at {now} (ends {end})")]
    VotingStillActive {
        proposal_id: ProposalId,
        now: Timestamp,
        end: Timestamp,
    },

    #[error("{signer} already voted on {proposal_id}")]
    AlreadyVoted {
        proposal_id: ProposalId,
        signer: Identity,
    },

    /// Recovered signer differs from the claimed one
    #[error("Invalid signature: claimed {claimed}, recovered {recovered}")]
    InvalidSignature { claimed: Identity, recovered: Identity },

    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// Adding the vote would overflow an accumulator
    #[error("Tally overflow on {0}")]
    TallyOverflow(ProposalId),

    #[error("Quorum not reached on {proposal_id}: {total} < {quorum}")]
    QuorumNotReached {
        proposal_id: ProposalId,
        total: u128,
        quorum: u128,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<CryptoError> for BallotError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::MalformedSignature(msg) => BallotError::MalformedSignature(msg),
            other => BallotError::MalformedSignature(other.to_string()),
        }
    }
}

/// Result type for ballot operations
pub type BallotResult<T> = Result<T, BallotError>;
