//! Canonical vote encoding and signed-message hashing

use ballot_common::{Identity, ProposalId, IDENTITY_LEN, KEY_LEN};
use sha2::{Digest, Sha256};

/// Prefix mixed into every signed digest.
///
/// A signature over application data can therefore never be replayed as a
/// signature over a raw 32-byte digest, and vice versa.
pub const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ballot Signed Message:\n";

/// Length of the canonical vote message
pub const VOTE_MESSAGE_LEN: usize = IDENTITY_LEN + KEY_LEN + 8 + 16;

/// Digest that is actually signed for `message`:
/// `SHA-256(prefix || decimal(len(message)) || message)`
pub fn prefixed_hash(message: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(SIGNED_MESSAGE_PREFIX);
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

/// Canonical encoding of the ordered tuple `(signer, proposal, option, weight)`.
///
/// Fixed width, big-endian integers.
pub fn vote_message(
    signer: &Identity,
    proposal_id: &ProposalId,
    option: u64,
    weight: u128,
) -> Vec<u8> {
    let mut message = Vec::with_capacity(VOTE_MESSAGE_LEN);
    message.extend_from_slice(signer.as_bytes());
    message.extend_from_slice(proposal_id.as_bytes());
    message.extend_from_slice(&option.to_be_bytes());
    message.extend_from_slice(&weight.to_be_bytes());
    message
}
