//! Voter signing keys and identity derivation

use std::fmt;

use ballot_common::{Identity, ProposalId, IDENTITY_LEN};
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::error::{CryptoError, Result};
use crate::message::{prefixed_hash, vote_message};
use crate::signature::RecoverableSignature;

/// Identity controlled by a public key: the last 20 bytes of the SHA-256
/// digest of the uncompressed point, tag byte excluded.
pub fn identity_of(key: &VerifyingKey) -> Identity {
    let point = key.to_encoded_point(false);
    let digest = Sha256::digest(&point.as_bytes()[1..]);
    let mut bytes = [0u8; IDENTITY_LEN];
    bytes.copy_from_slice(&digest[digest.len() - IDENTITY_LEN..]);
    Identity::from_bytes(bytes)
}

/// A secp256k1 key able to produce vote signatures the engine accepts
pub struct VoterKey {
    signing: SigningKey,
}

impl VoterKey {
    /// Generate a fresh random key
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::random(&mut OsRng),
        }
    }

    /// Load a key from 32 secret bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let signing = SigningKey::from_slice(bytes)
            .map_err(|e| CryptoError::InvalidKey(format!("Invalid secp256k1 key: {}", e)))?;
        Ok(Self { signing })
    }

    /// Identity this key signs as
    pub fn identity(&self) -> Identity {
        identity_of(self.signing.verifying_key())
    }

    /// Sign arbitrary application data under the signed-message prefix
    pub fn sign_message(&self, message: &[u8]) -> Result<RecoverableSignature> {
        let digest = prefixed_hash(message);
        let (signature, recovery_id) = self
            .signing
            .sign_prehash_recoverable(&digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(RecoverableSignature::from_parts(&signature, recovery_id))
    }

    /// Sign a vote as this key's identity
    pub fn sign_vote(
        &self,
        proposal_id: &ProposalId,
        option: u64,
        weight: u128,
    ) -> Result<RecoverableSignature> {
        self.sign_message(&vote_message(&self.identity(), proposal_id, option, weight))
    }
}

impl fmt::Debug for VoterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VoterKey({}, REDACTED)", self.identity())
    }
}
