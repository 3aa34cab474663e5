//! Signer recovery
//!
//! Answers "who signed this" and nothing more; authorization decisions belong
//! to the caller.

use ballot_common::Identity;
use k256::ecdsa::VerifyingKey;

use crate::error::{CryptoError, Result};
use crate::key::identity_of;
use crate::message::prefixed_hash;
use crate::signature::RecoverableSignature;

/// Recovers the identity that produced a signature over a message
pub trait SignatureVerifier: Send + Sync {
    /// Recover the signer of `signature` over the prefixed hash of `message`
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<Identity>;
}

/// Public-key recovery over secp256k1
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1Verifier;

impl SignatureVerifier for Secp256k1Verifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<Identity> {
        let (signature, recovery_id) = RecoverableSignature::from_bytes(signature)?.decode()?;
        let digest = prefixed_hash(message);

        let key = VerifyingKey::recover_from_prehash(&digest, &signature, recovery_id)
            .map_err(|e| CryptoError::MalformedSignature(format!("recovery failed: {}", e)))?;

        Ok(identity_of(&key))
    }
}
