//! Recoverable secp256k1 signatures

use std::fmt;

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature};
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, Result};

/// Encoded length: `r (32) || s (32) || v (1)`
pub const SIGNATURE_LEN: usize = 65;

/// A 65-byte recoverable signature.
///
/// The recovery byte `v` is accepted either raw (`0`/`1`) or with the
/// conventional `27` offset.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecoverableSignature([u8; SIGNATURE_LEN]);

impl RecoverableSignature {
    /// Wrap encoded bytes; only the length is checked here
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; SIGNATURE_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::MalformedSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    pub(crate) fn from_parts(signature: &EcdsaSignature, recovery_id: RecoveryId) -> Self {
        let mut raw = [0u8; SIGNATURE_LEN];
        raw[..64].copy_from_slice(&signature.to_bytes());
        raw[64] = 27 + recovery_id.to_byte();
        Self(raw)
    }

    /// Encoded bytes
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Decode into the ECDSA signature and recovery id
    pub fn decode(&self) -> Result<(EcdsaSignature, RecoveryId)> {
        let signature = EcdsaSignature::from_slice(&self.0[..64])
            .map_err(|e| CryptoError::MalformedSignature(format!("invalid r/s: {}", e)))?;

        let v = match self.0[64] {
            v @ 0..=1 => v,
            v @ 27..=28 => v - 27,
            other => {
                return Err(CryptoError::MalformedSignature(format!(
                    "invalid recovery byte {}",
                    other
                )))
            }
        };
        let recovery_id = RecoveryId::from_byte(v)
            .ok_or_else(|| CryptoError::MalformedSignature(format!("invalid recovery id {}", v)))?;

        Ok((signature, recovery_id))
    }

    /// `0x`-prefixed lowercase hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))
            .map_err(|e| CryptoError::MalformedSignature(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

impl AsRef<[u8]> for RecoverableSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSignature({})", self.to_hex())
    }
}

impl TryFrom<String> for RecoverableSignature {
    type Error = CryptoError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_hex(&s)
    }
}

impl From<RecoverableSignature> for String {
    fn from(sig: RecoverableSignature) -> Self {
        sig.to_hex()
    }
}
