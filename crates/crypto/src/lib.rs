//! Cryptographic primitives for the ballot engine
//!
//! - [`SignatureVerifier`]: recovers the identity behind a signed message
//! - [`VoterKey`]: produces signatures the verifier accepts
//! - [`message`]: canonical vote encoding and the signed-message prefix

pub mod error;
pub mod key;
pub mod message;
pub mod signature;
pub mod verifier;

pub use error::{CryptoError, Result};
pub use key::{identity_of, VoterKey};
pub use message::{prefixed_hash, vote_message, SIGNED_MESSAGE_PREFIX, VOTE_MESSAGE_LEN};
pub use signature::{RecoverableSignature, SIGNATURE_LEN};
pub use verifier::{Secp256k1Verifier, SignatureVerifier};
