//! Common types and utilities for the ballot engine
//!
//! Identities, entity keys, the pluggable time source and logging bootstrap
//! shared by every crate in the workspace.

pub mod clock;
pub mod error;
pub mod logging;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use types::{Identity, OrganizationId, ProposalId, Timestamp, IDENTITY_LEN, KEY_LEN};
