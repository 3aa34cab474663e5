//! Administrator role
//!
//! A single transferable capability. Privileged operations present the
//! caller's identity, which is compared against the current holder.

use std::sync::Arc;

use ballot_common::Identity;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{BallotError, BallotResult};
use crate::event::{EngineEvent, EventSink};

/// The process-wide administrator role
pub struct AdminRole {
    owner: RwLock<Identity>,
    events: Arc<dyn EventSink>,
}

impl AdminRole {
    /// Create the role held by `owner`
    pub fn new(owner: Identity, events: Arc<dyn EventSink>) -> BallotResult<Self> {
        if owner.is_null() {
            return Err(BallotError::InvalidIdentity(
                "administrator cannot be the null identity".to_string(),
            ));
        }
        Ok(Self {
            owner: RwLock::new(owner),
            events,
        })
    }

    /// Current holder
    pub async fn owner(&self) -> Identity {
        *self.owner.read().await
    }

    /// Fail with `Unauthorized` unless `caller` holds the role
    pub async fn require(&self, caller: &Identity) -> BallotResult<()> {
        if *self.owner.read().await != *caller {
            return Err(BallotError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    /// Hand the role to `new_owner`
    pub async fn transfer(&self, caller: &Identity, new_owner: Identity) -> BallotResult<()> {
        let mut owner = self.owner.write().await;
        if *owner != *caller {
            return Err(BallotError::Unauthorized { caller: *caller });
        }
        if new_owner.is_null() {
            return Err(BallotError::InvalidIdentity(
                "administrator cannot be the null identity".to_string(),
            ));
        }

        let previous = std::mem::replace(&mut *owner, new_owner);
        drop(owner);

        self.events
            .emit(EngineEvent::OwnershipTransferred { previous, new_owner })
            .await;
        info!("Administrator role transferred from {} to {}", previous, new_owner);
        Ok(())
    }
}
