//! Organization registry
//!
//! Organizations are registered once by the administrator and never mutated
//! or removed afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use ballot_common::{Clock, Identity, OrganizationId, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{BallotError, BallotResult};
use crate::event::{EngineEvent, EventSink};
use crate::ownership::AdminRole;

/// A registered governance entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    /// Controlling identity; never null
    pub owner: Identity,
    pub name: String,
    pub description: String,
    /// External metadata reference, e.g. a content hash
    pub metadata_ref: String,
    pub registered_at: Timestamp,
}

/// Keyed store of organizations
pub struct OrganizationRegistry {
    organizations: RwLock<HashMap<OrganizationId, Organization>>,
    admin: Arc<AdminRole>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
}

impl OrganizationRegistry {
    pub fn new(admin: Arc<AdminRole>, clock: Arc<dyn Clock>, events: Arc<dyn EventSink>) -> Self {
        Self {
            organizations: RwLock::new(HashMap::new()),
            admin,
            clock,
            events,
        }
    }

    /// Register a new organization. Administrator only.
    pub async fn register(
        &self,
        caller: &Identity,
        id: OrganizationId,
        owner: Identity,
        name: impl Into<String>,
        description: impl Into<String>,
        metadata_ref: impl Into<String>,
    ) -> BallotResult<Organization> {
        self.admin.require(caller).await?;

        let mut organizations = self.organizations.write().await;
        if organizations.contains_key(&id) {
            return Err(BallotError::AlreadyExists(format!("organization {}", id)));
        }
        if owner.is_null() {
            return Err(BallotError::InvalidIdentity(format!(
                "organization {} cannot be controlled by the null identity",
                id
            )));
        }

        let organization = Organization {
            id,
            owner,
            name: name.into(),
            description: description.into(),
            metadata_ref: metadata_ref.into(),
            registered_at: self.clock.now(),
        };
        organizations.insert(id, organization.clone());
        drop(organizations);

        self.events
            .emit(EngineEvent::OrganizationRegistered {
                id,
                owner,
                name: organization.name.clone(),
                metadata_ref: organization.metadata_ref.clone(),
            })
            .await;
        info!("Registered organization {} ({}) owned by {}", organization.name, id, owner);

        Ok(organization)
    }

    /// Look up an organization
    pub async fn lookup(&self, id: &OrganizationId) -> Option<Organization> {
        let found = self.organizations.read().await.get(id).cloned();
        debug!("Organization lookup {}: found={}", id, found.is_some());
        found
    }

    pub async fn contains(&self, id: &OrganizationId) -> bool {
        self.organizations.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.organizations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.organizations.read().await.is_empty()
    }
}
