//! In-memory implementation of the membership system ports.
//!
//! Used for development and testing. Member records can be shaped after
//! different MemberDash versions to exercise the capability fallbacks.
//!
//! # Usage
//!
//! ```ignore
//! use memberdash_stripe_bridge::adapters::membership::{InMemoryMembershipStore, RecordShape};
//!
//! let store = Arc::new(InMemoryMembershipStore::with_shape(RecordShape::Legacy));
//! store.add_member(MemberId::new(42)?);
//! let system = MembershipSystem::new(store.clone(), store);
//! ```

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, MembershipPlanId};
use crate::domain::membership::{
    Capability, MemberRecord, MembershipRelationship, RelationshipSchema, RelationshipStatus,
};
use crate::ports::{MemberDirectory, MembershipWriter};

/// Which query capabilities the store's member records expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordShape {
    /// Direct `has_membership` predicate.
    #[default]
    Current,
    /// Only the `membership_ids` list.
    Legacy,
    /// Neither query.
    Bare,
}

/// In-memory member directory and relationship store.
#[derive(Debug)]
pub struct InMemoryMembershipStore {
    shape: RecordShape,
    schema: RelationshipSchema,
    members: RwLock<HashSet<MemberId>>,
    relationships: RwLock<Vec<MembershipRelationship>>,
}

impl Default for InMemoryMembershipStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::with_shape(RecordShape::default())
    }

    pub fn with_shape(shape: RecordShape) -> Self {
        Self {
            shape,
            schema: RelationshipSchema::default(),
            members: RwLock::new(HashSet::new()),
            relationships: RwLock::new(Vec::new()),
        }
    }

    /// Replace the relationship schema this store reports.
    pub fn with_schema(mut self, schema: RelationshipSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Register a member with no memberships.
    pub fn add_member(&self, id: MemberId) {
        if let Ok(mut members) = self.members.write() {
            members.insert(id);
        }
    }

    /// Snapshot of every saved relationship, in insertion order.
    pub fn relationships(&self) -> Vec<MembershipRelationship> {
        self.relationships
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn active_plans(&self, member_id: MemberId) -> Result<Vec<MembershipPlanId>, DomainError> {
        let active = RelationshipStatus::active(self.schema.active_status.as_deref());
        let relationships = self.relationships.read().map_err(|_| lock_poisoned())?;

        Ok(relationships
            .iter()
            .filter(|r| r.member_id == member_id && r.status == active)
            .map(|r| r.membership_id)
            .collect())
    }
}

fn lock_poisoned() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "membership store lock poisoned")
}

/// Member record shaped by [`RecordShape`].
struct InMemoryMemberRecord {
    id: MemberId,
    shape: RecordShape,
    plans: Vec<MembershipPlanId>,
}

impl MemberRecord for InMemoryMemberRecord {
    fn member_id(&self) -> MemberId {
        self.id
    }

    fn has_membership(&self, plan_id: MembershipPlanId) -> Capability<bool> {
        match self.shape {
            RecordShape::Current => Capability::Supported(self.plans.contains(&plan_id)),
            RecordShape::Legacy | RecordShape::Bare => Capability::Unsupported,
        }
    }

    fn membership_ids(&self) -> Capability<Vec<MembershipPlanId>> {
        match self.shape {
            RecordShape::Legacy => Capability::Supported(self.plans.clone()),
            RecordShape::Current | RecordShape::Bare => Capability::Unsupported,
        }
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMembershipStore {
    async fn find_member(
        &self,
        id: MemberId,
    ) -> Result<Option<Box<dyn MemberRecord>>, DomainError> {
        let known = self.members.read().map_err(|_| lock_poisoned())?.contains(&id);
        if !known {
            return Ok(None);
        }

        Ok(Some(Box::new(InMemoryMemberRecord {
            id,
            shape: self.shape,
            plans: self.active_plans(id)?,
        })))
    }
}

#[async_trait]
impl MembershipWriter for InMemoryMembershipStore {
    fn schema(&self) -> RelationshipSchema {
        self.schema.clone()
    }

    async fn save(&self, relationship: &MembershipRelationship) -> Result<(), DomainError> {
        self.members
            .write()
            .map_err(|_| lock_poisoned())?
            .insert(relationship.member_id);
        self.relationships
            .write()
            .map_err(|_| lock_poisoned())?
            .push(relationship.clone());
        Ok(())
    }
}
