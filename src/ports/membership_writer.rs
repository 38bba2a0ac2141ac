//! Membership writer port.
//!
//! Persists membership relationships into the external membership system.
//!
//! # Example
//!
//! ```ignore
//! async fn grant(writer: &dyn MembershipWriter, member: MemberId, plan: MembershipPlanId) {
//!     let schema = writer.schema();
//!     let now = Timestamp::now();
//!     let relationship = MembershipRelationship::activate(member, plan, &schema, now);
//!     if schema.can_save {
//!         writer.save(&relationship).await?;
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::membership::{MembershipRelationship, RelationshipSchema};

/// Write access to the membership system's relationship records.
#[async_trait]
pub trait MembershipWriter: Send + Sync {
    /// Describe the relationship record this membership system version uses.
    fn schema(&self) -> RelationshipSchema;

    /// Persist a new relationship.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write fails.
    async fn save(&self, relationship: &MembershipRelationship) -> Result<(), DomainError>;
}
