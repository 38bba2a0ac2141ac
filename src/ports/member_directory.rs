//! Member directory port.
//!
//! Looks up members in the external membership system so the bridge can
//! tell whether a member already holds a plan.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberId};
use crate::domain::membership::MemberRecord;

/// Read access to the membership system's members.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Load a member by id.
    ///
    /// Returns `None` if the membership system has no such member.
    async fn find_member(
        &self,
        id: MemberId,
    ) -> Result<Option<Box<dyn MemberRecord>>, DomainError>;
}
