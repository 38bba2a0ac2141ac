//! Member records as seen through the membership system's query surface,
//! and the existing-membership check built on them.

use super::capability::Capability;
use crate::domain::foundation::{MemberId, MembershipPlanId};

/// A member loaded from the membership system.
///
/// Both queries default to `Unsupported`; an adapter overrides the ones its
/// membership system version actually offers.
pub trait MemberRecord: Send + Sync {
    /// The member this record describes.
    fn member_id(&self) -> MemberId;

    /// Direct "does this member hold this plan" predicate.
    fn has_membership(&self, _plan_id: MembershipPlanId) -> Capability<bool> {
        Capability::Unsupported
    }

    /// Plans the member currently holds.
    fn membership_ids(&self) -> Capability<Vec<MembershipPlanId>> {
        Capability::Unsupported
    }
}

/// Decides whether a member already holds a plan.
///
/// No record means no membership. The direct predicate wins when offered;
/// otherwise the id list is searched. With neither capability the answer is
/// `false` so that creation is still attempted.
pub fn already_holds(member: Option<&dyn MemberRecord>, plan_id: MembershipPlanId) -> bool {
    let Some(member) = member else {
        return false;
    };

    if let Capability::Supported(holds) = member.has_membership(plan_id) {
        return holds;
    }

    match member.membership_ids() {
        Capability::Supported(ids) => ids.contains(&plan_id),
        Capability::Unsupported => false,
    }
}
