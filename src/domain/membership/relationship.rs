//! Membership relationship - the MemberDash record linking a member to a plan.

use serde::{Deserialize, Serialize};

use super::status::RelationshipStatus;
use crate::domain::foundation::{MemberId, MembershipPlanId, Timestamp};

/// Shape of the relationship record in the membership system version in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipSchema {
    /// Whether relationships carry a start timestamp.
    pub tracks_started_at: bool,
    /// The status value this version uses for active relationships.
    pub active_status: Option<String>,
    /// Whether relationships can be persisted through the writer.
    pub can_save: bool,
}

impl Default for RelationshipSchema {
    fn default() -> Self {
        Self {
            tracks_started_at: true,
            active_status: None,
            can_save: true,
        }
    }
}

/// A member's relationship to a membership plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRelationship {
    /// The member holding the plan.
    pub member_id: MemberId,
    /// The plan held.
    pub membership_id: MembershipPlanId,
    /// Activation time, when the schema tracks one.
    pub started_at: Option<Timestamp>,
    /// Relationship status.
    pub status: RelationshipStatus,
}

impl MembershipRelationship {
    /// Builds an active relationship starting at `now`, shaped by `schema`.
    pub fn activate(
        member_id: MemberId,
        membership_id: MembershipPlanId,
        schema: &RelationshipSchema,
        now: Timestamp,
    ) -> Self {
        Self {
            member_id,
            membership_id,
            started_at: schema.tracks_started_at.then_some(now),
            status: RelationshipStatus::active(schema.active_status.as_deref()),
        }
    }
}
