//! Strongly-typed identifier value objects.
//!
//! MemberDash keys members and membership plans by positive integers.
//! Wrapping them keeps a member id from ever being compared to a plan id,
//! and keeps plan ids from being compared against loosely-typed values.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Identifier of a MemberDash member (the site user).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(u64);

impl MemberId {
    /// Creates a MemberId, rejecting zero.
    pub fn new(id: u64) -> Result<Self, ValidationError> {
        if id == 0 {
            return Err(ValidationError::empty_field("member_id"));
        }
        Ok(Self(id))
    }

    /// Returns the raw integer value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a MemberDash membership plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipPlanId(u64);

impl MembershipPlanId {
    /// Creates a MembershipPlanId, rejecting zero.
    pub fn new(id: u64) -> Result<Self, ValidationError> {
        if id == 0 {
            return Err(ValidationError::empty_field("membership_id"));
        }
        Ok(Self(id))
    }

    /// Returns the raw integer value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MembershipPlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
